use clap::Args;
use dermastudio_core::allocate_budget;
use dermastudio_core::config::LoadOptions;

use crate::commands::{load_context, CommandResult, ProfileArgs};

const COMMAND: &str = "allocate";

#[derive(Debug, Clone, Args)]
pub struct AllocateArgs {
    #[arg(long, help = "Total budget in whole currency units")]
    pub budget: u64,
    #[command(flatten)]
    pub profile: ProfileArgs,
}

pub fn run(options: LoadOptions, args: AllocateArgs) -> CommandResult {
    let (_, catalog) = match load_context(COMMAND, options) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let allocation = allocate_budget(&catalog, &args.profile.profile(), args.budget);
    let filled = allocation.assigned().count();
    let message = format!(
        "filled {filled} of {} categories, spent {} of {} (remaining {})",
        allocation.entries.len(),
        allocation.total_spent,
        allocation.budget,
        allocation.remaining()
    );

    CommandResult::success_with_data(COMMAND, message, allocation)
}
