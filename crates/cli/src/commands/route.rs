use clap::Args;
use dermastudio_core::config::LoadOptions;
use dermastudio_core::{route_from_scores, SkinType};

use crate::commands::{load_context, CommandResult, ScoreArgs};

const COMMAND: &str = "route";

#[derive(Debug, Clone, Args)]
pub struct RouteArgs {
    #[arg(long, default_value = "normal")]
    pub skin_type: String,
    #[command(flatten)]
    pub scores: ScoreArgs,
}

pub fn run(options: LoadOptions, args: RouteArgs) -> CommandResult {
    let (_, catalog) = match load_context(COMMAND, options) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let plan = route_from_scores(
        &args.scores.scores(),
        SkinType::parse_lenient(&args.skin_type),
        &catalog,
    );
    let message = format!(
        "{} AM steps, {} PM steps, {} suggestions",
        plan.am_steps.len(),
        plan.pm_steps.len(),
        plan.suggestions.len()
    );

    CommandResult::success_with_data(COMMAND, message, plan)
}
