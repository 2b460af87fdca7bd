use clap::Args;
use dermastudio_core::config::LoadOptions;
use dermastudio_core::{match_products, Category};

use crate::commands::{load_context, CommandResult, ProfileArgs};

const COMMAND: &str = "match";

#[derive(Debug, Clone, Args)]
pub struct MatchArgs {
    #[arg(
        long,
        help = "Product category (cleanser, toner, serum, moisturizer, sunscreen, exfoliant)"
    )]
    pub category: String,
    #[command(flatten)]
    pub profile: ProfileArgs,
}

pub fn run(options: LoadOptions, args: MatchArgs) -> CommandResult {
    let category = match args.category.parse::<Category>() {
        Ok(category) => category,
        Err(message) => return CommandResult::bad_request(COMMAND, message),
    };

    let (_, catalog) = match load_context(COMMAND, options) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let profile = args.profile.profile();
    let products = match_products(&catalog, category, &profile);
    let message = format!(
        "{} {} products match skin type {}",
        products.len(),
        category.as_str().to_ascii_lowercase(),
        profile.skin_type
    );

    CommandResult::success_with_data(COMMAND, message, products)
}
