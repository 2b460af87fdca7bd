use clap::Args;
use dermastudio_core::config::LoadOptions;
use dermastudio_core::{BrowseFilter, Product, ProductId, SkinType};
use serde::Serialize;

use crate::commands::{load_context, CommandResult};

const COMMAND: &str = "catalog";

#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    #[arg(long, help = "Only products made for this skin type")]
    pub skin_type: Option<String>,
    #[arg(long, help = "Case-insensitive concern substring")]
    pub concern: Option<String>,
    #[arg(long = "select", num_args = 1.., help = "Product ids to total")]
    pub select: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CatalogView<'a> {
    products: Vec<&'a Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selection_total: Option<u64>,
}

pub fn run(options: LoadOptions, args: CatalogArgs) -> CommandResult {
    let (_, catalog) = match load_context(COMMAND, options) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let skin_type = match args.skin_type.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match SkinType::parse_strict(raw) {
            Some(skin_type) => Some(skin_type),
            None => {
                return CommandResult::bad_request(COMMAND, format!("unknown skin type `{raw}`"));
            }
        },
        None => None,
    };

    let filter = BrowseFilter { skin_type, concern: args.concern };
    let products = catalog.browse(&filter);

    let selection_total = if args.select.is_empty() {
        None
    } else {
        let selected = args.select.into_iter().map(ProductId).collect::<Vec<_>>();
        match catalog.selection_total(&selected) {
            Ok(total) => Some(total),
            Err(error) => return CommandResult::from_application_error(COMMAND, error.into()),
        }
    };

    let mut message = format!("{} of {} products shown", products.len(), catalog.len());
    if let Some(total) = selection_total {
        message.push_str(&format!("; selection total {total}"));
    }

    CommandResult::success_with_data(COMMAND, message, CatalogView { products, selection_total })
}
