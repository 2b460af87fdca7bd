use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use dermastudio_core::config::LoadOptions;
use dermastudio_core::errors::ApplicationError;
use dermastudio_core::export::{write_clients_csv, write_products_csv};
use tracing::info;

use crate::commands::client::read_register;
use crate::commands::{load_config, load_context, CommandResult};

#[derive(Debug, Clone, Subcommand)]
pub enum ExportCommand {
    #[command(about = "Write the active catalog as CSV")]
    Products {
        #[arg(long, default_value = "products_export.csv")]
        out: PathBuf,
    },
    #[command(about = "Write the clients register as CSV")]
    Clients {
        #[arg(long, default_value = "clients_export.csv")]
        out: PathBuf,
    },
}

pub fn run(options: LoadOptions, command: ExportCommand) -> CommandResult {
    match command {
        ExportCommand::Products { out } => products(options, &out),
        ExportCommand::Clients { out } => clients(options, &out),
    }
}

fn products(options: LoadOptions, out: &Path) -> CommandResult {
    const COMMAND: &str = "export-products";

    let (_, catalog) = match load_context(COMMAND, options) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let result = create_file(out).and_then(|file| write_products_csv(&catalog, file));
    finish(COMMAND, out, catalog.len(), result)
}

fn clients(options: LoadOptions, out: &Path) -> CommandResult {
    const COMMAND: &str = "export-clients";

    let config = match load_config(COMMAND, options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let clients = match read_register(&config.clients.path) {
        Ok(clients) => clients,
        Err(error) => return CommandResult::from_application_error(COMMAND, error),
    };

    let result = create_file(out).and_then(|file| write_clients_csv(&clients, file));
    finish(COMMAND, out, clients.len(), result)
}

fn create_file(path: &Path) -> Result<fs::File, ApplicationError> {
    fs::File::create(path).map_err(|error| {
        ApplicationError::Export(format!("could not create `{}`: {error}", path.display()))
    })
}

fn finish(
    command: &str,
    out: &Path,
    rows: usize,
    result: Result<(), ApplicationError>,
) -> CommandResult {
    match result {
        Ok(()) => {
            info!(
                event_name = "export.completed",
                command,
                rows,
                path = %out.display(),
                "csv export written"
            );
            CommandResult::success(command, format!("wrote {rows} rows to `{}`", out.display()))
        }
        Err(error) => CommandResult::from_application_error(command, error),
    }
}
