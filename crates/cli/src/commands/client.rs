use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use clap::{Args, Subcommand};
use dermastudio_core::chrono::Utc;
use dermastudio_core::config::LoadOptions;
use dermastudio_core::errors::ApplicationError;
use dermastudio_core::export::{read_clients_csv, write_clients_csv};
use dermastudio_core::{ClientRecord, NewClient, SkinType};
use tracing::info;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Clone, Subcommand)]
pub enum ClientCommand {
    #[command(about = "Record a consultation intake in the clients register")]
    Add(ClientAddArgs),
    #[command(about = "List every client in the register")]
    List,
}

#[derive(Debug, Clone, Args)]
pub struct ClientAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub age: u8,
    #[arg(long)]
    pub skin_type: String,
    #[arg(long, default_value = "")]
    pub concerns: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

pub fn run(options: LoadOptions, command: ClientCommand) -> CommandResult {
    match command {
        ClientCommand::Add(args) => add(options, args),
        ClientCommand::List => list(options),
    }
}

fn add(options: LoadOptions, args: ClientAddArgs) -> CommandResult {
    const COMMAND: &str = "client-add";

    let config = match load_config(COMMAND, options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let Some(skin_type) = SkinType::parse_strict(&args.skin_type) else {
        return CommandResult::bad_request(
            COMMAND,
            format!("unknown skin type `{}`", args.skin_type.trim()),
        );
    };

    let intake = NewClient {
        name: args.name,
        age: args.age,
        skin_type,
        concerns: args.concerns,
        notes: args.notes,
    };

    let result = intake
        .validate(Utc::now())
        .map_err(ApplicationError::from)
        .and_then(|record| {
            let mut clients = read_register(&config.clients.path)?;
            clients.push(record.clone());
            write_register(&config.clients.path, &clients)?;
            Ok(record)
        });

    match result {
        Ok(record) => {
            info!(
                event_name = "client.intake.recorded",
                client_id = %record.id.0,
                skin_type = record.skin_type.as_str(),
                "client intake recorded"
            );
            CommandResult::success_with_data(
                COMMAND,
                format!("recorded client `{}` in `{}`", record.name, config.clients.path.display()),
                record,
            )
        }
        Err(error) => CommandResult::from_application_error(COMMAND, error),
    }
}

fn list(options: LoadOptions) -> CommandResult {
    const COMMAND: &str = "client-list";

    let config = match load_config(COMMAND, options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    match read_register(&config.clients.path) {
        Ok(clients) => CommandResult::success_with_data(
            COMMAND,
            format!("{} clients registered", clients.len()),
            clients,
        ),
        Err(error) => CommandResult::from_application_error(COMMAND, error),
    }
}

/// Reads the clients register; a register that does not exist yet is empty.
pub(crate) fn read_register(path: &Path) -> Result<Vec<ClientRecord>, ApplicationError> {
    match fs::File::open(path) {
        Ok(file) => read_clients_csv(file),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(error) => Err(ApplicationError::Export(format!(
            "could not open clients register `{}`: {error}",
            path.display()
        ))),
    }
}

pub(crate) fn write_register(
    path: &Path,
    clients: &[ClientRecord],
) -> Result<(), ApplicationError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|error| {
            ApplicationError::Export(format!("could not create `{}`: {error}", parent.display()))
        })?;
    }

    let file = fs::File::create(path).map_err(|error| {
        ApplicationError::Export(format!(
            "could not write clients register `{}`: {error}",
            path.display()
        ))
    })?;
    write_clients_csv(clients, file)
}
