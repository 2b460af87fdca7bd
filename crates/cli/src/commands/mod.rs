pub mod allocate;
pub mod analyze;
pub mod catalog;
pub mod client;
pub mod config;
pub mod doctor;
pub mod export;
pub mod matching;
pub mod plan;
pub mod route;
pub mod routine;

use clap::Args;
use dermastudio_core::catalog::{self as catalog_loader, Catalog};
use dermastudio_core::config::{AppConfig, LoadOptions};
use dermastudio_core::errors::ApplicationError;
use dermastudio_core::{AnalysisScores, SkinProfile};
use serde::Serialize;
use serde_json::Value;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_BAD_REQUEST: u8 = 4;
pub const EXIT_UNAVAILABLE: u8 = 5;
pub const EXIT_INTERNAL: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    /// Successful outcome carrying a structured `data` document.
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), EXIT_INTERNAL);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn bad_request(command: &str, message: impl Into<String>) -> Self {
        Self::failure(command, "bad_request", message, EXIT_BAD_REQUEST)
    }

    /// Maps an application failure through the interface error classes.
    pub fn from_application_error(command: &str, error: ApplicationError) -> Self {
        let message = error.to_string();
        let interface = error.into_interface(command);
        let exit_code = match interface.error_class() {
            "bad_request" => EXIT_BAD_REQUEST,
            "service_unavailable" => EXIT_UNAVAILABLE,
            _ => EXIT_INTERNAL,
        };
        Self::failure(command, interface.error_class(), message, exit_code)
    }
}

/// Skin type and concerns shared by the recommendation commands.
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    #[arg(long, help = "Client skin type (oily, dry, combination, sensitive, normal)")]
    pub skin_type: String,
    #[arg(long = "concern", value_delimiter = ',', help = "Concern tag; repeat or comma-separate")]
    pub concerns: Vec<String>,
}

impl ProfileArgs {
    pub fn profile(&self) -> SkinProfile {
        SkinProfile::from_tokens(&self.skin_type, &self.concerns)
    }
}

/// Analysis scores entered by hand; omitted values count as neutral.
#[derive(Debug, Clone, Default, Args)]
pub struct ScoreArgs {
    #[arg(long)]
    pub hydration: Option<f64>,
    #[arg(long)]
    pub acne: Option<f64>,
    #[arg(long)]
    pub spots: Option<f64>,
    #[arg(long)]
    pub pigmentation: Option<f64>,
}

impl ScoreArgs {
    pub fn scores(&self) -> AnalysisScores {
        AnalysisScores {
            hydration: self.hydration,
            acne: self.acne,
            spots: self.spots,
            pigmentation: self.pigmentation,
        }
    }
}

pub(crate) fn load_config(command: &str, options: LoadOptions) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options).map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG)
    })
}

pub(crate) fn load_catalog(command: &str, config: &AppConfig) -> Result<Catalog, CommandResult> {
    catalog_loader::load(&config.catalog_source()).map_err(|error| {
        CommandResult::failure(command, "catalog_load", error.to_string(), EXIT_CATALOG)
    })
}

/// Config and catalog together, the common preamble of catalog-backed commands.
pub(crate) fn load_context(
    command: &str,
    options: LoadOptions,
) -> Result<(AppConfig, Catalog), CommandResult> {
    let config = load_config(command, options)?;
    let catalog = load_catalog(command, &config)?;
    Ok((config, catalog))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\
             \"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use dermastudio_core::errors::{ApplicationError, DomainError};
    use serde_json::Value;

    use super::{CommandResult, EXIT_BAD_REQUEST, EXIT_UNAVAILABLE};

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).expect("payload is json")
    }

    #[test]
    fn success_payload_omits_data_when_absent() {
        let result = CommandResult::success("config", "loaded");
        let payload = parse(&result.output);
        assert_eq!(payload["status"], "ok");
        assert!(payload.get("data").is_none());
        assert!(payload["error_class"].is_null());
    }

    #[test]
    fn application_errors_map_to_interface_classes() {
        let unknown = CommandResult::from_application_error(
            "catalog",
            ApplicationError::Domain(DomainError::UnknownProduct("srm-x".to_owned())),
        );
        assert_eq!(unknown.exit_code, EXIT_BAD_REQUEST);
        assert_eq!(parse(&unknown.output)["error_class"], "bad_request");

        let offline = CommandResult::from_application_error(
            "analyze",
            ApplicationError::Integration("timeout".to_owned()),
        );
        assert_eq!(offline.exit_code, EXIT_UNAVAILABLE);
        assert_eq!(parse(&offline.output)["error_class"], "service_unavailable");
    }
}
