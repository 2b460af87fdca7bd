use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogSource;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub clients: ClientsConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// CSV catalog; the embedded studio catalog is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ClientsConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub mode: AnalysisMode,
    pub endpoint: Option<String>,
    pub bearer_token: Option<SecretString>,
    pub api_key: Option<SecretString>,
    pub api_secret: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Mock,
    BearerJson,
    FormdataFacepp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub clients_path: Option<PathBuf>,
    pub analysis_mode: Option<AnalysisMode>,
    pub analysis_endpoint: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { path: None },
            clients: ClientsConfig { path: PathBuf::from("clients.csv") },
            analysis: AnalysisConfig {
                mode: AnalysisMode::Mock,
                endpoint: None,
                bearer_token: None,
                api_key: None,
                api_secret: None,
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::BearerJson => "bearer_json",
            Self::FormdataFacepp => "formdata_facepp",
        }
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "bearer_json" => Ok(Self::BearerJson),
            "formdata_facepp" => Ok(Self::FormdataFacepp),
            other => Err(ConfigError::Validation(format!(
                "unsupported analysis mode `{other}` (expected mock|bearer_json|formdata_facepp)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("dermastudio.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn catalog_source(&self) -> CatalogSource {
        match &self.catalog.path {
            Some(path) => CatalogSource::CsvFile(path.clone()),
            None => CatalogSource::Embedded,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(clients) = patch.clients {
            if let Some(path) = clients.path {
                self.clients.path = path;
            }
        }

        if let Some(analysis) = patch.analysis {
            if let Some(mode) = analysis.mode {
                self.analysis.mode = mode;
            }
            if let Some(endpoint) = analysis.endpoint {
                self.analysis.endpoint = Some(endpoint);
            }
            if let Some(bearer_token) = analysis.bearer_token {
                self.analysis.bearer_token = Some(secret_value(bearer_token));
            }
            if let Some(api_key) = analysis.api_key {
                self.analysis.api_key = Some(secret_value(api_key));
            }
            if let Some(api_secret) = analysis.api_secret {
                self.analysis.api_secret = Some(secret_value(api_secret));
            }
            if let Some(timeout_secs) = analysis.timeout_secs {
                self.analysis.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DERMA_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("DERMA_CLIENTS_PATH") {
            self.clients.path = PathBuf::from(value);
        }

        if let Some(value) = read_env("DERMA_ANALYSIS_MODE") {
            self.analysis.mode = value.parse()?;
        }
        if let Some(value) = read_env("DERMA_ANALYSIS_ENDPOINT") {
            self.analysis.endpoint = Some(value);
        }
        if let Some(value) = read_env("DERMA_ANALYSIS_BEARER_TOKEN") {
            self.analysis.bearer_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("DERMA_ANALYSIS_API_KEY") {
            self.analysis.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("DERMA_ANALYSIS_API_SECRET") {
            self.analysis.api_secret = Some(secret_value(value));
        }
        if let Some(value) = read_env("DERMA_ANALYSIS_TIMEOUT_SECS") {
            self.analysis.timeout_secs = parse_u64("DERMA_ANALYSIS_TIMEOUT_SECS", &value)?;
        }

        let log_level = read_env("DERMA_LOGGING_LEVEL").or_else(|| read_env("DERMA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("DERMA_LOGGING_FORMAT").or_else(|| read_env("DERMA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(clients_path) = overrides.clients_path {
            self.clients.path = clients_path;
        }
        if let Some(mode) = overrides.analysis_mode {
            self.analysis.mode = mode;
        }
        if let Some(endpoint) = overrides.analysis_endpoint {
            self.analysis.endpoint = Some(endpoint);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_clients(&self.clients)?;
        validate_analysis(&self.analysis)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("dermastudio.toml"), PathBuf::from("config/dermastudio.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if let Some(path) = &catalog.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.path must not be empty (omit it to use the embedded catalog)".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_clients(clients: &ClientsConfig) -> Result<(), ConfigError> {
    if clients.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("clients.path must not be empty".to_string()));
    }
    Ok(())
}

fn validate_analysis(analysis: &AnalysisConfig) -> Result<(), ConfigError> {
    if analysis.timeout_secs == 0 || analysis.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "analysis.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    let has_secret = |value: &Option<SecretString>| {
        value.as_ref().map(|secret| !secret.expose_secret().trim().is_empty()).unwrap_or(false)
    };

    match analysis.mode {
        AnalysisMode::Mock => return Ok(()),
        AnalysisMode::BearerJson => {
            if !has_secret(&analysis.bearer_token) {
                return Err(ConfigError::Validation(
                    "analysis.bearer_token is required for bearer_json mode".to_string(),
                ));
            }
        }
        AnalysisMode::FormdataFacepp => {
            if !has_secret(&analysis.api_key) || !has_secret(&analysis.api_secret) {
                return Err(ConfigError::Validation(
                    "analysis.api_key and analysis.api_secret are required for formdata_facepp mode"
                        .to_string(),
                ));
            }
        }
    }

    let endpoint = analysis.endpoint.as_deref().map(str::trim).unwrap_or("");
    if endpoint.is_empty() {
        return Err(ConfigError::Validation(format!(
            "analysis.endpoint is required for {} mode",
            analysis.mode.as_str()
        )));
    }
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(
            "analysis.endpoint must start with http:// or https://".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    clients: Option<ClientsPatch>,
    analysis: Option<AnalysisPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ClientsPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisPatch {
    mode: Option<AnalysisMode>,
    endpoint: Option<String>,
    bearer_token: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
