use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dermastudio_core::config::{ConfigOverrides, LoadOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult};

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

struct SourceLookup {
    flags: Vec<(&'static str, &'static str)>,
    doc: Option<Value>,
    path: Option<PathBuf>,
}

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let flags = flag_sources(&options.overrides);
    let config = match load_config(COMMAND, options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let lookup = SourceLookup {
        flags,
        doc: load_config_file_doc(config_file_path.as_deref()),
        path: config_file_path,
    };

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<embedded>".to_string());

    let entries = vec![
        lookup.entry("catalog.path", catalog_path, &["DERMA_CATALOG_PATH"]),
        lookup.entry(
            "clients.path",
            config.clients.path.display().to_string(),
            &["DERMA_CLIENTS_PATH"],
        ),
        lookup.entry(
            "analysis.mode",
            config.analysis.mode.as_str().to_string(),
            &["DERMA_ANALYSIS_MODE"],
        ),
        lookup.entry(
            "analysis.endpoint",
            config.analysis.endpoint.clone().unwrap_or_else(|| "<unset>".to_string()),
            &["DERMA_ANALYSIS_ENDPOINT"],
        ),
        lookup.entry(
            "analysis.bearer_token",
            redact_secret(config.analysis.bearer_token.as_ref()),
            &["DERMA_ANALYSIS_BEARER_TOKEN"],
        ),
        lookup.entry(
            "analysis.api_key",
            redact_secret(config.analysis.api_key.as_ref()),
            &["DERMA_ANALYSIS_API_KEY"],
        ),
        lookup.entry(
            "analysis.api_secret",
            redact_secret(config.analysis.api_secret.as_ref()),
            &["DERMA_ANALYSIS_API_SECRET"],
        ),
        lookup.entry(
            "analysis.timeout_secs",
            config.analysis.timeout_secs.to_string(),
            &["DERMA_ANALYSIS_TIMEOUT_SECS"],
        ),
        lookup.entry(
            "logging.level",
            config.logging.level.clone(),
            &["DERMA_LOGGING_LEVEL", "DERMA_LOG_LEVEL"],
        ),
        lookup.entry(
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["DERMA_LOGGING_FORMAT", "DERMA_LOG_FORMAT"],
        ),
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    lines.extend(entries.iter().map(render_line));

    CommandResult::success_with_data(COMMAND, lines.join("\n"), entries)
}

impl SourceLookup {
    fn entry(&self, key: &'static str, value: String, env_keys: &[&str]) -> ConfigEntry {
        ConfigEntry { key, value, source: self.field_source(key, env_keys) }
    }

    fn field_source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some((_, flag)) = self.flags.iter().find(|(key, _)| *key == key_path) {
            return format!("flag ({flag})");
        }

        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

/// Config keys set by command-line flags, paired with the flag that set them.
fn flag_sources(overrides: &ConfigOverrides) -> Vec<(&'static str, &'static str)> {
    let mut flags = Vec::new();
    if overrides.catalog_path.is_some() {
        flags.push(("catalog.path", "--catalog-file"));
    }
    if overrides.clients_path.is_some() {
        flags.push(("clients.path", "--clients-file"));
    }
    if overrides.analysis_mode.is_some() {
        flags.push(("analysis.mode", "--analysis-mode"));
    }
    if overrides.analysis_endpoint.is_some() {
        flags.push(("analysis.endpoint", "--analysis-endpoint"));
    }
    if overrides.log_level.is_some() {
        flags.push(("logging.level", "--log-level"));
    }
    flags
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("dermastudio.toml"), PathBuf::from("config/dermastudio.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(entry: &ConfigEntry) -> String {
    format!("- {} = {} (source: {})", entry.key, entry.value, entry.source)
}

/// Keeps at most a four-character prefix of a credential visible.
fn redact_secret(secret: Option<&SecretString>) -> String {
    let Some(secret) = secret else {
        return "<unset>".to_string();
    };

    let trimmed = secret.expose_secret().trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if trimmed.chars().count() > 8 {
        let prefix: String = trimmed.chars().take(4).collect();
        return format!("{prefix}***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use dermastudio_core::config::ConfigOverrides;
    use secrecy::SecretString;
    use toml::Value;

    use super::{contains_path, flag_sources, redact_secret, SourceLookup};

    #[test]
    fn secrets_are_never_echoed_in_full() {
        let long = SecretString::from("sk-live-0123456789".to_owned());
        let short = SecretString::from("abc123".to_owned());
        let blank = SecretString::from("   ".to_owned());

        assert_eq!(redact_secret(Some(&long)), "sk-l***");
        assert_eq!(redact_secret(Some(&short)), "<redacted>");
        assert_eq!(redact_secret(Some(&blank)), "<empty>");
        assert_eq!(redact_secret(None), "<unset>");
    }

    #[test]
    fn nested_keys_are_found_in_file_document() {
        let doc: Value = "[analysis]\nmode = \"mock\"\n".parse().expect("toml document");
        assert!(contains_path(&doc, "analysis.mode"));
        assert!(!contains_path(&doc, "analysis.endpoint"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn flags_outrank_file_and_env_in_source_attribution() {
        let overrides = ConfigOverrides {
            catalog_path: Some(PathBuf::from("products.csv")),
            log_level: Some("debug".to_owned()),
            ..ConfigOverrides::default()
        };
        let lookup = SourceLookup {
            flags: flag_sources(&overrides),
            doc: Some(
                "[catalog]\npath = \"file.csv\"\n[clients]\npath = \"clients.csv\"\n"
                    .parse()
                    .expect("toml document"),
            ),
            path: Some(PathBuf::from("dermastudio.toml")),
        };

        assert_eq!(
            lookup.field_source("catalog.path", &["DERMA_UNSET_FOR_FLAG_TEST"]),
            "flag (--catalog-file)"
        );
        assert_eq!(lookup.field_source("logging.level", &[]), "flag (--log-level)");
        assert_eq!(lookup.field_source("clients.path", &[]), "file (dermastudio.toml)");
        assert_eq!(lookup.field_source("analysis.mode", &[]), "default");
    }
}
