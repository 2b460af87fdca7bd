use std::fs;

use dermastudio_analysis::provider_from_config;
use dermastudio_core::catalog;
use dermastudio_core::config::{AppConfig, LoadOptions};
use dermastudio_core::export::read_clients_csv;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\
                 \"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
            checks.push(check_analysis_provider(&config));
            checks.push(check_clients_register(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["catalog_load", "analysis_provider", "clients_register"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    match catalog::load(&config.catalog_source()) {
        Ok(catalog) if catalog.is_empty() => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Fail,
            details: "catalog loaded but contains no products".to_string(),
        },
        Ok(catalog) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Pass,
            details: format!("{} products available", catalog.len()),
        },
        Err(error) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_analysis_provider(config: &AppConfig) -> DoctorCheck {
    match provider_from_config(&config.analysis) {
        Ok(provider) => DoctorCheck {
            name: "analysis_provider",
            status: CheckStatus::Pass,
            details: format!("`{}` provider ready", provider.mode()),
        },
        Err(error) => DoctorCheck {
            name: "analysis_provider",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_clients_register(config: &AppConfig) -> DoctorCheck {
    let path = &config.clients.path;
    if !path.exists() {
        return DoctorCheck {
            name: "clients_register",
            status: CheckStatus::Pass,
            details: format!("`{}` will be created on first intake", path.display()),
        };
    }

    let result = fs::File::open(path)
        .map_err(|error| error.to_string())
        .and_then(|file| read_clients_csv(file).map_err(|error| error.to_string()));

    match result {
        Ok(clients) => DoctorCheck {
            name: "clients_register",
            status: CheckStatus::Pass,
            details: format!("{} clients in `{}`", clients.len(), path.display()),
        },
        Err(error) => {
            DoctorCheck { name: "clients_register", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
