use std::fs;
use std::path::PathBuf;

use clap::Args;
use dermastudio_analysis::provider_from_config;
use dermastudio_core::analysis::RawAnalysis;
use dermastudio_core::config::LoadOptions;
use dermastudio_core::{route_from_scores, AnalysisScores, RoutinePlan, SkinType};
use serde::Serialize;

use crate::commands::{load_context, CommandResult, EXIT_INTERNAL};

const COMMAND: &str = "analyze";

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    #[arg(long, help = "Face photo to send to the analysis provider")]
    pub image: PathBuf,
    #[arg(long, default_value = "normal")]
    pub skin_type: String,
}

#[derive(Debug, Serialize)]
struct AnalysisView {
    mode: &'static str,
    raw: RawAnalysis,
    scores: AnalysisScores,
    routine: RoutinePlan,
}

pub fn run(options: LoadOptions, args: AnalyzeArgs) -> CommandResult {
    let (config, catalog) = match load_context(COMMAND, options) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let image = match fs::read(&args.image) {
        Ok(bytes) if bytes.is_empty() => {
            return CommandResult::bad_request(
                COMMAND,
                format!("image `{}` is empty", args.image.display()),
            );
        }
        Ok(bytes) => bytes,
        Err(error) => {
            return CommandResult::bad_request(
                COMMAND,
                format!("could not read image `{}`: {error}", args.image.display()),
            );
        }
    };

    let provider = match provider_from_config(&config.analysis) {
        Ok(provider) => provider,
        Err(error) => return CommandResult::from_application_error(COMMAND, error),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                EXIT_INTERNAL,
            );
        }
    };

    let raw = match runtime.block_on(provider.analyze(&image)) {
        Ok(raw) => raw,
        Err(error) => return CommandResult::from_application_error(COMMAND, error),
    };

    let scores = raw.scores();
    let routine = route_from_scores(&scores, SkinType::parse_lenient(&args.skin_type), &catalog);
    let message = match raw.notes.as_deref() {
        Some(notes) => format!("analysis via {}: {notes}", provider.mode()),
        None => format!("analysis via {}", provider.mode()),
    };

    CommandResult::success_with_data(
        COMMAND,
        message,
        AnalysisView { mode: provider.mode(), raw, scores, routine },
    )
}

