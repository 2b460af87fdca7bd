pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use dermastudio_core::config::{AnalysisMode, AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

use commands::allocate::AllocateArgs;
use commands::analyze::AnalyzeArgs;
use commands::catalog::CatalogArgs;
use commands::client::ClientCommand;
use commands::export::ExportCommand;
use commands::matching::MatchArgs;
use commands::plan::PlanArgs;
use commands::route::RouteArgs;
use commands::routine::RoutineArgs;

#[derive(Debug, Parser)]
#[command(
    name = "dermastudio",
    about = "Derma studio consultation CLI",
    long_about = "Match products to client profiles, allocate budgets, route routines from skin \
                  analysis scores, and keep the clients register.",
    after_help = "Examples:\n  \
                  dermastudio doctor --json\n  \
                  dermastudio match --category serum --skin-type oily --concern acne\n  \
                  dermastudio allocate --budget 2500 --skin-type dry\n  \
                  dermastudio route --acne 45 --hydration 30"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Config file (defaults to dermastudio.toml or config/dermastudio.toml)"
    )]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog CSV overriding catalog.path")]
    catalog_file: Option<PathBuf>,
    #[arg(long, global = true, help = "Clients register CSV overriding clients.path")]
    clients_file: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level overriding logging.level")]
    log_level: Option<String>,
    #[arg(
        long,
        global = true,
        value_parser = parse_analysis_mode,
        help = "Analysis provider overriding analysis.mode (mock|bearer_json|formdata_facepp)"
    )]
    analysis_mode: Option<AnalysisMode>,
    #[arg(long, global = true, help = "Analysis endpoint URL overriding analysis.endpoint")]
    analysis_endpoint: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog, analysis provider, and clients register")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Browse the catalog and total a product selection")]
    Catalog(CatalogArgs),
    #[command(about = "List products of one category that fit a skin profile")]
    Match(MatchArgs),
    #[command(about = "Pick one product per category within a budget")]
    Allocate(AllocateArgs),
    #[command(about = "Build AM/PM routines and suggestions from analysis scores")]
    Route(RouteArgs),
    #[command(about = "Budget allocation and routine for one consultation")]
    Plan(PlanArgs),
    #[command(about = "Send a face photo to the analysis provider and route the result")]
    Analyze(AnalyzeArgs),
    #[command(subcommand, about = "Record and list consultation clients")]
    Client(ClientCommand),
    #[command(subcommand, about = "Export the catalog or the clients register as CSV")]
    Export(ExportCommand),
    #[command(about = "Track today's progress through a skincare routine")]
    Routine(RoutineArgs),
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                catalog_path: self.catalog_file.clone(),
                clients_path: self.clients_file.clone(),
                analysis_mode: self.analysis_mode,
                analysis_endpoint: self.analysis_endpoint.clone(),
                log_level: self.log_level.clone(),
            },
        }
    }
}

fn parse_analysis_mode(value: &str) -> Result<AnalysisMode, String> {
    value.parse::<AnalysisMode>().map_err(|error| error.to_string())
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    // Commands report config failures themselves; logging falls back to defaults.
    let logging_config = AppConfig::load(options.clone()).unwrap_or_default();
    if let Err(error) = init_logging(&logging_config) {
        eprintln!("logging disabled: {error}");
    }

    let result = match cli.command {
        Command::Config => commands::config::run(options),
        Command::Doctor { json } => commands::doctor::run(options, json),
        Command::Catalog(args) => commands::catalog::run(options, args),
        Command::Match(args) => commands::matching::run(options, args),
        Command::Allocate(args) => commands::allocate::run(options, args),
        Command::Route(args) => commands::route::run(options, args),
        Command::Plan(args) => commands::plan::run(options, args),
        Command::Analyze(args) => commands::analyze::run(options, args),
        Command::Client(command) => commands::client::run(options, command),
        Command::Export(command) => commands::export::run(options, command),
        Command::Routine(args) => commands::routine::run(args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only command payloads.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}
