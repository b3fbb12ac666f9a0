// Roster team balancing engine
// Main entry point for the roster binary

use clap::Parser;
use roster_engine::cli::{Cli, Command};
use roster_engine::config::Config;
use roster_engine::handlers::{
    handle_build, handle_clear, handle_import, handle_members, handle_teams, OutputFormat,
};
use roster_engine::telemetry::{effective_level, init_telemetry_with_level};
use sdk::errors::{EngineError, RosterErrorExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // RUST_LOG still takes precedence inside the filter
    init_telemetry_with_level(effective_level(cli.log.as_deref(), &config.core.log_level));

    tracing::info!("Roster v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Command::Build { total, teams } => handle_build(total, teams, &config, format).await,
        Command::Teams => handle_teams(&config, format).await,
        Command::Clear => handle_clear(&config, format).await,
        Command::Import { file } => handle_import(&file, &config, format).await,
        Command::Members => handle_members(&config, format).await,
    };

    if let Err(err) = &result {
        if let Some(engine) = err.downcast_ref::<EngineError>() {
            eprintln!("Hint: {}", engine.user_hint());
        }
    }

    result
}
