// Docket
// Main entry point for the docket binary

use clap::Parser;
use docket_engine::cli::{Cli, Command, ConfigAction};
use docket_engine::config::Config;
use docket_engine::handlers::{
    handle_chat, handle_config_path, handle_config_set_key, handle_config_show, handle_doctor,
    handle_generate, OutputFormat,
};
use docket_engine::telemetry::init_telemetry_with_level;

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

    // Install telemetry once, with the effective level: --log beats config;
    // RUST_LOG (if set) beats both inside the subscriber.
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    tracing::debug!("docket v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Generate { file } => {
            tracing::info!("generating agenda from {}", file.display());
            handle_generate(&file, &config, format).await
        }

        Command::Chat { file } => {
            tracing::info!("starting chat session for {}", file.display());
            handle_chat(&file, &config).await
        }

        Command::Config { action } => match action {
            ConfigAction::Show => handle_config_show(&config, format),
            ConfigAction::Path => handle_config_path(),
            ConfigAction::SetKey { key } => handle_config_set_key(&key),
        },

        Command::Doctor => handle_doctor(&config, format).await,
    }
}
