//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - generate: produce an agenda from a document and render it
//! - chat: generate an agenda, then run an interactive grounded Q&A loop
//! - config show/path/set-key: inspect and manage configuration
//! - doctor: validate configuration and check credentials/reachability

use anyhow::{anyhow, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::document::Document;
use crate::llm::gemini::GeminiProvider;
use crate::render::{render_agenda, render_chat_message};
use crate::secrets::{scrub_secrets, SecretManager, GEMINI_KEY_ENV, GEMINI_KEY_NAME};
use crate::session::Session;

/// Keychain service name for docket secrets.
const KEYCHAIN_SERVICE: &str = "docket";

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Build the Gemini provider from config plus the resolved API key.
fn build_provider(config: &Config) -> Result<GeminiProvider> {
    let secret_manager = SecretManager::new(KEYCHAIN_SERVICE);
    let api_key = secret_manager
        .get_secret(GEMINI_KEY_NAME, GEMINI_KEY_ENV)
        .context("No Gemini API key available")?;

    Ok(GeminiProvider::new(config.llm.gemini.clone(), api_key))
}

/// Load the document and generate an agenda into a fresh session.
async fn generate_into_session(file: &Path, config: &Config) -> Result<Session> {
    let provider = Arc::new(build_provider(config)?);
    let mut session = Session::new(provider);

    let document = Document::from_path(file)
        .with_context(|| format!("Failed to load document {}", file.display()))?;

    tracing::info!(name = %document.name, chars = document.text.len(), "document loaded");
    session.load_document(document);

    if let Err(err) = session.generate().await {
        // Scrub before surfacing: a failed request must never echo the key.
        return Err(anyhow!("{}", scrub_secrets(&err.to_string())))
            .context("Agenda generation failed");
    }

    Ok(session)
}

/// Generate an agenda from a document and render it.
pub async fn handle_generate(file: &Path, config: &Config, format: OutputFormat) -> Result<()> {
    let session = generate_into_session(file, config).await?;
    let agenda = session
        .agenda()
        .ok_or_else(|| anyhow!("Generation reported success but produced no agenda"))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(agenda)?);
        }
        OutputFormat::Text => {
            print!("{}", render_agenda(agenda));
        }
    }

    Ok(())
}

/// Generate an agenda, then answer questions about it interactively.
///
/// The loop is strictly serial: each question is awaited before the next
/// line is read, so there is never more than one in-flight request.
pub async fn handle_chat(file: &Path, config: &Config) -> Result<()> {
    let mut session = generate_into_session(file, config).await?;

    if let Some(agenda) = session.agenda() {
        print!("{}", render_agenda(agenda));
        println!();
    }

    for entry in session.transcript() {
        println!("{}", render_chat_message(entry));
    }
    println!("(type a question, or 'exit' to quit)");

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if bytes == 0 {
            break; // EOF
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        let reply = session
            .ask(question)
            .await
            .map_err(|e| anyhow!(e.to_string()))?;
        println!("{}", render_chat_message(reply));
    }

    Ok(())
}

/// Show the current configuration.
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Text => {
            let rendered =
                toml::to_string_pretty(config).context("Failed to serialize configuration")?;
            print!("{}", rendered);
        }
    }
    Ok(())
}

/// Print the configuration file path.
pub fn handle_config_path() -> Result<()> {
    let path = Config::default_config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Store the Gemini API key in the OS keychain.
pub fn handle_config_set_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    let secret_manager = SecretManager::new(KEYCHAIN_SERVICE);
    secret_manager
        .set_secret(GEMINI_KEY_NAME, key.trim())
        .context("Failed to store API key")?;

    println!("API key stored in keychain.");
    Ok(())
}

/// Validate configuration and check credentials and provider health.
pub async fn handle_doctor(config: &Config, format: OutputFormat) -> Result<()> {
    use crate::llm::GenerativeProvider;

    let secret_manager = SecretManager::new(KEYCHAIN_SERVICE);
    let key_available = secret_manager.has_secret(GEMINI_KEY_NAME, GEMINI_KEY_ENV);

    let provider_healthy = if key_available {
        match build_provider(config) {
            Ok(provider) => provider.check_health().await,
            Err(_) => false,
        }
    } else {
        false
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "config_valid": true,
                    "api_key_available": key_available,
                    "provider_healthy": provider_healthy,
                    "model": config.llm.gemini.model,
                })
            );
        }
        OutputFormat::Text => {
            println!("Configuration: ok");
            println!("Model:         {}", config.llm.gemini.model);
            println!(
                "API key:       {}",
                if key_available {
                    "available"
                } else {
                    "missing (set GEMINI_API_KEY or run `docket config set-key`)"
                }
            );
            println!(
                "Provider:      {}",
                if provider_healthy { "ok" } else { "unavailable" }
            );
        }
    }

    if !key_available {
        return Err(anyhow!("No Gemini API key available"));
    }

    Ok(())
}
