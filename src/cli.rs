//! CLI interface for docket
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Docket — meeting agendas from documents
///
/// Turns a text document into a structured meeting agenda (title,
/// stakeholders, timed topics) using a generative language model, then lets
/// you ask grounded questions about the document and the agenda.
#[derive(Parser, Debug)]
#[command(name = "docket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a meeting agenda from a document
    Generate {
        /// Path to a plain-text document
        file: PathBuf,
    },

    /// Generate an agenda, then ask questions about it interactively
    Chat {
        /// Path to a plain-text document
        file: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check configuration, credentials and service reachability
    Doctor,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Store the Gemini API key in the OS keychain
    SetKey {
        /// The API key value
        key: String,
    },
}
