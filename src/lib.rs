//! Docket Engine Library
//!
//! This library provides the core functionality of docket: turning a text
//! document into a structured meeting agenda via a generative language
//! model, and answering grounded questions about the document and agenda.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Secret management module
pub mod secrets;

/// Generative provider abstraction layer
pub mod llm;

/// Document loading module
pub mod document;

/// Agenda extraction module
pub mod agenda;

/// Grounded conversation module
pub mod chat;

/// Session state module
pub mod session;

/// Terminal rendering module
pub mod render;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
