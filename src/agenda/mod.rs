//! Agenda extraction
//!
//! Turns raw document text into a structured meeting agenda by sending an
//! extraction prompt plus a fixed response schema to the generative
//! provider, then validating the returned JSON against the local types.
//! No caching and no retries: every call goes to the service, and repeated
//! calls over the same document may legitimately produce different agendas.

use crate::llm::{GenerativeProvider, LLMError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

/// One discussion item within an agenda.
///
/// `duration` is an estimate in whole minutes. The unsigned type encodes
/// the non-negative invariant: a negative duration in a service response
/// fails shape validation instead of being stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// The main point or question for this discussion topic
    pub title: String,

    /// Estimated time allocation in minutes
    pub duration: u32,

    /// One-sentence summary of the discussion points or goals
    pub summary: String,
}

/// Structured output of document analysis: a meeting title, the
/// stakeholders who should attend, and an ordered list of timed topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    /// Meeting title summarizing the document's main purpose
    pub title: String,

    /// Key individuals, roles, or groups who should attend
    pub stakeholders: Vec<String>,

    /// Ordered discussion topics
    pub topics: Vec<Topic>,
}

impl Agenda {
    /// Total estimated meeting length in minutes.
    pub fn total_duration(&self) -> u32 {
        self.topics.iter().map(|t| t.duration).sum()
    }
}

/// Errors from agenda generation
#[derive(Debug, thiserror::Error)]
pub enum AgendaError {
    #[error("No document content to process")]
    NoContent,

    #[error("Generative service error: {0}")]
    Service(LLMError),

    #[error("Service response did not match the agenda schema: {0}")]
    InvalidResponseShape(String),
}

impl From<LLMError> for AgendaError {
    fn from(err: LLMError) -> Self {
        match err {
            // A response we could not read as the expected shape is a shape
            // failure, not a transport failure.
            LLMError::ParseError(msg) => AgendaError::InvalidResponseShape(msg),
            other => AgendaError::Service(other),
        }
    }
}

/// The fixed response schema sent alongside every extraction request.
///
/// Mirrors the Gemini structured-output schema dialect (upper-case type
/// names, `required` per object).
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A concise and relevant title for the meeting based on the document's content."
            },
            "stakeholders": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "A list of key individuals, roles, or groups mentioned or implied in the document who should attend the meeting."
            },
            "topics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "The main point or question for this specific discussion topic."
                        },
                        "duration": {
                            "type": "INTEGER",
                            "description": "An estimated time allocation in minutes required to discuss this topic."
                        },
                        "summary": {
                            "type": "STRING",
                            "description": "A brief, one-sentence summary of the discussion points or goals for this topic."
                        }
                    },
                    "required": ["title", "duration", "summary"]
                },
                "description": "A list of structured topics to be covered in the meeting."
            }
        },
        "required": ["title", "stakeholders", "topics"]
    })
}

/// Build the extraction prompt for a document.
fn build_prompt(document_text: &str) -> String {
    format!(
        "Based on the following document, create a detailed meeting agenda. \
         Identify the key stakeholders, the main topics for discussion, and \
         estimate a duration in minutes for each topic. The overall meeting \
         title should summarize the document's main purpose.\n\n\
         Document content:\n---\n{}\n---\n\n\
         Generate the agenda.",
        document_text
    )
}

/// Generate an agenda from document text.
///
/// Fails with [`AgendaError::NoContent`] before any network call when the
/// text is empty or whitespace-only. Shape mismatches in the service
/// response (missing fields, wrong types, negative durations) fail with
/// [`AgendaError::InvalidResponseShape`] and transport/service failures
/// with [`AgendaError::Service`].
pub async fn generate_agenda(
    provider: &dyn GenerativeProvider,
    document_text: &str,
) -> Result<Agenda, AgendaError> {
    if document_text.trim().is_empty() {
        return Err(AgendaError::NoContent);
    }

    let prompt = build_prompt(document_text);
    let schema = response_schema();

    debug!(
        provider = provider.name(),
        document_chars = document_text.len(),
        "requesting agenda extraction"
    );

    let value = provider.generate_structured(&prompt, &schema).await?;

    let agenda: Agenda = serde_json::from_value(value)
        .map_err(|e| AgendaError::InvalidResponseShape(e.to_string()))?;

    info!(
        topics = agenda.topics.len(),
        stakeholders = agenda.stakeholders.len(),
        total_minutes = agenda.total_duration(),
        "agenda generated"
    );

    Ok(agenda)
}
