//! Grounded conversation session
//!
//! A `ChatSession` is scoped to one document + agenda pair. Its wire
//! history is seeded with a grounding turn (full document text plus the
//! serialized agenda) and an acknowledgment turn, after which every user
//! question is answered strictly from that material.
//!
//! Failures during a turn are swallowed into a synthetic transcript entry
//! instead of propagating; the session stays usable and the next question
//! can be asked immediately.

use crate::agenda::Agenda;
use crate::document::Document;
use crate::llm::{GenerativeProvider, Message};
use crate::secrets::scrub_secrets;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Acknowledgment the model is seeded with, also the first visible entry.
const READY_MESSAGE: &str =
    "Understood. I'm ready to answer questions about the document and the agenda. How can I help?";

/// Transcript entry shown when a turn fails.
const ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Role of a visible transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One visible transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

/// A question-answering context tied to one generated agenda.
pub struct ChatSession {
    provider: Arc<dyn GenerativeProvider>,

    /// Full wire history forwarded to the provider on every turn,
    /// including the seeded grounding and acknowledgment turns.
    history: Vec<Message>,

    /// Visible transcript, append-only for the session's lifetime.
    transcript: Vec<ChatMessage>,
}

impl ChatSession {
    /// Create a session seeded with the document and its generated agenda.
    pub fn new(provider: Arc<dyn GenerativeProvider>, document: &Document, agenda: &Agenda) -> Self {
        let grounding = build_grounding_context(document, agenda);

        let history = vec![Message::user(grounding), Message::model(READY_MESSAGE)];
        let transcript = vec![ChatMessage::model(READY_MESSAGE)];

        Self {
            provider,
            history,
            transcript,
        }
    }

    /// Ask a question within the seeded context.
    ///
    /// Appends exactly one user entry and then exactly one model entry to
    /// the transcript: the reply on success, a synthetic error line on
    /// failure. Never returns an error; returns the model entry that was
    /// appended.
    pub async fn ask(&mut self, question: &str) -> &ChatMessage {
        self.transcript.push(ChatMessage::user(question));
        self.history.push(Message::user(question));

        debug!(turns = self.history.len(), "forwarding chat question");

        match self.provider.converse(&self.history).await {
            Ok(reply) => {
                self.history.push(Message::model(reply.clone()));
                self.transcript.push(ChatMessage::model(reply));
            }
            Err(err) => {
                warn!(error = %scrub_secrets(&err.to_string()), "chat turn failed");
                // Drop the unanswered question from the wire history so the
                // next turn is not paired with a question the model never
                // saw. The transcript keeps it.
                self.history.pop();
                self.transcript.push(ChatMessage::model(ERROR_MESSAGE));
            }
        }

        self.transcript
            .last()
            .unwrap_or_else(|| unreachable!("transcript entry was just pushed"))
    }

    /// The visible transcript, in submission order.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// The wire history, seeded turns included. Exposed for tests and
    /// diagnostics.
    pub fn history(&self) -> &[Message] {
        &self.history
    }
}

/// Build the grounding turn embedding the document and agenda.
///
/// The model is directed to answer only from this material and to say so
/// when the answer is absent.
fn build_grounding_context(document: &Document, agenda: &Agenda) -> String {
    // Serialization of Agenda cannot fail: all fields are strings/ints.
    let agenda_json =
        serde_json::to_string_pretty(agenda).unwrap_or_else(|_| "{}".to_string());

    format!(
        "CONTEXT: You are a helpful assistant. The user has uploaded a document \
         and you have generated a meeting agenda from it. Now, answer the user's \
         questions based ONLY on this document and agenda. Do not use external \
         knowledge. If the answer isn't in the provided text, say that you cannot \
         find the answer in the document.\n\n\
         --- DOCUMENT CONTENT ---\n{}\n--------------------------\n\n\
         --- GENERATED AGENDA ---\n{}\n--------------------------\n",
        document.text, agenda_json
    )
}
