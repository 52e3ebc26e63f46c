//! Session state
//!
//! One `Session` owns everything scoped to the current document: the
//! document itself, the generated agenda (or the error that replaced it),
//! and the chat session seeded from both. Loading a new document cascades a
//! reset of all downstream state.
//!
//! Generations are epoch-guarded: a generation started against one document
//! carries a ticket stamped with the session epoch, and completing it after
//! a superseding `load_document` is a no-op. A late service response can
//! therefore never write into state a newer upload has already reset.

use crate::agenda::{self, Agenda, AgendaError};
use crate::chat::{ChatMessage, ChatSession};
use crate::document::Document;
use crate::llm::GenerativeProvider;
use std::sync::Arc;
use tracing::{info, warn};

/// Errors surfaced to the caller by session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No document loaded")]
    NoDocument,

    #[error("No active chat session; generate an agenda first")]
    NoChatSession,
}

/// Stamp tying a generation to the session state it started against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
}

/// The single owner of all per-document state.
pub struct Session {
    provider: Arc<dyn GenerativeProvider>,
    document: Option<Document>,
    agenda: Option<Agenda>,
    last_error: Option<String>,
    chat: Option<ChatSession>,
    epoch: u64,
}

impl Session {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            provider,
            document: None,
            agenda: None,
            last_error: None,
            chat: None,
            epoch: 0,
        }
    }

    /// Replace the current document, resetting everything derived from the
    /// previous one: agenda, error state, chat session and transcript.
    pub fn load_document(&mut self, document: Document) {
        info!(name = %document.name, "loading document, resetting session state");
        self.document = Some(document);
        self.agenda = None;
        self.last_error = None;
        self.chat = None;
        self.epoch += 1;
    }

    /// Generate an agenda for the current document and seed a new chat
    /// session from it.
    ///
    /// On failure the error is recorded as the user-facing message (taking
    /// the place of the agenda view) and also returned; the session permits
    /// retry by calling again.
    pub async fn generate(&mut self) -> Result<&Agenda, AgendaError> {
        let ticket = self.begin_generation()?;

        let text = self
            .document
            .as_ref()
            .map(|d| d.text.clone())
            .ok_or(AgendaError::NoContent)?;

        let result = agenda::generate_agenda(self.provider.as_ref(), &text).await;
        self.complete_generation(ticket, result)?;

        self.agenda.as_ref().ok_or(AgendaError::NoContent)
    }

    /// Start a generation: clears the previous agenda, error and chat
    /// session, and returns a ticket stamped with the current epoch.
    ///
    /// Fails with `NoContent` when no document is loaded or its text is
    /// empty, without touching the network.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, AgendaError> {
        let has_content = self
            .document
            .as_ref()
            .is_some_and(|d| !d.text.trim().is_empty());
        if !has_content {
            return Err(AgendaError::NoContent);
        }

        self.agenda = None;
        self.last_error = None;
        self.chat = None;

        Ok(GenerationTicket { epoch: self.epoch })
    }

    /// Apply the outcome of a generation started with `ticket`.
    ///
    /// If the session has been superseded since the ticket was issued (a
    /// new document was loaded), the result is discarded whole: neither the
    /// agenda nor the error state is touched.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<Agenda, AgendaError>,
    ) -> Result<(), AgendaError> {
        if ticket.epoch != self.epoch {
            warn!(
                ticket_epoch = ticket.epoch,
                session_epoch = self.epoch,
                "discarding stale generation result"
            );
            return Ok(());
        }

        match result {
            Ok(generated) => {
                if let Some(document) = &self.document {
                    self.chat = Some(ChatSession::new(
                        Arc::clone(&self.provider),
                        document,
                        &generated,
                    ));
                }
                self.agenda = Some(generated);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Ask a question in the current chat session.
    pub async fn ask(&mut self, question: &str) -> Result<&ChatMessage, SessionError> {
        let chat = self.chat.as_mut().ok_or(SessionError::NoChatSession)?;
        Ok(chat.ask(question).await)
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn agenda(&self) -> Option<&Agenda> {
        self.agenda.as_ref()
    }

    /// The user-facing error from the last failed generation, if the agenda
    /// view is currently replaced by one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Visible transcript of the current chat session; empty when none.
    pub fn transcript(&self) -> &[ChatMessage] {
        self.chat.as_ref().map(ChatSession::transcript).unwrap_or(&[])
    }

    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::Topic;
    use crate::llm::{LLMError, Message};
    use async_trait::async_trait;

    struct StubProvider;

    #[async_trait]
    impl GenerativeProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            _schema: &serde_json::Value,
        ) -> crate::llm::Result<serde_json::Value> {
            Err(LLMError::NetworkError("stub".to_string()))
        }

        async fn converse(&self, _history: &[Message]) -> crate::llm::Result<String> {
            Ok("stub reply".to_string())
        }
    }

    fn sample_agenda() -> Agenda {
        Agenda {
            title: "Review".to_string(),
            stakeholders: vec!["Team".to_string()],
            topics: vec![Topic {
                title: "Item".to_string(),
                duration: 15,
                summary: "Discuss.".to_string(),
            }],
        }
    }

    #[test]
    fn test_begin_generation_without_document_fails() {
        let mut session = Session::new(Arc::new(StubProvider));
        assert!(matches!(
            session.begin_generation(),
            Err(AgendaError::NoContent)
        ));
    }

    #[test]
    fn test_begin_generation_with_blank_document_fails() {
        let mut session = Session::new(Arc::new(StubProvider));
        session.load_document(Document::new("empty.txt", "   \n"));
        assert!(matches!(
            session.begin_generation(),
            Err(AgendaError::NoContent)
        ));
    }

    #[test]
    fn test_successful_generation_sets_agenda_and_chat() {
        let mut session = Session::new(Arc::new(StubProvider));
        session.load_document(Document::new("notes.txt", "content"));

        let ticket = session.begin_generation().unwrap();
        session
            .complete_generation(ticket, Ok(sample_agenda()))
            .unwrap();

        assert!(session.agenda().is_some());
        assert!(session.has_chat());
        assert!(session.last_error().is_none());
        // Seeded acknowledgment is visible.
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_failed_generation_records_error_and_leaves_agenda_none() {
        let mut session = Session::new(Arc::new(StubProvider));
        session.load_document(Document::new("notes.txt", "content"));

        let ticket = session.begin_generation().unwrap();
        let result = session.complete_generation(
            ticket,
            Err(AgendaError::InvalidResponseShape("missing title".to_string())),
        );

        assert!(result.is_err());
        assert!(session.agenda().is_none());
        assert!(session.last_error().unwrap().contains("missing title"));
    }

    #[test]
    fn test_load_document_resets_downstream_state() {
        let mut session = Session::new(Arc::new(StubProvider));
        session.load_document(Document::new("first.txt", "first"));

        let ticket = session.begin_generation().unwrap();
        session
            .complete_generation(ticket, Ok(sample_agenda()))
            .unwrap();
        assert!(session.agenda().is_some());

        session.load_document(Document::new("second.txt", "second"));
        assert!(session.agenda().is_none());
        assert!(!session.has_chat());
        assert!(session.transcript().is_empty());
        assert!(session.last_error().is_none());
        assert_eq!(session.document().unwrap().name, "second.txt");
    }

    #[test]
    fn test_stale_ticket_result_is_discarded() {
        let mut session = Session::new(Arc::new(StubProvider));
        session.load_document(Document::new("first.txt", "first"));
        let ticket = session.begin_generation().unwrap();

        // A new upload supersedes the in-flight generation.
        session.load_document(Document::new("second.txt", "second"));

        session
            .complete_generation(ticket, Ok(sample_agenda()))
            .unwrap();

        assert!(session.agenda().is_none());
        assert!(!session.has_chat());
    }

    #[test]
    fn test_stale_failure_does_not_surface_error() {
        let mut session = Session::new(Arc::new(StubProvider));
        session.load_document(Document::new("first.txt", "first"));
        let ticket = session.begin_generation().unwrap();

        session.load_document(Document::new("second.txt", "second"));

        let result = session.complete_generation(
            ticket,
            Err(AgendaError::Service(LLMError::RateLimitExceeded)),
        );

        assert!(result.is_ok());
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_ask_without_chat_session_errors() {
        let mut session = Session::new(Arc::new(StubProvider));
        let err = session.ask("anyone there?").await.unwrap_err();
        assert!(matches!(err, SessionError::NoChatSession));
    }

    #[tokio::test]
    async fn test_ask_delegates_to_chat() {
        let mut session = Session::new(Arc::new(StubProvider));
        session.load_document(Document::new("notes.txt", "content"));
        let ticket = session.begin_generation().unwrap();
        session
            .complete_generation(ticket, Ok(sample_agenda()))
            .unwrap();

        let reply = session.ask("what is on the agenda?").await.unwrap();
        assert_eq!(reply.content, "stub reply");
        assert_eq!(session.transcript().len(), 3);
    }
}
