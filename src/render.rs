//! Terminal rendering of agendas and transcripts

use crate::agenda::Agenda;
use crate::chat::{ChatMessage, ChatRole};
use std::fmt::Write;

/// Render an agenda as a timeline with running start offsets.
pub fn render_agenda(agenda: &Agenda) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", agenda.title);
    let _ = writeln!(out, "{}", "=".repeat(agenda.title.len()));
    let _ = writeln!(out);

    if !agenda.stakeholders.is_empty() {
        let _ = writeln!(out, "Stakeholders: {}", agenda.stakeholders.join(", "));
        let _ = writeln!(out);
    }

    let mut offset = 0u32;
    for topic in &agenda.topics {
        let _ = writeln!(
            out,
            "  {}  {} ({} min)",
            format_offset(offset),
            topic.title,
            topic.duration
        );
        let _ = writeln!(out, "         {}", topic.summary);
        offset += topic.duration;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total: {} minutes", agenda.total_duration());

    out
}

/// Render one transcript entry for the chat REPL.
pub fn render_chat_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        ChatRole::User => "you",
        ChatRole::Model => "docket",
    };
    format!("{}> {}", speaker, message.content)
}

/// Format a minute offset as `h:mm`.
fn format_offset(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
