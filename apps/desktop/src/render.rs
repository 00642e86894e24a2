//! Plain-text rendering of the chat state for the terminal.

use chrono::Local;
use client_core::ChatState;
use shared::domain::{Message, Role};

pub const ASSISTANT_NAME: &str = "MentorAI";
pub const TYPING_LINE: &str = "MentorAI is thinking...";

pub fn render_message(message: &Message) -> String {
    let time = message.sent_at.with_timezone(&Local).format("%H:%M");
    let speaker = match message.role {
        Role::User => "you",
        Role::Bot => ASSISTANT_NAME,
    };
    let mut out = format!("[{time}] {speaker}: {}", message.text);
    if let (Role::Bot, Some(source)) = (message.role, message.source.as_deref()) {
        out.push_str(&format!("\n    Source: {source}"));
    }
    out
}

pub fn render_sidebar(state: &ChatState) -> String {
    let mut out = String::from("Documents");
    if state.documents.is_empty() {
        out.push_str("\n  No files uploaded");
    } else {
        for doc in &state.documents {
            out.push_str(&format!("\n  - {}", doc.filename));
        }
    }
    out
}

/// Tracks how much of the transcript has been printed so each redraw only
/// emits new entries.
#[derive(Debug, Default)]
pub struct TranscriptCursor {
    printed: usize,
}

impl TranscriptCursor {
    pub fn take_new(&mut self, state: &ChatState) -> Vec<String> {
        let fresh = state
            .transcript
            .iter()
            .skip(self.printed)
            .map(render_message)
            .collect::<Vec<_>>();
        self.printed = state.transcript.len();
        fresh
    }
}
