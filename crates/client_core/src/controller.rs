//! Chat view state and the user-facing workflows that mutate it.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::domain::{DocumentEntry, Message, Session};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::gateway::{DocumentGateway, DocumentUpload, TransportResult};

pub const ANSWER_SOURCE: &str = "MentorAI Brain";
pub const SYSTEM_SOURCE: &str = "System";
pub const CHAT_FAILED_TEXT: &str = "⚠️ I couldn't connect to the server. Is the backend running?";
pub const UPLOAD_FAILED_TEXT: &str = "❌ Failed to read the file. Please try a text-based PDF.";
pub const DELETE_CONFIRM_PROMPT: &str =
    "Are you sure you want to clear all documents? This will reset your AI's memory.";
pub const DELETE_FAILED_ALERT: &str = "Failed to delete files.";
pub const DELETE_DONE_TEXT: &str = "🗑️ All documents have been deleted. Memory reset.";

pub fn uploading_text(filename: &str) -> String {
    format!("Uploading {filename}...")
}

pub fn upload_done_text(filename: &str) -> String {
    format!("✅ I have read **{filename}**. You can now ask me questions about it!")
}

/// Blocking dialogs the controller needs from whatever view hosts it.
#[async_trait]
pub trait UserPrompter: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
    async fn alert(&self, message: &str);
}

/// Canned prompts offered next to the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Ask,
    Summarize,
    Quiz,
}

impl QuickAction {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Ask => "Ask a question...",
            Self::Summarize => "Summarize this document",
            Self::Quiz => "Create a Quiz from this",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub session: Session,
    pub transcript: Vec<Message>,
    pub documents: Vec<DocumentEntry>,
    pub typing: bool,
    pub sidebar_open: bool,
}

impl ChatState {
    pub fn greeting(&self) -> Option<String> {
        (self.session.started && self.transcript.is_empty())
            .then(|| format!("Hi {}", self.session.user_name))
    }
}

/// Owns the chat state; every mutation goes through one of its workflows.
///
/// Workflows take `&self` and never hold the state lock across a backend call,
/// so overlapping actions are allowed and their replies land in the transcript
/// in completion order.
#[derive(Clone)]
pub struct ChatController {
    gateway: Arc<dyn DocumentGateway>,
    prompter: Arc<dyn UserPrompter>,
    state: Arc<Mutex<ChatState>>,
    next_request_id: Arc<AtomicU64>,
}

impl ChatController {
    pub fn new(gateway: Arc<dyn DocumentGateway>, prompter: Arc<dyn UserPrompter>) -> Self {
        Self {
            gateway,
            prompter,
            state: Arc::new(Mutex::new(ChatState::default())),
            next_request_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn snapshot(&self) -> ChatState {
        self.state.lock().await.clone()
    }

    pub async fn greeting(&self) -> Option<String> {
        self.state.lock().await.greeting()
    }

    /// Initial sidebar sync when the view comes up.
    pub async fn start(&self) {
        if self.refresh_document_list().await {
            info!("controller: initial document sync complete");
        }
    }

    /// Starts the session. Only a confirmed, non-blank name is accepted and the
    /// first accepted name sticks. Returns whether this call started it.
    pub async fn submit_name(&self, value: &str, confirmed: bool) -> bool {
        let name = value.trim();
        if !confirmed || name.is_empty() {
            return false;
        }

        let mut state = self.state.lock().await;
        if state.session.started {
            return false;
        }
        state.session = Session {
            user_name: name.to_string(),
            started: true,
        };
        state.sidebar_open = true;
        info!(user_name = %name, "controller: session started");
        true
    }

    pub async fn close_sidebar(&self) {
        self.state.lock().await.sidebar_open = false;
    }

    pub async fn open_sidebar(&self) {
        self.state.lock().await.sidebar_open = true;
    }

    pub async fn send_message(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let request_id = self.request_id();
        {
            let mut state = self.state.lock().await;
            state.transcript.push(Message::user(text));
            state.typing = true;
        }
        debug!(request_id, "chat: question sent");

        let reply = match self.gateway.ask_question(text).await {
            Ok(answer) => {
                info!(request_id, "chat: answer received");
                Message::bot_text(answer).with_source(ANSWER_SOURCE)
            }
            Err(err) => {
                warn!(request_id, error = %err, "chat: question failed");
                Message::bot_text(CHAT_FAILED_TEXT)
            }
        };

        let mut state = self.state.lock().await;
        state.transcript.push(reply);
        state.typing = false;
    }

    pub async fn send_quick_action(&self, action: QuickAction) {
        self.send_message(action.prompt()).await;
    }

    /// Uploads a document. The optimistic "Uploading" entry stays in the
    /// transcript even when the upload fails; the failure is appended after it.
    pub async fn upload_document(&self, upload: Option<DocumentUpload>) {
        let Some(upload) = upload else {
            return;
        };

        let request_id = self.request_id();
        let filename = upload.filename.clone();
        {
            let mut state = self.state.lock().await;
            state.transcript.push(Message::user(uploading_text(&filename)));
            state.typing = true;
        }
        info!(request_id, filename = %filename, "upload: started");

        let reply = match self.gateway.upload_document(upload).await {
            Ok(_) => {
                self.refresh_document_list().await;
                info!(request_id, filename = %filename, "upload: document ingested");
                Message::bot_text(upload_done_text(&filename)).with_source(SYSTEM_SOURCE)
            }
            Err(err) => {
                warn!(request_id, filename = %filename, error = %err, "upload: failed");
                Message::bot_text(UPLOAD_FAILED_TEXT)
            }
        };

        let mut state = self.state.lock().await;
        state.transcript.push(reply);
        state.typing = false;
    }

    /// Returns whether the documents were actually deleted.
    pub async fn delete_all_documents(&self) -> bool {
        if !self.prompter.confirm(DELETE_CONFIRM_PROMPT).await {
            debug!("documents: delete all declined");
            return false;
        }

        let request_id = self.request_id();
        match self.gateway.delete_all_documents().await {
            Ok(_) => {
                let mut state = self.state.lock().await;
                state.documents.clear();
                state.transcript.push(Message::bot(DELETE_DONE_TEXT));
                info!(request_id, "documents: all deleted");
                true
            }
            Err(err) => {
                warn!(request_id, error = %err, "documents: delete all failed");
                self.prompter.alert(DELETE_FAILED_ALERT).await;
                false
            }
        }
    }

    /// Replaces the local list with the server's listing. On failure the
    /// previous list is kept and nothing is shown to the user.
    pub async fn refresh_document_list(&self) -> bool {
        match self.gateway.list_documents().await {
            Ok(files) => {
                let documents = files.into_iter().map(DocumentEntry::from).collect();
                self.state.lock().await.documents = documents;
                true
            }
            Err(err) => {
                warn!(error = %err, "documents: could not fetch listing; keeping previous list");
                false
            }
        }
    }

    pub async fn health(&self) -> TransportResult<String> {
        self.gateway.health().await
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
