use std::sync::Arc;

use async_trait::async_trait;
use client_core::UserPrompter;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    sync::Mutex,
};
use tracing::warn;

/// Line source shared between the REPL loop and blocking dialogs.
pub type SharedLines<R> = Arc<Mutex<Lines<R>>>;

pub fn shared_lines<R: AsyncBufRead + Unpin>(reader: R) -> SharedLines<R> {
    Arc::new(Mutex::new(reader.lines()))
}

pub struct TerminalPrompter<R> {
    input: SharedLines<R>,
}

impl<R> TerminalPrompter<R> {
    pub fn new(input: SharedLines<R>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl<R> UserPrompter for TerminalPrompter<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn confirm(&self, prompt: &str) -> bool {
        println!("{prompt} [y/N]");
        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "prompt: failed to read confirmation");
                false
            }
        }
    }

    async fn alert(&self, message: &str) {
        println!("!! {message}");
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_accepts_yes_variants() {
        let prompter = TerminalPrompter::new(shared_lines(&b"Y\n yes \nn\n"[..]));
        assert!(prompter.confirm("sure?").await);
        assert!(prompter.confirm("sure?").await);
        assert!(!prompter.confirm("sure?").await);
    }

    #[tokio::test]
    async fn confirm_defaults_to_no_on_empty_or_eof() {
        let prompter = TerminalPrompter::new(shared_lines(&b"\n"[..]));
        assert!(!prompter.confirm("sure?").await);
        assert!(!prompter.confirm("sure?").await);
    }
}
