//! Interactive terminal loop driving the chat controller.

use std::{future::Future, path::Path, time::Duration};

use anyhow::{Context, Result};
use client_core::{ChatController, DocumentUpload};
use tokio::io::AsyncBufRead;
use tracing::{debug, info};

use crate::{
    commands::{parse_command, ReplCommand, HELP},
    prompt::SharedLines,
    render::{render_sidebar, TranscriptCursor, TYPING_LINE},
};

const TYPING_DELAY: Duration = Duration::from_millis(150);

pub struct Repl<R> {
    controller: ChatController,
    input: SharedLines<R>,
    cursor: TranscriptCursor,
}

impl<R> Repl<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(controller: ChatController, input: SharedLines<R>) -> Self {
        Self {
            controller,
            input,
            cursor: TranscriptCursor::default(),
        }
    }

    pub async fn run(mut self, preset_name: Option<String>) -> Result<()> {
        self.controller.start().await;
        if let Some(name) = preset_name {
            self.controller.submit_name(&name, true).await;
        }
        self.print_header().await;

        loop {
            // The guard must be released before dispatching: confirmations read
            // from the same input.
            let line = self
                .input
                .lock()
                .await
                .next_line()
                .await
                .context("failed to read terminal input")?;
            let Some(line) = line else {
                debug!("repl: input closed");
                break;
            };

            if !self.controller.snapshot().await.session.started {
                if self.controller.submit_name(&line, true).await {
                    self.print_header().await;
                } else {
                    println!("Enter your name to start.");
                }
                continue;
            }

            match parse_command(&line) {
                Ok(ReplCommand::Quit) => break,
                Ok(command) => self.dispatch(command).await,
                Err(err) => println!("{err}"),
            }
            self.flush_transcript().await;
        }

        info!("repl: session ended");
        Ok(())
    }

    async fn dispatch(&mut self, command: ReplCommand) {
        let controller = self.controller.clone();
        match command {
            ReplCommand::Say(text) => {
                with_typing_indicator(&controller, controller.send_message(&text)).await;
            }
            ReplCommand::Quick(action) => {
                with_typing_indicator(&controller, controller.send_quick_action(action)).await;
            }
            ReplCommand::Upload(path) => match read_upload(&path).await {
                Ok(upload) => {
                    with_typing_indicator(&controller, controller.upload_document(Some(upload)))
                        .await;
                    self.flush_transcript().await;
                    self.print_sidebar_if_open().await;
                }
                Err(err) => println!("{err:#}"),
            },
            ReplCommand::Files => {
                controller.refresh_document_list().await;
                println!("{}", render_sidebar(&controller.snapshot().await));
            }
            ReplCommand::ClearAll => {
                if controller.delete_all_documents().await {
                    self.flush_transcript().await;
                    self.print_sidebar_if_open().await;
                }
            }
            ReplCommand::CloseSidebar => {
                controller.close_sidebar().await;
                println!("Document list hidden. /open shows it again.");
            }
            ReplCommand::OpenSidebar => {
                controller.open_sidebar().await;
                self.print_sidebar_if_open().await;
            }
            ReplCommand::Health => match controller.health().await {
                Ok(message) => println!("Backend: {message}"),
                Err(err) => println!("Backend unreachable: {err}"),
            },
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => {}
        }
    }

    async fn print_header(&mut self) {
        let state = self.controller.snapshot().await;
        if !state.session.started {
            println!("MentorAI.");
            println!("Enter your Name:");
            return;
        }
        if let Some(greeting) = state.greeting() {
            println!("{greeting}");
        }
        if state.sidebar_open {
            println!("{}", render_sidebar(&state));
        }
        println!("Type /help for commands.");
    }

    async fn print_sidebar_if_open(&self) {
        let state = self.controller.snapshot().await;
        if state.sidebar_open {
            println!("{}", render_sidebar(&state));
        }
    }

    async fn flush_transcript(&mut self) {
        let state = self.controller.snapshot().await;
        for line in self.cursor.take_new(&state) {
            println!("{line}");
        }
    }
}

/// Shows the typing line if the action is still running after a short delay.
async fn with_typing_indicator<F>(controller: &ChatController, action: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(action);
    tokio::select! {
        () = &mut action => return,
        () = tokio::time::sleep(TYPING_DELAY) => {}
    }
    if controller.snapshot().await.typing {
        println!("{TYPING_LINE}");
    }
    action.await;
}

pub async fn read_upload(path: &Path) -> Result<DocumentUpload> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    Ok(DocumentUpload {
        filename,
        mime_type,
        bytes,
    })
}
