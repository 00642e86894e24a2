//! REPL input parsing.

use std::path::{Path, PathBuf};

use client_core::QuickAction;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Say(String),
    Upload(PathBuf),
    Files,
    ClearAll,
    Quick(QuickAction),
    CloseSidebar,
    OpenSidebar,
    Health,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("only PDF files can be uploaded: {0}")]
    NotPdf(String),
    #[error("unknown command /{0}; try /help")]
    Unknown(String),
}

pub const HELP: &str = "\
Type a question and press Enter to ask about your documents.
  /upload <file.pdf>  upload a PDF
  /files              refresh and show the document list
  /clear              delete all documents
  /ask /summarize /quiz  quick prompts
  /close /open        hide or show the document list
  /health             check the backend
  /help               show this help
  /quit               exit";

pub fn parse_command(line: &str) -> Result<ReplCommand, CommandError> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(ReplCommand::Say(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim_end(), ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "upload" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument("upload"));
            }
            let path = PathBuf::from(arg);
            if !is_pdf(&path) {
                return Err(CommandError::NotPdf(arg.to_string()));
            }
            Ok(ReplCommand::Upload(path))
        }
        "files" => Ok(ReplCommand::Files),
        "clear" => Ok(ReplCommand::ClearAll),
        "ask" => Ok(ReplCommand::Quick(QuickAction::Ask)),
        "summarize" => Ok(ReplCommand::Quick(QuickAction::Summarize)),
        "quiz" => Ok(ReplCommand::Quick(QuickAction::Quiz)),
        "close" => Ok(ReplCommand::CloseSidebar),
        "open" => Ok(ReplCommand::OpenSidebar),
        "health" => Ok(ReplCommand::Health),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Mirrors the file picker's `.pdf` filter; the content itself is not checked.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
