use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{ChatController, HttpGateway};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;
mod prompt;
mod render;

use app::Repl;
use config::load_settings;
use prompt::{shared_lines, TerminalPrompter};

#[derive(Parser, Debug)]
#[command(name = "mentor", about = "Chat with your PDF documents through a MentorAI backend")]
struct Args {
    /// Backend base address, e.g. http://127.0.0.1:8000
    #[arg(long)]
    backend_url: Option<String>,
    /// Skip the name prompt.
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(v) = args.backend_url {
        settings.backend_url = v;
    }
    if let Some(v) = args.name {
        settings.user_name = Some(v);
    }
    if let Some(v) = args.log_filter {
        settings.log_filter = v;
    }

    init_tracing(&settings.log_filter);

    let gateway = HttpGateway::new(&settings.backend_url)?;
    info!(backend_url = %gateway.base_url(), "mentor: starting");

    let input = shared_lines(BufReader::new(tokio::io::stdin()));
    let prompter = TerminalPrompter::new(input.clone());
    let controller = ChatController::new(Arc::new(gateway), Arc::new(prompter));

    Repl::new(controller, input).run(settings.user_name).await
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
