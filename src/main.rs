//! Termfolio - browse a directory of markdown documents with shell commands
//!
//! Usage: `termfolio [content-dir]`. Commands are read line by line from stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use termfolio::core::document::load_documents;
use termfolio::{AppConfig, TerminalSession, VirtualFileSystem};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Termfolio...");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let content_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.last_content_dir.clone())
        .unwrap_or_else(|| PathBuf::from("content"));

    let documents = load_documents(&config.vfs, &content_dir)?;
    let vfs = VirtualFileSystem::build(&config.vfs, &documents)
        .with_context(|| format!("Invalid content in {}", content_dir.display()))?;

    if config.last_content_dir.as_ref() != Some(&content_dir) {
        config.last_content_dir = Some(content_dir);
        if let Err(e) = config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    let mut session = TerminalSession::new(&vfs, config.vfs.clone(), config.terminal.clone());
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{}", session.prompt())?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "exit" {
            break;
        }

        for output in session.execute(line) {
            writeln!(stdout, "{}", output)?;
        }
    }

    Ok(())
}
