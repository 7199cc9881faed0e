// src/main.rs
//! Binary entry point: logging setup plus the terminal application loop.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use prism::{app, config};

/// Route tracing output to a log file; stdout belongs to the TUI. Filter
/// via PRISM_LOG (e.g. PRISM_LOG=prism=debug). Logging is optional: when no
/// config directory or file is available the app runs silently.
fn init_logging() {
    let Some(dir) = config::config_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("prism.log"))
    else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PRISM_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    app::run()
}
