//! Tracing setup.
//!
//! stdout carries protocol replies and stderr carries the board, so log output goes
//! to a file.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Reads `RUST_LOG`, falling back to `default_filter`.
pub fn init(log_file: &Path, default_filter: &str) -> anyhow::Result<()> {
    let file = std::fs::File::create(log_file)
        .with_context(|| format!("create log file {}", log_file.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    Ok(())
}
