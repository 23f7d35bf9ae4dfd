use crate::interaction::InteractionStyle;
use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "checkers_gui.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub style: InteractionStyle,
    pub poll_interval_ms: u64,
    pub log_file: PathBuf,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub initial_status: String,
}

impl Default for GuiConfig {
    fn default() -> Self {
        GuiConfig {
            style: InteractionStyle::Drag,
            poll_interval_ms: 50,
            log_file: PathBuf::from("checkers_gui.log"),
            log_filter: "info".to_string(),
            initial_status: crate::protocol::decoder::INITIAL_STATUS.to_string(),
        }
    }
}

impl GuiConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: GuiConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// Like [`GuiConfig::load`], but a missing file yields the defaults.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(config_str) => serde_json::from_str(&config_str)
                .with_context(|| format!("parse config {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("read config {}", path.display())),
        }
    }

    /// Loads the file named by the CLI (or the default path) and applies CLI overrides.
    ///
    /// An explicitly named config file must exist; the default one is optional.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
        };
        if let Some(style) = cli.style {
            config.style = style;
        }
        if let Some(ms) = cli.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(path) = &cli.log_file {
            config.log_file = path.clone();
        }
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Checkers board front-end. Speaks the line protocol on stdin/stdout and draws on the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Interaction style
    #[arg(long, value_enum)]
    pub style: Option<InteractionStyle>,

    /// How often a pending get_move re-checks for a committed move
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Log file (stdout and stderr are taken by the protocol and the board)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
