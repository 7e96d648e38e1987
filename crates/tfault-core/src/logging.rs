//! Structured logging for retry diagnostics.
//!
//! Retry attempts are reported at `warn`, exhaustion at `error` and throttling
//! detail at `debug`. `RUST_LOG` overrides [`DEFAULT_FILTER`].

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,tfault=debug,tfault_core=debug";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file, creating it and its directory as needed.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    /// `~/.local/state/tfault/tfault.log`.
    pub fn default_file() -> Result<Self> {
        let dirs = xdg::BaseDirectories::with_prefix("tfault")?;
        Ok(Self::File(dirs.get_state_home().join("tfault.log")))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Open `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

/// Install the global subscriber for `target`.
///
/// Fails if the log file cannot be opened or a subscriber is already installed.
pub fn init(target: &LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false);
    match target {
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            builder
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
            tracing::info!(path = %path.display(), "file logging enabled");
        }
        LogTarget::Stderr => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }
    Ok(())
}

/// Log to the default state file.
pub fn init_logging() -> Result<()> {
    init(&LogTarget::default_file()?)
}

/// Log to stderr, ignoring an already installed subscriber.
pub fn init_logging_stderr() {
    let _ = init(&LogTarget::Stderr);
}
