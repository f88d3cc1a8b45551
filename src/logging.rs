use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Export runs: log to stderr.
    Stderr,
    /// Interactive runs: only log when a log file is configured, since the
    /// terminal belongs to the UI.
    FileOnly,
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(config: &AppConfig, target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config));

    match (&config.log_file, target) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        (None, LogTarget::Stderr) => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        (None, LogTarget::FileOnly) => {}
    }

    Ok(())
}
