//! Logging setup
//!
//! The terminal UI owns the screen, so log output goes to a file or nowhere.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Registry, layer::SubscriberExt};

/// Parse a level name such as `info` or `debug`
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .with_context(|| format!("Unknown log level '{level}'"))
}

/// Install a global subscriber appending to `log_file`
pub fn init(log_file: &Path, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {:?}", log_file))?;

    let file_layer = tracing_subscriber::fmt::Layer::default()
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    let subscriber = Registry::default().with(level).with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("setting global default tracing subscriber failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(parse_level("loud").is_err());
    }
}
