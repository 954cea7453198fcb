//! Tracing subscriber setup for the binary.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;
use crate::error::ConfigError;

/// Filter directives. `RUST_LOG` wins when set (and valid), otherwise the
/// configured level applies to every target.
fn filter_directives(level: LevelFilter) -> String {
    let configured = level.to_string().to_lowercase();
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives)
            if !directives.trim().is_empty() && EnvFilter::try_new(&directives).is_ok() =>
        {
            directives
        }
        _ => configured,
    }
}

fn build_writer(cfg: &LoggingConfig) -> Result<BoxMakeWriter, ConfigError> {
    match &cfg.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| ConfigError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

/// Install the global subscriber described by `cfg`.
///
/// Logs never go to stdout; that is reserved for the changelog.
pub fn init(cfg: &LoggingConfig) -> Result<(), ConfigError> {
    let level = cfg.level_filter()?;
    let filter = EnvFilter::new(filter_directives(level));
    let writer = build_writer(cfg)?;
    let ansi = cfg.file.is_none();

    let result = if cfg.structured {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(ansi)
                    .with_file(level >= LevelFilter::TRACE)
                    .with_line_number(level >= LevelFilter::TRACE)
                    .with_writer(writer)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))
}
