// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! Logging initialization and setup.
//!
//! This module provides functions to initialize the tracing system with
//! different configurations and output formats.

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};
use std::io;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer, Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

/// Initialize tracing with the specified format and optional log level.
///
/// # Arguments
///
/// * `format` - The output format for logs
/// * `level` - Optional filter directive. If None, uses RUST_LOG, then `info`
///
/// # Errors
///
/// [`LogError::InvalidLogLevel`] for an unparsable directive and
/// [`LogError::AlreadyInitialized`] if a global subscriber is already set.
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(config)
}

/// Initialize tracing with a detailed configuration.
///
/// # Example
///
/// ```ignore
/// use lfsbridge_observability::{init_tracing_with_config, LogConfig, LogFormat};
///
/// let config = LogConfig::new()
///     .with_format(LogFormat::Json)
///     .with_level("lfsbridge_filter=trace")
///     .with_timestamps(true);
///
/// init_tracing_with_config(config)?;
/// ```
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    build_subscriber(&config)?
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}

/// Builds the subscriber described by `config` without installing it.
///
/// Useful with [`tracing::subscriber::with_default`] for scoped logging.
pub fn build_subscriber(config: &LogConfig) -> Result<impl Subscriber + Send + Sync + 'static, LogError> {
    let env_filter = build_env_filter(config)?;
    Ok(Registry::default()
        .with(env_filter)
        .with(build_fmt_layer(config)))
}

fn build_fmt_layer(config: &LogConfig) -> BoxedLayer {
    let writer = get_writer(config.output);

    match config.format {
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(config.include_targets)
                .with_thread_ids(config.include_thread_ids)
                .with_thread_names(true)
                .with_span_events(FmtSpan::ACTIVE)
                .with_ansi(config.use_color)
                .pretty();

            if config.use_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(config.include_targets)
                .with_thread_ids(config.include_thread_ids)
                .with_thread_names(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(config.use_color)
                .compact();

            if config.use_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .with_writer(writer)
                .json()
                .with_target(config.include_targets)
                .with_thread_ids(config.include_thread_ids)
                .with_thread_names(true)
                .with_span_events(FmtSpan::CLOSE);

            if config.use_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

/// Get the writer for the specified output
fn get_writer(output: LogOutput) -> fn() -> Box<dyn io::Write + Send> {
    match output {
        LogOutput::Stderr => || Box::new(io::stderr()),
        LogOutput::Stdout => || Box::new(io::stdout()),
    }
}

/// Build an environment filter for the given configuration
fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let level = config.get_effective_level();

    EnvFilter::try_new(&level)
        .map_err(|e| LogError::InvalidLogLevel(format!("'{}': {}", level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests that install the global subscriber live in tests/, one per
    // process; these only exercise construction.

    #[test]
    fn test_env_filter_parsing() {
        assert!(build_env_filter(&LogConfig::new().with_level("debug")).is_ok());
        assert!(build_env_filter(&LogConfig::new().with_level("lfsbridge_filter=trace,warn")).is_ok());
    }

    #[test]
    fn test_invalid_directive_rejected() {
        let result = build_env_filter(&LogConfig::new().with_level("lfsbridge_filter=loud"));
        assert!(matches!(result, Err(LogError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_every_format_builds() {
        for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json] {
            for timestamps in [true, false] {
                let config = LogConfig::new()
                    .with_format(format)
                    .with_level("trace")
                    .with_timestamps(timestamps)
                    .with_color(false);
                let subscriber = build_subscriber(&config).unwrap();
                tracing::subscriber::with_default(subscriber, || {
                    tracing::info!(?format, timestamps, "formatted event");
                });
            }
        }
    }
}
