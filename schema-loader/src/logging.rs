//! Structured logging setup.
//!
//! Logs always go to stderr so that `schema-loader get` can stream schema bytes on stdout.
//! The level is controlled with `RUST_LOG` (default `info`).
use clap::ValueEnum;
use std::io;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored output
    Pretty,
    /// Single-line output without colors (CI, production)
    Compact,
    /// JSON lines, for log aggregation systems
    Json,
}

/// Initialize the global tracing subscriber
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(io::stderr))
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_writer(io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(io::stderr),
            )
            .init(),
    }
}
