//! Structured logging setup
//!
//! All logging goes through `tracing`. Output is configured entirely from the
//! environment so a deployment can switch formats without a rebuild:
//!
//! - `LOG_LEVEL`: ERROR, WARN, INFO, DEBUG or TRACE (default INFO)
//! - `LOG_FORMAT`: `json` for aggregation, `pretty` or `compact` for a
//!   terminal (default json)
//! - `LOG_SPANS`: `true` to also emit span open/close events (default false)
//! - `RUST_LOG`: overrides the filter entirely when set
//!
//! ```bash
//! LOG_FORMAT=pretty LOG_LEVEL=DEBUG ./dhonk-chat run
//! ```

use std::env;

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How log lines are rendered
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// One JSON object per line, for log aggregation
    Json,
    /// Multi-line colored output for development
    Pretty,
    /// Single-line colored output for a terminal
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything unrecognized falls back to JSON
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

fn span_events(include_spans: bool) -> FmtSpan {
    if include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Install the global subscriber with explicit settings
pub fn init_logging(level: Level, format: LogFormat, include_spans: bool) {
    // Dependencies chatter below WARN; RUST_LOG can bring them back
    let filter = match env::var("RUST_LOG") {
        Ok(spec) => EnvFilter::new(spec),
        Err(_) => EnvFilter::new(level.to_string())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tokio=warn".parse().unwrap()),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let events = span_events(include_spans);

    match format {
        LogFormat::Json => {
            registry
                .with(fmt::layer().json().with_span_events(events))
                .init();
        }
        LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_ansi(true)
                        .with_span_events(events),
                )
                .init();
        }
        LogFormat::Compact => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_ansi(true)
                        .with_target(false)
                        .with_span_events(events),
                )
                .init();
        }
    }
}

/// Install the global subscriber from `LOG_LEVEL`, `LOG_FORMAT` and `LOG_SPANS`
pub fn init_default_logging() {
    let level = match env::var("LOG_LEVEL")
        .unwrap_or_default()
        .to_uppercase()
        .as_str()
    {
        "ERROR" => Level::ERROR,
        "WARN" => Level::WARN,
        "DEBUG" => Level::DEBUG,
        "TRACE" => Level::TRACE,
        _ => Level::INFO,
    };

    let format = LogFormat::parse(&env::var("LOG_FORMAT").unwrap_or_default());

    let include_spans = env::var("LOG_SPANS")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    init_logging(level, format, include_spans);
}

/// Span wrapping the handling of one chat request
#[macro_export]
macro_rules! request_span {
    ($($field:tt)*) => {
        tracing::info_span!("chat_request", $($field)*)
    };
}

pub use request_span;
