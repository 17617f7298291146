//! Observability for the chat service
//!
//! Structured logging and a process-wide metrics collector; the HTTP surface
//! that exposes the snapshot lives in the server module.

pub mod logging;
pub mod metrics;

// Re-export for convenience
pub use logging::{LogFormat, init_default_logging, init_logging};
pub use metrics::{MetricsCollector, MetricsSnapshot, metrics};

// Span macro for structured logging
pub use logging::request_span;
