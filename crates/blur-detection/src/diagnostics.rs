//! Advisory diagnostic channel for the blur metrics
//!
//! Metrics and the analyzer never write to a global logger directly; they
//! report through a sink handed to them by the caller. Messages are advisory
//! only and carry no control information.

/// Receiver for informational and warning messages from the scoring code
pub trait DiagnosticSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}

/// Forwards messages to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn info(&self, message: &str) {
        log::info!(target: "blur_detection", "{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!(target: "blur_detection", "{}", message);
    }
}
