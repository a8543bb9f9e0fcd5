//! Diagnostic logging sink.

/// Structured context attached to a log record.
pub type LogContext = serde_json::Map<String, serde_json::Value>;

/// A sink for diagnostic records emitted while a call is processed.
///
/// Records are fire-and-forget. Implementations must not block for long: they
/// run on the task that drives the call, between receiving a response and
/// decoding it.
pub trait Logger: Send + Sync {
    /// Record a debug-level message.
    fn debug(&self, message: &str, context: &LogContext);

    /// Record a warning-level message.
    fn warning(&self, message: &str, context: &LogContext);
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn debug(&self, message: &str, context: &LogContext) {
        (**self).debug(message, context);
    }

    fn warning(&self, message: &str, context: &LogContext) {
        (**self).warning(message, context);
    }
}
