//! Raw response diagnostics.
//!
//! When a call's options carry a [`Logger`], every response it receives is
//! logged before decoding, so the wire payload is captured even when decoding
//! fails afterwards.

use async_soap_core::{CallOptions, LogContext, Logger, SoapResponse};
use serde_json::Value;

pub(crate) const RAW_RESPONSE_MESSAGE: &str = "Raw SOAP Response Received";
pub(crate) const EMPTY_RESPONSE_MESSAGE: &str = "Empty response has been detected";

/// Log `response` if `options` carries a logger.
pub(crate) fn maybe_log(response: &SoapResponse, options: Option<&CallOptions>) {
    let Some(logger) = options.and_then(CallOptions::get_logger) else {
        return;
    };

    let contents = String::from_utf8_lossy(response.body()).into_owned();
    let is_empty = contents.is_empty();

    let mut context = LogContext::new();
    context.insert("response".to_string(), Value::String(contents));

    logger.debug(RAW_RESPONSE_MESSAGE, &context);
    if is_empty {
        logger.warning(EMPTY_RESPONSE_MESSAGE, &context);
    }
}

/// A [`Logger`] that forwards records to `tracing`.
///
/// The context is attached as a single JSON-formatted field.
///
/// ```ignore
/// let options = CallOptions::new().logger(TracingLogger);
/// ```
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
    fn debug(&self, message: &str, context: &LogContext) {
        tracing::debug!(context = %serde_json::Value::Object(context.clone()), "{}", message);
    }

    fn warning(&self, message: &str, context: &LogContext) {
        tracing::warn!(context = %serde_json::Value::Object(context.clone()), "{}", message);
    }
}
