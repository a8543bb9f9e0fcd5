//! Error types raised by bindings and binding providers.
//!
//! - [`BindingError`]: request construction and response decoding failures
//! - [`Fault`]: a protocol-level fault document decoded from a response
//! - [`ProviderError`]: the binding provider could not produce a binding
//!
//! Transport failures live next to the transport contract, see
//! [`TransportError`](crate::TransportError).

use std::error::Error as StdError;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A protocol-level fault returned by the remote service.
///
/// Faults usually arrive with a non-2xx status, but the binding decides what
/// constitutes one; the transport status plays no part in it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    /// Fault code, e.g. `soap:Server` or `env:Receiver`.
    pub code: String,
    /// Human readable reason.
    pub reason: String,
    /// Raw detail payload, if the fault carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Fault {
    /// Create a fault without detail.
    pub fn new(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            reason: reason.into(),
            detail: None,
        }
    }

    /// Attach a detail payload.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.reason)
    }
}

/// Errors raised by a [`Binding`](crate::Binding).
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// The arguments do not fit the named operation.
    #[error("invalid arguments for operation `{operation}`: {message}")]
    InvalidArguments { operation: String, message: String },

    /// The operation is not described by the service definition.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// The response decoded to a protocol fault.
    #[error("fault {0}")]
    Fault(Fault),

    /// The response body is not a valid protocol document.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Any other binding-specific failure.
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

impl BindingError {
    /// Create an invalid-arguments error.
    pub fn invalid_arguments(operation: impl Into<String>, message: impl Into<String>) -> Self {
        BindingError::InvalidArguments {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        BindingError::Malformed(message.into())
    }

    /// The decoded fault, if this error is one.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            BindingError::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<Fault> for BindingError {
    fn from(fault: Fault) -> Self {
        BindingError::Fault(fault)
    }
}

/// The binding provider failed to produce a binding.
///
/// Cloneable: every call waiting on the same provider receives the same error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("binding provider failed: {0}")]
pub struct ProviderError(Arc<dyn StdError + Send + Sync>);

impl ProviderError {
    /// Wrap the provider's underlying error.
    pub fn new(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(Arc::from(error.into()))
    }

    /// The error the provider failed with.
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}
