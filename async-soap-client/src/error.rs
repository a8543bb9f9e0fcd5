//! Client-side error types.
//!
//! This module provides [`ClientError`], the error type returned by calls made
//! through a [`SoapClient`](crate::SoapClient).

use async_soap_core::{BindingError, Fault, ProviderError, TransportError};

/// Errors a call can fail with.
///
/// Every variant carries the collaborator's error unchanged; nothing is
/// retried or rewritten on the way out.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The binding provider could not produce a binding.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The binding rejected the call arguments.
    #[error("failed to build request: {0}")]
    Build(#[source] BindingError),

    /// The transport failed without a usable response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The binding could not decode the response.
    #[error("failed to decode response: {0}")]
    Decode(#[source] BindingError),

    /// The blocking wrapper could not start its runtime.
    #[error("failed to start runtime for blocking call: {0}")]
    Runtime(#[source] std::io::Error),

    /// The blocking wrapper was called from inside an async runtime.
    #[error("blocking call made from within an async runtime; use `call_async` instead")]
    BlockingInRuntime,
}

impl ClientError {
    /// The protocol fault the response decoded to, if that is why the call failed.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ClientError::Decode(err) => err.fault(),
            _ => None,
        }
    }

    /// Whether the call failed at the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// The binding error behind a build or decode failure.
    pub fn binding_error(&self) -> Option<&BindingError> {
        match self {
            ClientError::Build(err) | ClientError::Decode(err) => Some(err),
            _ => None,
        }
    }
}
