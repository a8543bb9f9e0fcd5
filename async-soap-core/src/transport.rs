//! The transport contract.

use std::time::Duration;

use futures::future::BoxFuture;

use crate::options::RequestOptions;
use crate::{SoapRequest, SoapResponse};

/// Performs the network exchange for a request.
///
/// Implementations read the response body to the end before returning, so a
/// [`SoapResponse`] is always fully buffered.
pub trait Transport: Send + Sync + 'static {
    /// Send `request` and wait for the response.
    ///
    /// A failure may still carry a usable response (see
    /// [`TransportError::response`]); the caller decides whether to use it.
    fn send(
        &self,
        request: SoapRequest,
        options: RequestOptions,
    ) -> BoxFuture<'_, Result<SoapResponse, TransportError>>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(
        &self,
        request: SoapRequest,
        options: RequestOptions,
    ) -> BoxFuture<'_, Result<SoapResponse, TransportError>> {
        (**self).send(request, options)
    }
}

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with an error status. The response is attached.
    #[error("server responded with status {}", .0.status())]
    Status(Box<SoapResponse>),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request failed after the connection was established.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    /// Create a status error carrying `response`.
    pub fn status(response: SoapResponse) -> Self {
        TransportError::Status(Box::new(response))
    }

    /// Whether this error carries a response.
    pub fn has_response(&self) -> bool {
        self.response().is_some()
    }

    /// The response attached to this error, if any.
    pub fn response(&self) -> Option<&SoapResponse> {
        match self {
            TransportError::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Split off the attached response, or give the error back.
    pub fn into_response(self) -> Result<SoapResponse, Self> {
        match self {
            TransportError::Status(response) => Ok(*response),
            other => Err(other),
        }
    }
}
