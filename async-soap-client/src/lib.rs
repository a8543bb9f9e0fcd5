//! Asynchronous SOAP-style RPC client.
//!
//! This crate orchestrates a remote call: it resolves a [`Binding`] (which
//! knows how to serialize an operation into an HTTP request and decode the
//! response), hands the request to a [`Transport`], and decodes whatever comes
//! back, including error responses that carry a fault document.
//!
//! ## Features
//!
//! - Non-blocking calls returning spawnable futures ([`SoapClient::call_async`])
//! - A blocking wrapper for synchronous callers ([`SoapClient::call`])
//! - Lazily resolved bindings shared by every call ([`BindingProvider`])
//! - Output SOAP headers written back through a [`HeaderSlot`]
//! - Optional diagnostic logging of raw responses through a [`Logger`]
//! - A default HTTP transport on hyper with rustls ([`HyperTransport`])
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `tls` | yes | `tls-ring` + `tls-native-roots` |
//! | `tls-ring` / `tls-aws-lc` | | rustls crypto provider |
//! | `tls-native-roots` / `tls-webpki-roots` | | root certificates |
//! | `tracing` | yes | call spans and [`TracingLogger`] |
//!
//! ## Example
//!
//! ```ignore
//! use async_soap_client::{BindingProvider, CallOptions, HeaderSlot, SoapClient};
//!
//! // The binding may come from a WSDL that is still being fetched
//! let client = SoapClient::builder(BindingProvider::new(fetch_binding()))
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! // Fire-and-await
//! let status = client.operation("GetStatus", vec![]).await?;
//!
//! // With options and output headers
//! let headers = HeaderSlot::new();
//! let options = CallOptions::new().logger(TracingLogger);
//! let result = client
//!     .call_async("GetStatus", vec![], Some(options), None, Some(headers.clone()))
//!     .await?;
//! println!("{:?} {:?}", result, headers.take());
//! ```
//!
//! ## Faults
//!
//! A server that answers with HTTP 500 and a fault document produces the same
//! result as one answering 200 with that document: both responses go to the
//! binding, which reports the fault as [`ClientError::Decode`].
//!
//! ```ignore
//! match client.operation("Transfer", args).await {
//!     Ok(receipt) => println!("{receipt:?}"),
//!     Err(err) => match err.fault() {
//!         Some(fault) => eprintln!("server fault: {fault}"),
//!         None => eprintln!("call failed: {err}"),
//!     },
//! }
//! ```
//!
//! ## Cancellation
//!
//! Dropping the future returned by [`SoapClient::call_async`] aborts the
//! exchange. The request body is released on every path, cancellation
//! included, and no output headers are written.

mod builder;
mod client;
mod diagnostics;
mod error;
mod interpret;
mod provider;
pub mod transport;

pub use builder::{ClientBuildError, ClientBuilder};
pub use client::{CallFuture, SoapClient};
#[cfg(feature = "tracing")]
pub use diagnostics::TracingLogger;
pub use error::ClientError;
pub use provider::BindingProvider;
pub use transport::{HyperTransport, HyperTransportBuilder, TlsClientConfig};

// Re-export the collaborator contracts
pub use async_soap_core::{
    Binding, BindingError, BoxError, CallOptions, Fault, HeaderSlot, LogContext, Logger,
    ProviderError, ReleaseGuard, RequestBody, RequestOptions, SoapRequest, SoapResponse,
    Transport, TransportError,
};
