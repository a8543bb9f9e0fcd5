//! Core contracts for async-soap.
//!
//! This crate defines the collaborators the call orchestrator in
//! `async-soap-client` drives, so that bindings and transports can be written
//! against it without pulling in the client:
//!
//! - [`binding`]: The [`Binding`] trait that serializes calls and decodes replies
//! - [`transport`]: The [`Transport`] trait and its error type
//! - [`body`]: [`RequestBody`] and its scoped [`ReleaseGuard`]
//! - [`options`]: Per-call [`CallOptions`] and transport [`RequestOptions`]
//! - [`headers`]: The [`HeaderSlot`] cell that receives output headers
//! - [`log`]: The [`Logger`] sink used for response diagnostics
//! - [`error`]: Binding and provider error types

pub mod binding;
pub mod body;
pub mod error;
pub mod headers;
pub mod log;
pub mod options;
pub mod transport;

pub use binding::Binding;
pub use body::{BoxError, ReleaseGuard, RequestBody};
pub use error::{BindingError, Fault, ProviderError};
pub use headers::HeaderSlot;
pub use log::{LogContext, Logger};
pub use options::{CallOptions, RequestOptions};
pub use transport::{Transport, TransportError};

/// A request ready to be handed to a [`Transport`].
pub type SoapRequest = http::Request<RequestBody>;

/// A response whose body has been read once and buffered by the transport.
///
/// The diagnostic logger and the binding's decode step both read this buffer,
/// so they always observe identical bytes.
pub type SoapResponse = http::Response<bytes::Bytes>;
