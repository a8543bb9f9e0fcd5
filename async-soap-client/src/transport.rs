//! HTTP transport for the SOAP client.
//!
//! This module provides [`HyperTransport`], the default [`Transport`] built on
//! hyper_util's legacy client. It supports:
//!
//! - HTTP/1.1 and HTTP/2 with automatic protocol negotiation
//! - TLS with rustls (feature-gated)
//! - Connection pooling
//! - Per-request timeouts and headers from [`RequestOptions`]
//!
//! Responses are read to the end before [`Transport::send`] returns. With
//! `http_errors` enabled (the default), 4xx and 5xx responses are returned as
//! [`TransportError::Status`] with the response attached.
//!
//! # Feature Flags
//!
//! - `tls` (default) - Enables `tls-ring` + `tls-native-roots` for convenience
//! - `tls-ring` / `tls-aws-lc` - Crypto providers
//! - `tls-native-roots` / `tls-webpki-roots` - Root certificates
//!
//! [`Transport`]: async_soap_core::Transport
//! [`Transport::send`]: async_soap_core::Transport::send
//! [`RequestOptions`]: async_soap_core::RequestOptions
//! [`TransportError::Status`]: async_soap_core::TransportError::Status

mod connector;
mod hyper;

pub use connector::{build_https_connector, has_tls_support};

#[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
pub use connector::default_tls_config;

pub use hyper::{HyperTransport, HyperTransportBuilder};

// Re-export rustls types that users might need for TLS configuration
pub use rustls::ClientConfig as TlsClientConfig;
