//! Hyper-based HTTP transport.
//!
//! This module provides [`HyperTransport`], the default transport
//! implementation using hyper_util's legacy client.

use std::time::Duration;

use async_soap_core::{RequestBody, RequestOptions, SoapRequest, SoapResponse, Transport, TransportError};
use futures::future::BoxFuture;
use http::HeaderMap;
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::ClientConfig;

use super::connector::build_https_connector;
use crate::ClientBuildError;

/// Type alias for the hyper client with HTTPS connector.
type HyperClient = Client<HttpsConnector<HttpConnector>, RequestBody>;

/// HTTP transport using hyper_util's legacy client.
///
/// Provides HTTP/1.1 and HTTP/2 support with TLS, connection pooling, and
/// automatic protocol negotiation via ALPN.
///
/// # Example
///
/// ```ignore
/// use async_soap_client::transport::HyperTransport;
///
/// let transport = HyperTransport::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let client = SoapClient::new(transport, provider);
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
    /// Timeout applied when the request options set none.
    default_timeout: Option<Duration>,
    http2_only: bool,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("default_timeout", &self.default_timeout)
            .field("http2_only", &self.http2_only)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport builder.
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::new()
    }

    /// Create a new transport with default settings.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::builder().build()
    }

    /// Check if this transport is configured for HTTP/2 only.
    pub fn is_http2_only(&self) -> bool {
        self.http2_only
    }

    /// Get the timeout used when a request sets none.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    /// Send the request and buffer the whole response body.
    async fn exchange(&self, request: SoapRequest) -> Result<SoapResponse, TransportError> {
        let response = self.client.request(request).await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_bytes();
        Ok(http::Response::from_parts(parts, body))
    }
}

impl Transport for HyperTransport {
    fn send(
        &self,
        mut request: SoapRequest,
        options: RequestOptions,
    ) -> BoxFuture<'_, Result<SoapResponse, TransportError>> {
        Box::pin(async move {
            merge_headers(request.headers_mut(), options.get_headers());

            let response = match options.get_timeout().or(self.default_timeout) {
                Some(t) => tokio::time::timeout(t, self.exchange(request))
                    .await
                    .map_err(|_| TransportError::Timeout(t))??,
                None => self.exchange(request).await?,
            };

            let status = response.status();
            if options.get_http_errors() && (status.is_client_error() || status.is_server_error()) {
                return Err(TransportError::status(response));
            }
            Ok(response)
        })
    }
}

/// Apply per-request headers over the binding's headers.
///
/// A name present in `overrides` replaces every binding value for that name;
/// all of its own values are kept.
fn merge_headers(headers: &mut HeaderMap, overrides: &HeaderMap) {
    headers.extend(overrides.clone());
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use async_soap_client::transport::HyperTransportBuilder;
/// use std::time::Duration;
///
/// let transport = HyperTransportBuilder::new()
///     .pool_idle_timeout(Duration::from_secs(90))
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct HyperTransportBuilder {
    /// Custom TLS configuration.
    tls_config: Option<ClientConfig>,
    /// Force HTTP/2 only.
    http2_only: bool,
    /// Connection pool idle timeout.
    pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host.
    pool_max_idle_per_host: usize,
    /// Timeout applied when the request options set none.
    timeout: Option<Duration>,
    /// HTTP/2 keep-alive interval.
    h2_keep_alive_interval: Option<Duration>,
    /// HTTP/2 keep-alive timeout.
    h2_keep_alive_timeout: Option<Duration>,
}

impl Default for HyperTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransportBuilder {
    /// Create a new transport builder with default settings.
    pub fn new() -> Self {
        Self {
            tls_config: None,
            http2_only: false,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
            timeout: None,
            h2_keep_alive_interval: None,
            h2_keep_alive_timeout: None,
        }
    }

    /// Set a custom TLS configuration.
    ///
    /// Use this for custom root certificates or client certificates (mTLS).
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Enable HTTP/2 only mode.
    ///
    /// Most SOAP endpoints speak HTTP/1.1; only enable this when the server is
    /// known to require HTTP/2 prior knowledge.
    pub fn http2_only(mut self, enabled: bool) -> Self {
        self.http2_only = enabled;
        self
    }

    /// Set the connection pool idle timeout.
    ///
    /// Default: 90 seconds.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Disable connection pool idle timeout.
    pub fn pool_idle_timeout_none(mut self) -> Self {
        self.pool_idle_timeout = None;
        self
    }

    /// Set the maximum number of idle connections per host.
    ///
    /// Default: 32.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Set the timeout for requests whose options set none.
    ///
    /// Covers connecting, sending, and reading the full response body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the HTTP/2 keep-alive interval.
    pub fn h2_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.h2_keep_alive_interval = Some(interval);
        self
    }

    /// Set the HTTP/2 keep-alive timeout.
    ///
    /// Only effective if `h2_keep_alive_interval` is also set.
    pub fn h2_keep_alive_timeout(mut self, timeout: Duration) -> Self {
        self.h2_keep_alive_timeout = Some(timeout);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Fails when no TLS configuration is given and none can be derived from
    /// the enabled features.
    pub fn build(self) -> Result<HyperTransport, ClientBuildError> {
        let https_connector = build_https_connector(self.tls_config)?;

        let mut builder = Client::builder(TokioExecutor::new());

        // Required for pool_idle_timeout to work
        builder.pool_timer(TokioTimer::new());

        if let Some(timeout) = self.pool_idle_timeout {
            builder.pool_idle_timeout(timeout);
        }
        builder.pool_max_idle_per_host(self.pool_max_idle_per_host);

        if self.http2_only {
            builder.http2_only(true);
        }

        if let Some(interval) = self.h2_keep_alive_interval {
            builder.http2_keep_alive_interval(interval);
        }

        if let Some(timeout) = self.h2_keep_alive_timeout {
            builder.http2_keep_alive_timeout(timeout);
        }

        Ok(HyperTransport {
            client: builder.build(https_connector),
            default_timeout: self.timeout,
            http2_only: self.http2_only,
        })
    }
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("tls_config", &self.tls_config.is_some())
            .field("http2_only", &self.http2_only)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("timeout", &self.timeout)
            .field("h2_keep_alive_interval", &self.h2_keep_alive_interval)
            .field("h2_keep_alive_timeout", &self.h2_keep_alive_timeout)
            .finish()
    }
}
