//! Client builder.
//!
//! Provides a fluent API for configuring a [`SoapClient`] over the default
//! [`HyperTransport`]. Use [`SoapClient::new`] to plug in any other transport.

use std::time::Duration;

use async_soap_core::Binding;
use rustls::ClientConfig;

use crate::client::SoapClient;
use crate::provider::BindingProvider;
use crate::transport::{HyperTransport, HyperTransportBuilder};

/// Builder for a [`SoapClient`] using [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use async_soap_client::{BindingProvider, SoapClient};
/// use std::time::Duration;
///
/// let client = SoapClient::builder(BindingProvider::new(load_binding()))
///     .timeout(Duration::from_secs(30))
///     .pool_idle_timeout(Duration::from_secs(60))
///     .build()?;
/// ```
pub struct ClientBuilder<B> {
    binding: BindingProvider<B>,
    transport: HyperTransportBuilder,
}

impl<B> std::fmt::Debug for ClientBuilder<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("binding", &self.binding)
            .field("transport", &self.transport)
            .finish()
    }
}

impl<B: Binding> ClientBuilder<B> {
    /// Create a builder for a client using `binding`.
    pub fn new(binding: BindingProvider<B>) -> Self {
        Self {
            binding,
            transport: HyperTransportBuilder::new(),
        }
    }

    /// Replace all transport settings at once.
    pub fn transport(mut self, transport: HyperTransportBuilder) -> Self {
        self.transport = transport;
        self
    }

    /// Set the default request timeout.
    ///
    /// Applies to calls whose request options set no timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.timeout(timeout);
        self
    }

    /// Set a custom TLS configuration.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.transport = self.transport.tls_config(config);
        self
    }

    /// Enable HTTP/2 only mode.
    pub fn http2_only(mut self, enabled: bool) -> Self {
        self.transport = self.transport.http2_only(enabled);
        self
    }

    /// Set the connection pool idle timeout.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.pool_idle_timeout(timeout);
        self
    }

    /// Set the maximum number of idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.transport = self.transport.pool_max_idle_per_host(max);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn build(self) -> Result<SoapClient<B, HyperTransport>, ClientBuildError> {
        let transport = self.transport.build()?;
        Ok(SoapClient::new(transport, self.binding))
    }
}

/// Error type for client building failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// TLS could not be configured.
    #[error("failed to configure TLS: {0}")]
    Tls(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_soap_core::{BindingError, CallOptions, SoapRequest, SoapResponse};

    struct NoopBinding;

    impl Binding for NoopBinding {
        type Argument = ();
        type InputHeaders = ();
        type OutputHeaders = ();
        type Output = ();

        fn build_request(
            &self,
            name: &str,
            _arguments: &[()],
            _options: Option<&CallOptions>,
            _input_headers: Option<&()>,
        ) -> Result<SoapRequest, BindingError> {
            Err(BindingError::UnknownOperation(name.to_string()))
        }

        fn decode_response(
            &self,
            _response: SoapResponse,
            _name: &str,
            _output_headers: &mut (),
        ) -> Result<(), BindingError> {
            Ok(())
        }
    }

    fn builder() -> ClientBuilder<NoopBinding> {
        SoapClient::builder(BindingProvider::ready(NoopBinding))
    }

    #[test]
    fn test_builder_forwards_transport_settings() {
        let builder = builder()
            .timeout(Duration::from_secs(30))
            .http2_only(true)
            .pool_max_idle_per_host(4);
        let debug = format!("{:?}", builder.transport);
        assert!(debug.contains("timeout: Some(30s)"));
        assert!(debug.contains("http2_only: true"));
        assert!(debug.contains("pool_max_idle_per_host: 4"));
    }

    #[test]
    fn test_builder_replaces_transport() {
        let builder = builder()
            .timeout(Duration::from_secs(30))
            .transport(HyperTransportBuilder::new().pool_idle_timeout_none());
        let debug = format!("{:?}", builder.transport);
        assert!(debug.contains("timeout: None"));
        assert!(debug.contains("pool_idle_timeout: None"));
    }

    #[cfg(all(feature = "tls-ring", feature = "tls-native-roots"))]
    #[test]
    fn test_builder_build() {
        let client = builder().timeout(Duration::from_secs(5)).build().unwrap();
        assert_eq!(
            client.transport().default_timeout(),
            Some(Duration::from_secs(5))
        );
    }
}
