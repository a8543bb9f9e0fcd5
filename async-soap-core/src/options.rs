//! Per-call options.
//!
//! [`CallOptions`] is the options bag passed alongside a call. The client reads
//! two keys from it, `request_options` and `logger`; everything in
//! `binding_options` is meant for the binding and ignored by the client.
//! [`RequestOptions`] is the transport-specific part.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

use crate::log::Logger;

/// Options for configuring a single call.
///
/// # Example
///
/// ```ignore
/// use async_soap_core::{CallOptions, RequestOptions};
/// use std::time::Duration;
///
/// let options = CallOptions::new()
///     .request_options(RequestOptions::new().timeout(Duration::from_secs(5)))
///     .logger(my_logger)
///     .binding_option("soap_version", "1.2");
/// ```
#[derive(Clone, Default)]
pub struct CallOptions {
    request_options: RequestOptions,
    logger: Option<Arc<dyn Logger>>,
    binding_options: Map<String, Value>,
}

impl CallOptions {
    /// Create empty call options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport-specific options for this call.
    pub fn request_options(mut self, options: RequestOptions) -> Self {
        self.request_options = options;
        self
    }

    /// Log every raw response received for this call.
    pub fn logger<L: Logger + 'static>(mut self, logger: L) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Like [`logger`](Self::logger), for a logger that is already shared.
    pub fn shared_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Add a binding-specific option.
    pub fn binding_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.binding_options.insert(key.into(), value.into());
        self
    }

    /// Get the transport-specific options.
    pub fn get_request_options(&self) -> &RequestOptions {
        &self.request_options
    }

    /// Get the configured logger, if any.
    pub fn get_logger(&self) -> Option<&dyn Logger> {
        self.logger.as_deref()
    }

    /// Get the binding-specific options.
    pub fn get_binding_options(&self) -> &Map<String, Value> {
        &self.binding_options
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("request_options", &self.request_options)
            .field("logger", &self.logger.is_some())
            .field("binding_options", &self.binding_options)
            .finish()
    }
}

/// Transport options for a single request.
///
/// # Example
///
/// ```ignore
/// use async_soap_core::RequestOptions;
/// use std::time::Duration;
///
/// let options = RequestOptions::new()
///     .timeout(Duration::from_secs(5))
///     .header("authorization", "Bearer token123")
///     .http_errors(false);
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    headers: HeaderMap,
    http_errors: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            headers: HeaderMap::new(),
            http_errors: true,
        }
    }
}

impl RequestOptions {
    /// Create new default request options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for this request.
    ///
    /// Overrides the transport's default timeout, if it has one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the configured timeout, if any.
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Add a header to this request.
    ///
    /// Headers set here override headers of the same name set by the binding.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        K::Error: fmt::Debug,
        V: TryInto<HeaderValue>,
        V::Error: fmt::Debug,
    {
        let name = name.try_into().expect("invalid header name");
        let value = value.try_into().expect("invalid header value");
        self.headers.insert(name, value);
        self
    }

    /// Try to add a header to this request.
    ///
    /// Returns `None` if the header name or value is invalid.
    pub fn try_header<K, V>(mut self, name: K, value: V) -> Option<Self>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        let name = name.try_into().ok()?;
        let value = value.try_into().ok()?;
        self.headers.insert(name, value);
        Some(self)
    }

    /// Set all headers for this request, replacing any existing ones.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Get a reference to the headers.
    pub fn get_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Whether 4xx and 5xx responses are reported as transport errors.
    ///
    /// When enabled (the default) such responses still reach the binding,
    /// attached to a [`TransportError::Status`](crate::TransportError::Status).
    pub fn http_errors(mut self, enabled: bool) -> Self {
        self.http_errors = enabled;
        self
    }

    /// Get the `http_errors` setting.
    pub fn get_http_errors(&self) -> bool {
        self.http_errors
    }
}
