//! SOAP client implementation.
//!
//! This module provides the main [`SoapClient`] type and the call pipeline
//! behind [`SoapClient::call_async`].

use std::sync::Arc;

use async_soap_core::{Binding, CallOptions, HeaderSlot, SoapResponse, Transport};
use futures::future::{BoxFuture, FutureExt};
#[cfg(feature = "tracing")]
use tracing::Instrument;

use crate::builder::ClientBuilder;
use crate::provider::BindingProvider;
use crate::transport::HyperTransport;
use crate::{ClientError, diagnostics, interpret};

/// Future returned by [`SoapClient::call_async`].
pub type CallFuture<T> = BoxFuture<'static, Result<T, ClientError>>;

/// A single operation call, owned by the task that runs it.
struct Invocation<B: Binding> {
    name: String,
    arguments: Vec<B::Argument>,
    options: Option<CallOptions>,
    input_headers: Option<B::InputHeaders>,
}

/// Asynchronous SOAP client.
///
/// The client is generic over `B`, the binding that serializes calls and
/// decodes replies, and `T`, the transport that performs the exchange.
/// Cloning is cheap: clones share the transport and the binding resolution.
///
/// # Example
///
/// ```ignore
/// use async_soap_client::{BindingProvider, HeaderSlot, SoapClient};
///
/// let client = SoapClient::builder(BindingProvider::new(load_binding()))
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let headers = HeaderSlot::new();
/// let status = client
///     .call_async("GetStatus", vec![], None, None, Some(headers.clone()))
///     .await?;
/// println!("status: {:?}, headers: {:?}", status, headers.take());
/// ```
pub struct SoapClient<B, T = HyperTransport> {
    transport: Arc<T>,
    binding: BindingProvider<B>,
}

impl<B: Binding> SoapClient<B, HyperTransport> {
    /// Create a [`ClientBuilder`] that configures a [`HyperTransport`].
    pub fn builder(binding: BindingProvider<B>) -> ClientBuilder<B> {
        ClientBuilder::new(binding)
    }
}

impl<B: Binding, T: Transport> SoapClient<B, T> {
    /// Create a client over any transport.
    pub fn new(transport: T, binding: BindingProvider<B>) -> Self {
        Self {
            transport: Arc::new(transport),
            binding,
        }
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the binding provider.
    pub fn binding(&self) -> &BindingProvider<B> {
        &self.binding
    }

    /// Call `name` and return a future of the decoded result.
    ///
    /// `options` defaults to empty options, `input_headers` to none. When
    /// `output_headers` is given, it receives the headers the binding decoded,
    /// and only if decoding succeeded.
    ///
    /// The returned future owns everything it needs and can be spawned.
    /// Dropping it cancels the transport exchange; the request body is released
    /// on every path, including cancellation.
    ///
    /// # Errors
    ///
    /// The future fails with:
    /// - [`ClientError::Provider`] if the binding could not be resolved
    /// - [`ClientError::Build`] if the binding rejected the arguments
    /// - [`ClientError::Transport`] if the transport failed without a response
    /// - [`ClientError::Decode`] if the binding could not decode the response
    ///
    /// A transport failure that carries a response (for example an HTTP 500
    /// with a fault document) is decoded like any other response.
    pub fn call_async(
        &self,
        name: impl Into<String>,
        arguments: Vec<B::Argument>,
        options: Option<CallOptions>,
        input_headers: Option<B::InputHeaders>,
        output_headers: Option<HeaderSlot<B::OutputHeaders>>,
    ) -> CallFuture<B::Output> {
        let invocation = Invocation {
            name: name.into(),
            arguments,
            options,
            input_headers,
        };

        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "soap.call",
            soap.operation = %invocation.name,
            otel.kind = "client",
        );

        let call = invoke(
            Arc::clone(&self.transport),
            self.binding.clone(),
            invocation,
            output_headers,
        );

        #[cfg(feature = "tracing")]
        let call = call.instrument(span);

        call.boxed()
    }

    /// Call `name` with default options and no headers.
    ///
    /// Shorthand for `call_async(name, arguments, None, None, None)`.
    pub fn operation(
        &self,
        name: impl Into<String>,
        arguments: Vec<B::Argument>,
    ) -> CallFuture<B::Output> {
        self.call_async(name, arguments, None, None, None)
    }

    /// Call `name` and block until the result is available.
    ///
    /// This waits on [`call_async`](Self::call_async) using a current-thread
    /// runtime; it is not a separate code path.
    ///
    /// # Errors
    ///
    /// Same as [`call_async`](Self::call_async), plus
    /// [`ClientError::BlockingInRuntime`] when called from inside a tokio
    /// runtime and [`ClientError::Runtime`] if the runtime cannot start.
    pub fn call(
        &self,
        name: impl Into<String>,
        arguments: Vec<B::Argument>,
        options: Option<CallOptions>,
        input_headers: Option<B::InputHeaders>,
        output_headers: Option<HeaderSlot<B::OutputHeaders>>,
    ) -> Result<B::Output, ClientError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ClientError::BlockingInRuntime);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;
        runtime.block_on(self.call_async(name, arguments, options, input_headers, output_headers))
    }
}

impl<B, T> Clone for SoapClient<B, T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            binding: self.binding.clone(),
        }
    }
}

impl<B, T: std::fmt::Debug> std::fmt::Debug for SoapClient<B, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapClient")
            .field("transport", &self.transport)
            .field("binding", &self.binding)
            .finish()
    }
}

async fn invoke<B: Binding, T: Transport>(
    transport: Arc<T>,
    provider: BindingProvider<B>,
    call: Invocation<B>,
    output_headers: Option<HeaderSlot<B::OutputHeaders>>,
) -> Result<B::Output, ClientError> {
    // 1. Resolve the binding (shared by all calls)
    let binding = provider.resolve().await?;

    // 2. Build the request; the body is released when `_release` drops
    let request = binding
        .build_request(
            &call.name,
            &call.arguments,
            call.options.as_ref(),
            call.input_headers.as_ref(),
        )
        .map_err(ClientError::Build)?;
    let _release = request.body().release_guard();

    // 3. Transport options
    let request_options = call
        .options
        .as_ref()
        .map(|options| options.get_request_options().clone())
        .unwrap_or_default();

    // 4-5. Send and classify
    let response = recover_response(transport.send(request, request_options).await)?;

    // 6. Log before decoding
    diagnostics::maybe_log(&response, call.options.as_ref());

    // 7. Decode and commit output headers
    interpret::decode(&*binding, response, &call.name, output_headers.as_ref())
}

/// Keep any response the transport produced, even alongside an error.
fn recover_response(
    outcome: Result<SoapResponse, async_soap_core::TransportError>,
) -> Result<SoapResponse, ClientError> {
    match outcome {
        Ok(response) => Ok(response),
        Err(err) => match err.into_response() {
            Ok(response) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    status = %response.status(),
                    "transport failed with a response, decoding it"
                );
                Ok(response)
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "transport failed without a response");
                Err(ClientError::Transport(err))
            }
        },
    }
}
