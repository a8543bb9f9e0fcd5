//! Resolve-once binding provider.

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;

use async_soap_core::ProviderError;
use futures::future::{BoxFuture, FutureExt, Shared};

type BindingFuture<B> = Shared<BoxFuture<'static, Result<Arc<B>, ProviderError>>>;

/// A lazily resolved binding.
///
/// Wraps the future that produces the binding (typically fetching and parsing
/// a service definition). The future runs once, the first time a call needs
/// it; every call and every clone of the provider shares that single
/// resolution, including its failure.
///
/// # Example
///
/// ```ignore
/// use async_soap_client::BindingProvider;
///
/// let provider = BindingProvider::new(async {
///     let wsdl = fetch_wsdl("https://example.com/service?wsdl").await?;
///     StatusBinding::from_wsdl(&wsdl)
/// });
/// ```
pub struct BindingProvider<B> {
    future: BindingFuture<B>,
}

impl<B: Send + Sync + 'static> BindingProvider<B> {
    /// Create a provider from a future that resolves to a binding.
    pub fn new<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<B, E>> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let future = async move {
            future
                .await
                .map(Arc::new)
                .map_err(ProviderError::new)
        };
        Self {
            future: future.boxed().shared(),
        }
    }

    /// Create a provider for a binding that is already available.
    pub fn ready(binding: B) -> Self {
        Self::from_arc(Arc::new(binding))
    }

    /// Create a provider for an already shared binding.
    pub fn from_arc(binding: Arc<B>) -> Self {
        Self {
            future: futures::future::ready(Ok(binding)).boxed().shared(),
        }
    }

    /// Wait for the binding.
    pub async fn resolve(&self) -> Result<Arc<B>, ProviderError> {
        self.future.clone().await
    }

    /// The binding, if resolution already finished successfully.
    pub fn peek(&self) -> Option<Arc<B>> {
        match self.future.peek() {
            Some(Ok(binding)) => Some(Arc::clone(binding)),
            _ => None,
        }
    }
}

impl<B> Clone for BindingProvider<B> {
    fn clone(&self) -> Self {
        Self {
            future: self.future.clone(),
        }
    }
}

impl<B> std::fmt::Debug for BindingProvider<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingProvider")
            .field("resolved", &self.future.peek().is_some())
            .finish()
    }
}
