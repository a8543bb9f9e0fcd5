//! Request body types.
//!
//! [`RequestBody`] is the transmissible resource a binding attaches to a
//! [`SoapRequest`](crate::SoapRequest). It must be released once the transport
//! exchange concludes; [`RequestBody::release_guard`] ties that release to a
//! scope so it happens on every exit path, including cancellation.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use http_body::{Body, Frame};
use pin_project_lite::pin_project;

/// Boxed error used by streaming request bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type ReleaseHook = Box<dyn Fn() + Send + Sync>;

struct ReleaseState {
    released: AtomicBool,
    hook: Option<ReleaseHook>,
}

impl ReleaseState {
    fn new(hook: Option<ReleaseHook>) -> Self {
        Self {
            released: AtomicBool::new(false),
            hook,
        }
    }

    fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            if let Some(hook) = &self.hook {
                hook();
            }
        }
    }

    fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

pin_project! {
    #[project = KindProj]
    enum Kind {
        Empty,
        Full {
            data: Option<Bytes>,
        },
        Streaming {
            #[pin]
            stream: Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>,
        },
    }
}

pin_project! {
    /// The body of an outgoing SOAP request.
    ///
    /// This type can represent:
    /// - Empty bodies
    /// - Full bodies (a complete serialized envelope)
    /// - Streaming bodies (large envelopes or attachments)
    ///
    /// Every body carries release state shared with the guards handed out by
    /// [`release_guard`](Self::release_guard). Once released, polling the body
    /// yields an error instead of data.
    ///
    /// Release only after the exchange has finished. A transport may keep
    /// polling the body after the response arrives (an HTTP/1 server can
    /// answer before reading the whole request), and a body released at that
    /// point fails the connection rather than the call.
    pub struct RequestBody {
        #[pin]
        kind: Kind,
        state: Arc<ReleaseState>,
    }
}

impl RequestBody {
    fn from_kind(kind: Kind) -> Self {
        Self {
            kind,
            state: Arc::new(ReleaseState::new(None)),
        }
    }

    /// Create an empty body.
    pub fn empty() -> Self {
        Self::from_kind(Kind::Empty)
    }

    /// Create a body with the given data.
    pub fn full(data: impl Into<Bytes>) -> Self {
        Self::from_kind(Kind::Full {
            data: Some(data.into()),
        })
    }

    /// Create a streaming body from the given stream.
    pub fn streaming<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, BoxError>> + Send + 'static,
    {
        Self::from_kind(Kind::Streaming {
            stream: Box::pin(stream),
        })
    }

    /// Register a hook that runs when the body is released.
    ///
    /// The hook runs at most once no matter how many guards are dropped. It
    /// must be registered before any guard is taken: guards created earlier
    /// keep pointing at the previous release state.
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state = Arc::new(ReleaseState::new(Some(Box::new(hook))));
        self
    }

    /// Take a guard that releases this body when dropped.
    pub fn release_guard(&self) -> ReleaseGuard {
        ReleaseGuard {
            state: Arc::clone(&self.state),
        }
    }

    /// Release the body now. Idempotent.
    pub fn release(&self) {
        self.state.release();
    }

    /// Whether the body has been released.
    pub fn is_released(&self) -> bool {
        self.state.is_released()
    }
}

/// Scoped release of a [`RequestBody`].
///
/// Dropping the guard releases the body. The body stays released if several
/// guards exist; the release hook still runs only once.
#[must_use = "the body is released as soon as the guard is dropped"]
pub struct ReleaseGuard {
    state: Arc<ReleaseState>,
}

impl ReleaseGuard {
    /// Whether the guarded body has been released.
    pub fn is_released(&self) -> bool {
        self.state.is_released()
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.state.release();
    }
}

impl std::fmt::Debug for ReleaseGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseGuard")
            .field("released", &self.is_released())
            .finish()
    }
}

impl Body for RequestBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.project();
        if this.state.is_released() {
            return Poll::Ready(Some(Err("request body polled after release".into())));
        }
        match this.kind.project() {
            KindProj::Empty => Poll::Ready(None),
            KindProj::Full { data } => Poll::Ready(data.take().map(|d| Ok(Frame::data(d)))),
            KindProj::Streaming { stream } => match stream.poll_next(cx) {
                Poll::Ready(Some(Ok(data))) => Poll::Ready(Some(Ok(Frame::data(data)))),
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.kind {
            Kind::Empty => true,
            Kind::Full { data } => data.is_none(),
            Kind::Streaming { .. } => false,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match &self.kind {
            Kind::Empty => http_body::SizeHint::with_exact(0),
            Kind::Full { data } => {
                http_body::SizeHint::with_exact(data.as_ref().map_or(0, |d| d.len() as u64))
            }
            Kind::Streaming { .. } => http_body::SizeHint::default(),
        }
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = match &self.kind {
            Kind::Empty => f.debug_struct("RequestBody::Empty"),
            Kind::Full { data } => {
                let mut s = f.debug_struct("RequestBody::Full");
                s.field("data_len", &data.as_ref().map(|d| d.len()));
                s
            }
            Kind::Streaming { .. } => f.debug_struct("RequestBody::Streaming"),
        };
        s.field("released", &self.is_released()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::sync::atomic::AtomicUsize;

    fn counting_body(data: &'static str) -> (RequestBody, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&releases);
        let body = RequestBody::full(data).on_release(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (body, releases)
    }

    #[tokio::test]
    async fn test_empty_body() {
        let body = RequestBody::empty();
        assert!(body.is_end_stream());

        let collected = body.collect().await.unwrap();
        assert!(collected.to_bytes().is_empty());
    }

    #[tokio::test]
    async fn test_full_body() {
        let body = RequestBody::full("<Envelope/>");
        assert_eq!(body.size_hint().exact(), Some(11));

        let collected = body.collect().await.unwrap();
        assert_eq!(collected.to_bytes(), Bytes::from("<Envelope/>"));
    }

    #[tokio::test]
    async fn test_streaming_body() {
        let chunks: Vec<Result<Bytes, BoxError>> = vec![
            Ok(Bytes::from("<Envelope>")),
            Ok(Bytes::from("<Body/>")),
            Ok(Bytes::from("</Envelope>")),
        ];
        let body = RequestBody::streaming(futures::stream::iter(chunks));

        let collected = body.collect().await.unwrap();
        assert_eq!(collected.to_bytes(), Bytes::from("<Envelope><Body/></Envelope>"));
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let (body, releases) = counting_body("payload");
        {
            let guard = body.release_guard();
            assert!(!guard.is_released());
        }
        assert!(body.is_released());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_hook_runs_once() {
        let (body, releases) = counting_body("payload");
        let first = body.release_guard();
        let second = body.release_guard();
        body.release();
        drop(first);
        drop(second);
        body.release();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_released_body_refuses_polling() {
        let (body, _releases) = counting_body("payload");
        drop(body.release_guard());

        let result = body.collect().await;
        assert!(result.is_err());
    }

    #[test]
    fn test_dropping_body_does_not_release() {
        let (body, releases) = counting_body("payload");
        let guard = body.release_guard();
        drop(body);
        assert_eq!(releases.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
