//! End-to-end calls through `HyperTransport` against a local axum server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_soap_client::{
    Binding, BindingError, BindingProvider, CallOptions, ClientError, Fault, HeaderSlot,
    LogContext, Logger, RequestBody, RequestOptions, SoapClient, SoapRequest, SoapResponse,
    TransportError,
};
use axum::Router;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;

/// A tiny XML binding: each argument becomes an `<arg>` element, the output is
/// the text of `<status>`, and `<fault>` documents decode to a [`Fault`].
struct XmlBinding {
    base: String,
    released: Arc<AtomicUsize>,
}

impl XmlBinding {
    fn new(addr: SocketAddr) -> Self {
        Self {
            base: format!("http://{addr}"),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }
}

fn element<'a>(doc: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = doc.find(&open)? + open.len();
    let end = doc[start..].find(&close)? + start;
    Some(&doc[start..end])
}

impl Binding for XmlBinding {
    type Argument = String;
    type InputHeaders = String;
    type OutputHeaders = Vec<String>;
    type Output = String;

    fn build_request(
        &self,
        name: &str,
        arguments: &[String],
        _options: Option<&CallOptions>,
        input_headers: Option<&String>,
    ) -> Result<SoapRequest, BindingError> {
        let mut envelope = String::from("<envelope>");
        if let Some(header) = input_headers {
            envelope.push_str(&format!("<header>{header}</header>"));
        }
        for arg in arguments {
            envelope.push_str(&format!("<arg>{arg}</arg>"));
        }
        envelope.push_str("</envelope>");

        let released = Arc::clone(&self.released);
        let body = RequestBody::full(envelope).on_release(move || {
            released.fetch_add(1, Ordering::SeqCst);
        });

        http::Request::builder()
            .method("POST")
            .uri(format!("{}/{}", self.base, name))
            .header("content-type", "text/xml; charset=utf-8")
            .header("soapaction", name)
            .body(body)
            .map_err(|e| BindingError::Other(Box::new(e)))
    }

    fn decode_response(
        &self,
        response: SoapResponse,
        _name: &str,
        output_headers: &mut Vec<String>,
    ) -> Result<String, BindingError> {
        let doc = std::str::from_utf8(response.body())
            .map_err(|e| BindingError::malformed(e.to_string()))?;

        if let Some(fault) = element(doc, "fault") {
            let code = element(fault, "code").unwrap_or_default();
            let reason = element(fault, "reason").unwrap_or_default();
            return Err(Fault::new(code, reason).into());
        }

        if let Some(session) = response.headers().get("x-session") {
            let session = session
                .to_str()
                .map_err(|e| BindingError::malformed(e.to_string()))?;
            output_headers.push(session.to_string());
        }

        element(doc, "status")
            .map(str::to_string)
            .ok_or_else(|| BindingError::malformed("missing <status>"))
    }
}

/// Keeps `(level, message)` pairs and the last context it saw.
#[derive(Clone, Default)]
struct CollectingLogger {
    records: Arc<Mutex<Vec<(&'static str, String)>>>,
    last_context: Arc<Mutex<Option<LogContext>>>,
}

impl CollectingLogger {
    fn record(&self, level: &'static str, message: &str, context: &LogContext) {
        self.records.lock().unwrap().push((level, message.to_string()));
        *self.last_context.lock().unwrap() = Some(context.clone());
    }

    fn levels(&self) -> Vec<&'static str> {
        self.records.lock().unwrap().iter().map(|(level, _)| *level).collect()
    }
}

impl Logger for CollectingLogger {
    fn debug(&self, message: &str, context: &LogContext) {
        self.record("debug", message, context);
    }

    fn warning(&self, message: &str, context: &LogContext) {
        self.record("warning", message, context);
    }
}

async fn get_status() -> impl IntoResponse {
    ([("x-session", "abc123")], "<envelope><status>ok</status></envelope>")
}

async fn explode() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "<envelope><fault><code>soap:Server</code><reason>boom</reason></fault></envelope>",
    )
}

async fn reject() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        "<envelope><status>rejected</status></envelope>",
    )
}

async fn empty() -> &'static str {
    ""
}

async fn echo(headers: HeaderMap, body: String) -> String {
    let trace: Vec<&str> = headers
        .get_all("x-trace")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    let trace = if trace.is_empty() {
        "none".to_string()
    } else {
        trace.join(",")
    };
    let header = element(&body, "header").unwrap_or("none").to_string();
    let args: Vec<&str> = body
        .split("<arg>")
        .skip(1)
        .filter_map(|s| s.split("</arg>").next())
        .collect();
    format!(
        "<envelope><status>{}|{}|{}</status></envelope>",
        args.join(","),
        header,
        trace
    )
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "<envelope><status>late</status></envelope>"
}

async fn start_server() -> SocketAddr {
    let app = Router::new()
        .route("/GetStatus", post(get_status))
        .route("/Explode", post(explode))
        .route("/Reject", post(reject))
        .route("/Empty", post(empty))
        .route("/Echo", post(echo))
        .route("/Slow", post(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(binding: XmlBinding) -> SoapClient<XmlBinding> {
    SoapClient::builder(BindingProvider::ready(binding))
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_call_succeeds_and_writes_output_headers() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let addr = start_server().await;
    let binding = XmlBinding::new(addr);
    let released = Arc::clone(&binding.released);
    let client = client(binding);

    let headers = HeaderSlot::new();
    let status = client
        .call_async("GetStatus", vec![], None, None, Some(headers.clone()))
        .await
        .unwrap();

    assert_eq!(status, "ok");
    assert_eq!(headers.take(), Some(vec!["abc123".to_string()]));
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_fault_with_500_is_decoded() {
    let addr = start_server().await;
    let binding = XmlBinding::new(addr);
    let released = Arc::clone(&binding.released);
    let client = client(binding);

    let headers = HeaderSlot::new();
    let err = client
        .call_async("Explode", vec![], None, None, Some(headers.clone()))
        .await
        .unwrap_err();

    let fault = err.fault().expect("fault should be decoded from the 500 body");
    assert_eq!(fault.code, "soap:Server");
    assert_eq!(fault.reason, "boom");
    assert!(!headers.is_set());
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_arguments_headers_and_request_options_reach_the_server() {
    let addr = start_server().await;
    let client = client(XmlBinding::new(addr));

    let options = CallOptions::new()
        .request_options(RequestOptions::new().header("x-trace", "t-42"));
    let status = client
        .call_async(
            "Echo",
            vec!["a".to_string(), "b".to_string()],
            Some(options),
            Some("auth".to_string()),
            None,
        )
        .await
        .unwrap();

    assert_eq!(status, "a,b|auth|t-42");
}

#[tokio::test]
async fn test_repeated_request_option_headers_are_all_sent() {
    let addr = start_server().await;
    let client = client(XmlBinding::new(addr));

    let mut headers = HeaderMap::new();
    headers.append("x-trace", HeaderValue::from_static("a"));
    headers.append("x-trace", HeaderValue::from_static("b"));
    let options = CallOptions::new().request_options(RequestOptions::new().headers(headers));

    let status = client
        .call_async("Echo", vec!["x".to_string()], Some(options), None, None)
        .await
        .unwrap();

    assert_eq!(status, "x|none|a,b");
}

#[tokio::test]
async fn test_fault_decoded_the_same_without_http_errors() {
    let addr = start_server().await;
    let client = client(XmlBinding::new(addr));

    let default_err = client.operation("Explode", vec![]).await.unwrap_err();

    let options = CallOptions::new().request_options(RequestOptions::new().http_errors(false));
    let plain_err = client
        .call_async("Explode", vec![], Some(options), None, None)
        .await
        .unwrap_err();

    let expected = Fault::new("soap:Server", "boom");
    assert_eq!(default_err.fault(), Some(&expected));
    assert_eq!(plain_err.fault(), Some(&expected));
}

#[tokio::test]
async fn test_client_error_status_is_decoded_not_fatal() {
    let addr = start_server().await;
    let binding = XmlBinding::new(addr);
    let released = Arc::clone(&binding.released);
    let client = client(binding);

    let status = client.operation("Reject", vec![]).await.unwrap();

    assert_eq!(status, "rejected");
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_response_warns_and_leaves_headers() {
    let addr = start_server().await;
    let client = client(XmlBinding::new(addr));
    let logger = CollectingLogger::default();
    let headers = HeaderSlot::with_value(vec!["initial".to_string()]);

    let err = client
        .call_async(
            "Empty",
            vec![],
            Some(CallOptions::new().logger(logger.clone())),
            None,
            Some(headers.clone()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(BindingError::Malformed(_))));
    assert_eq!(logger.levels(), vec!["debug", "warning"]);
    assert_eq!(
        logger.records.lock().unwrap()[1].1,
        "Empty response has been detected"
    );
    let context = logger.last_context.lock().unwrap().clone().unwrap();
    assert_eq!(context.get("response"), Some(&serde_json::Value::from("")));
    assert_eq!(headers.get(), Some(vec!["initial".to_string()]));
}

#[tokio::test]
async fn test_request_timeout() {
    let addr = start_server().await;
    let binding = XmlBinding::new(addr);
    let released = Arc::clone(&binding.released);
    let client = client(binding);

    let options = CallOptions::new()
        .request_options(RequestOptions::new().timeout(Duration::from_millis(100)));
    let err = client
        .call_async("Slow", vec![], Some(options), None, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Timeout(_))
    ));
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind and drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let binding = XmlBinding::new(addr);
    let released = Arc::clone(&binding.released);
    let client = client(binding);

    let err = client.operation("GetStatus", vec![]).await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.fault().is_none());
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_binding() {
    let addr = start_server().await;
    let binding = XmlBinding::new(addr);
    let released = Arc::clone(&binding.released);
    let client = client(binding);

    let calls: Vec<_> = (0..8)
        .map(|i| {
            client.call_async("Echo", vec![i.to_string()], None, None, None)
        })
        .collect();
    let results = futures::future::join_all(calls).await;

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), format!("{i}|none|none"));
    }
    assert_eq!(released.load(Ordering::SeqCst), 8);
}

#[test]
fn test_blocking_call() {
    let server = tokio::runtime::Runtime::new().unwrap();
    let addr = server.block_on(start_server());

    let client = client(XmlBinding::new(addr));
    let status = client
        .call("GetStatus", vec![], None, None, None)
        .unwrap();

    assert_eq!(status, "ok");
}
