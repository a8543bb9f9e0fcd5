//! The binding contract.

use crate::error::BindingError;
use crate::options::CallOptions;
use crate::{SoapRequest, SoapResponse};

/// Translates between operation calls and wire-level requests/responses.
///
/// A binding knows the service definition: how to turn an operation name and
/// its arguments into an HTTP request, and how to turn the reply back into a
/// result plus output headers. The client never mutates a binding; it is
/// shared behind an `Arc` by every call made through the same client.
///
/// # Example
///
/// ```ignore
/// impl Binding for StatusBinding {
///     type Argument = String;
///     type InputHeaders = Vec<SoapHeader>;
///     type OutputHeaders = Vec<SoapHeader>;
///     type Output = Status;
///
///     fn build_request(&self, name: &str, arguments: &[String], options: Option<&CallOptions>,
///         input_headers: Option<&Vec<SoapHeader>>) -> Result<SoapRequest, BindingError> {
///         let envelope = self.encode(name, arguments, input_headers)?;
///         http::Request::post(&self.endpoint)
///             .header(http::header::CONTENT_TYPE, "text/xml; charset=utf-8")
///             .body(RequestBody::full(envelope))
///             .map_err(|e| BindingError::Other(e.into()))
///     }
///
///     fn decode_response(&self, response: SoapResponse, name: &str,
///         output_headers: &mut Vec<SoapHeader>) -> Result<Status, BindingError> {
///         self.decode(name, response.body(), output_headers)
///     }
/// }
/// ```
pub trait Binding: Send + Sync + 'static {
    /// A single call argument.
    type Argument: Send + 'static;

    /// Header data sent with the request.
    type InputHeaders: Send + 'static;

    /// Header data extracted from the response.
    type OutputHeaders: Default + Send + 'static;

    /// The decoded result of a call.
    type Output: Send + 'static;

    /// Serialize a call into a transport request.
    ///
    /// Fails when the arguments are structurally invalid for the operation.
    fn build_request(
        &self,
        name: &str,
        arguments: &[Self::Argument],
        options: Option<&CallOptions>,
        input_headers: Option<&Self::InputHeaders>,
    ) -> Result<SoapRequest, BindingError>;

    /// Decode a response into a result, filling `output_headers`.
    ///
    /// Fails on malformed payloads and on protocol fault documents.
    fn decode_response(
        &self,
        response: SoapResponse,
        name: &str,
        output_headers: &mut Self::OutputHeaders,
    ) -> Result<Self::Output, BindingError>;
}
