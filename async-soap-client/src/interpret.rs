//! Response interpretation.
//!
//! Hands a response to the binding and commits the output headers it produced.

use async_soap_core::{Binding, HeaderSlot, SoapResponse};

use crate::ClientError;

/// Decode `response` with `binding`.
///
/// The binding fills a fresh headers value; it is stored into `output_headers`
/// only when decoding succeeds, so a failed or partial decode never leaks into
/// the caller's slot.
pub(crate) fn decode<B: Binding + ?Sized>(
    binding: &B,
    response: SoapResponse,
    name: &str,
    output_headers: Option<&HeaderSlot<B::OutputHeaders>>,
) -> Result<B::Output, ClientError> {
    let mut headers = B::OutputHeaders::default();
    let output = binding
        .decode_response(response, name, &mut headers)
        .map_err(ClientError::Decode)?;
    if let Some(slot) = output_headers {
        slot.store(headers);
    }
    Ok(output)
}
