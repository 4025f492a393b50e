//! Envelope codec: request encoding and SSE-aware response decoding.
//!
//! Streamable HTTP servers answer either with a bare JSON document or with a
//! single SSE event (`event: message\ndata: <json>\n\n`). The decoder handles
//! both without the caller having to care which one arrived.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Prefix introducing the payload line of an SSE event.
const SSE_DATA_PREFIX: &str = "data:";

/// Serialize a request envelope. Absent `params` become an empty object.
pub fn encode_request(
    method: &str,
    params: Option<Map<String, Value>>,
    id: i64,
) -> Result<Vec<u8>> {
    let request = JsonRpcRequest::new(method, params, id);
    Ok(serde_json::to_vec(&request)?)
}

/// Decode a response body, unwrapping SSE framing when present.
///
/// Scans line by line for the first `data:` line; if one exists its remainder
/// is parsed as JSON, otherwise the whole body is parsed as JSON. Fails with
/// [`Error::MalformedEnvelope`] when neither path yields a valid envelope.
pub fn decode_response(body: &str) -> Result<JsonRpcResponse> {
    if let Some(payload) = extract_sse_data(body) {
        return serde_json::from_str(payload)
            .map_err(|e| Error::MalformedEnvelope(format!("invalid JSON in SSE data line: {e}")));
    }

    serde_json::from_str(body.trim())
        .map_err(|e| Error::MalformedEnvelope(format!("invalid JSON body: {e}")))
}

/// First `data:` payload in the body, if the body is SSE-framed.
fn extract_sse_data(body: &str) -> Option<&str> {
    body.lines()
        .find_map(|line| line.strip_prefix(SSE_DATA_PREFIX))
        .map(str::trim_start)
}
