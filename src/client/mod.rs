//! HTTP client for MCP servers.
//!
//! Drives the initialize / tools-list / tools-call handshake over a single
//! endpoint, one request at a time, with response correlation via the session
//! id counter.

pub mod session;

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::mcp::codec;
use crate::mcp::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcResponse, ListToolsResult, Tool,
    ToolResult,
};
use session::Session;

/// Bounded per-request timeout; a stuck server surfaces as a transport error
/// rather than hanging the caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// MCP client over streamable HTTP.
///
/// All calls are sequential: each one blocks (awaits) until its round trip
/// completes and none is retried. Transport failures surface as
/// [`Error::Http`], server-reported errors as [`Error::Rpc`].
pub struct McpClient {
    http: reqwest::Client,
    endpoint: String,
    session: Session,
    require_session: bool,
    initialized: bool,
}

impl McpClient {
    /// Create a client for the given endpoint URL (e.g.
    /// `http://localhost:8000/mcp`).
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            session: Session::new(),
            require_session: true,
            initialized: false,
        })
    }

    /// Whether `initialize` must yield a session id to count as successful.
    /// Defaults to true; some servers never issue one.
    pub fn require_session(mut self, required: bool) -> Self {
        self.require_session = required;
        self
    }

    /// The session id issued by the server, once initialized.
    pub fn session_id(&self) -> Option<&str> {
        self.session.session_id()
    }

    /// Perform the `initialize` handshake. Must be the first call.
    ///
    /// Captures the session id from the response headers before returning.
    pub async fn initialize(&mut self) -> Result<InitializeResult> {
        let params = serde_json::to_value(InitializeParams::for_client("simple-tools-client"))?;
        let (response, headers) = self.request("initialize", value_into_map(params)).await?;

        if let Some(error) = response.error {
            return Err(Error::Handshake(format!(
                "server rejected initialize: {} ({})",
                error.message, error.code
            )));
        }

        self.session.capture_session_id(&headers);
        if self.require_session && self.session.session_id().is_none() {
            return Err(Error::Handshake(
                "server did not issue a session id".to_string(),
            ));
        }

        let result = response
            .result
            .ok_or_else(|| Error::Handshake("initialize result missing".to_string()))?;
        let info: InitializeResult = serde_json::from_value(result)?;
        debug!(
            "Initialized against {} v{}",
            info.server_info.name, info.server_info.version
        );

        self.initialized = true;
        Ok(info)
    }

    /// Fetch the tool descriptors the server exposes.
    pub async fn list_tools(&mut self) -> Result<Vec<Tool>> {
        self.ensure_initialized()?;
        let result = self.call("tools/list", None).await?;
        let listed: ListToolsResult = serde_json::from_value(result)?;
        Ok(listed.tools)
    }

    /// Invoke a tool by name. Arguments are validated server-side.
    pub async fn call_tool(
        &mut self,
        name: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Result<ToolResult> {
        self.ensure_initialized()?;
        let params = serde_json::to_value(CallToolParams {
            name: name.into(),
            arguments,
        })?;
        let result = self.call("tools/call", value_into_map(params)).await?;
        Ok(serde_json::from_value(result)?)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::Handshake(
                "initialize must be called before other requests".to_string(),
            ))
        }
    }

    /// Send one request and unwrap the result, mapping error envelopes to
    /// [`Error::Rpc`].
    async fn call(
        &mut self,
        method: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<Value> {
        let (response, _headers) = self.request(method, params).await?;

        if let Some(error) = response.error {
            return Err(Error::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .ok_or_else(|| Error::MalformedEnvelope("response carries neither result nor error".to_string()))
    }

    /// One HTTP round trip: encode, POST, decode, correlate.
    async fn request(
        &mut self,
        method: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<(JsonRpcResponse, HeaderMap)> {
        // The counter advances even when the round trip fails; ids are never
        // reused within a session.
        let id = self.session.next_request_id();
        let body = codec::encode_request(method, params, id)?;

        debug!("-> {method} (id: {id})");
        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.session.build_headers())
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        let headers = response.headers().clone();
        let text = response.text().await?;
        let envelope = codec::decode_response(&text)?;

        if envelope.id != Some(id) {
            return Err(Error::MalformedEnvelope(format!(
                "response id {:?} does not answer request id {id}",
                envelope.id
            )));
        }

        Ok((envelope, headers))
    }
}

fn value_into_map(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
