//! JSON-RPC 2.0 and MCP message definitions.
//!
//! Only the request/response subset of the protocol is modelled: there are no
//! notifications and ids are plain integers assigned by the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{JSONRPC_VERSION, MCP_VERSION};

/// A JSON-RPC request.
///
/// `id` is an integer that strictly increases within a session; the server
/// echoes it back so the caller can correlate responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: i64,
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl JsonRpcRequest {
    /// Build a request envelope; absent params become an empty object.
    pub fn new(method: impl Into<String>, params: Option<Map<String, Value>>, id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params: params.unwrap_or_default(),
        }
    }
}

/// A JSON-RPC response carrying exactly one of `result` or `error`.
///
/// `id` is `None` only for parse errors, where the request id could not be
/// recovered from the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success envelope answering `id`.
    pub fn result(id: i64, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Build an error envelope; parse errors pass `id: None`.
    pub fn error(id: Option<i64>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Whether this envelope carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

// ===== MCP-Specific Types =====

/// Server capabilities advertised during initialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    #[serde(default)]
    pub list_changed: bool,
}

/// Name and version of one endpoint, used for both `serverInfo` and
/// `clientInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// Initialize result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
}

/// Initialize request params.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    pub client_info: Implementation,
}

impl InitializeParams {
    /// Params identifying this crate as the client.
    pub fn for_client(name: impl Into<String>) -> Self {
        Self {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: Value::Object(Map::new()),
            client_info: Implementation {
                name: name.into(),
                version: crate::VERSION.to_string(),
            },
        }
    }
}

/// Tool descriptor: name, human description, JSON schema of the arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// List tools result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<Tool>,
}

/// Call tool params.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Tool call result.
///
/// Shaped so a call could return several content items; the built-in tools
/// always return exactly one text item, with the raw typed value duplicated
/// in `structured_content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl ToolResult {
    /// A successful single-text-item result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
            structured_content: None,
        }
    }

    /// Attach the raw typed value alongside the text rendering.
    pub fn with_structured(mut self, value: Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    /// First text item, if any. Convenience for callers and tests.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|c| match c {
            ContentBlock::Text { text } => Some(text.as_str()),
        })
    }
}

/// Content block in a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

// ===== Error Codes =====

/// JSON-RPC error codes, standard plus the server-defined range.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Requested tool name is not in the registry.
    pub const TOOL_NOT_FOUND: i32 = -32000;
    /// Request carried a session id the server never issued.
    pub const UNKNOWN_SESSION: i32 = -32001;
}
