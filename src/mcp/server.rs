//! Server-side dispatcher: parse, resolve, invoke, respond.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::mcp::protocol::{
    error_codes, CallToolParams, Implementation, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ToolsCapability,
};
use crate::mcp::registry::ToolRegistry;
use crate::{MCP_VERSION, VERSION};

/// Outcome of dispatching one request body.
#[derive(Debug)]
pub struct Dispatch {
    pub response: JsonRpcResponse,
    /// Session id issued by this request (only set for `initialize`).
    pub new_session: Option<String>,
}

impl Dispatch {
    fn reply(response: JsonRpcResponse) -> Self {
        Self {
            response,
            new_session: None,
        }
    }
}

/// Per-session bookkeeping on the server side.
struct SessionEntry {
    created: Instant,
    requests: u64,
}

/// Issues session ids on initialize and validates them on later requests.
struct SessionManager {
    sessions: DashMap<String, SessionEntry>,
}

impl SessionManager {
    fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Issue a fresh opaque session id.
    fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                created: Instant::now(),
                requests: 0,
            },
        );
        id
    }

    /// Record one request against a session; false when the id was never issued.
    fn touch(&self, id: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.requests += 1;
                true
            }
            None => false,
        }
    }
}

/// The MCP server: a read-only tool registry plus session bookkeeping.
///
/// Constructed once at startup and handed to the HTTP layer; requests across
/// sessions may be dispatched concurrently, handlers only ever see the shared
/// registry through `Arc`.
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    sessions: SessionManager,
    info: Implementation,
}

impl McpServer {
    /// Create a server around a fully populated registry.
    pub fn new(registry: ToolRegistry, name: impl Into<String>) -> Self {
        let registry = Arc::new(registry);
        info!("MCP server ready with {} tools", registry.len());
        Self {
            registry,
            sessions: SessionManager::new(),
            info: Implementation {
                name: name.into(),
                version: VERSION.to_string(),
            },
        }
    }

    /// Dispatch one raw request body.
    ///
    /// `session` is the value of the session header, if the client sent one.
    /// Every outcome, including parse failures, is an envelope; this method
    /// never errors out of band.
    pub async fn dispatch(&self, body: &[u8], session: Option<&str>) -> Dispatch {
        let request: JsonRpcRequest = match serde_json::from_slice(body) {
            Ok(req) => req,
            Err(e) => {
                warn!("Rejecting malformed request body: {e}");
                return Dispatch::reply(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        debug!("Dispatching {} (id: {})", request.method, request.id);

        if let Some(id) = session {
            if !self.sessions.touch(id) {
                let err = Error::UnknownSession(id.to_string());
                return Dispatch::reply(JsonRpcResponse::error(
                    Some(request.id),
                    err.jsonrpc_code(),
                    err.to_string(),
                ));
            }
        }

        let mut new_session = None;
        let result = match request.method.as_str() {
            "initialize" => {
                let id = self.sessions.create();
                info!("Session established: {id}");
                new_session = Some(id);
                self.handle_initialize()
            }
            "ping" => Ok(Value::Object(Map::new())),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(request.params).await,
            other => Err(Error::UnknownMethod(other.to_string())),
        };

        let response = match result {
            Ok(value) => JsonRpcResponse::result(request.id, value),
            Err(e) => {
                debug!("Request {} failed: {e}", request.id);
                JsonRpcResponse::error(Some(request.id), e.jsonrpc_code(), e.to_string())
            }
        };

        Dispatch {
            response,
            new_session,
        }
    }

    fn handle_initialize(&self) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.registry.list(),
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_call_tool(&self, params: Map<String, Value>) -> Result<Value> {
        let params: CallToolParams = serde_json::from_value(Value::Object(params))
            .map_err(|e| Error::InvalidToolArguments(e.to_string()))?;

        let handler = self
            .registry
            .get(&params.name)
            .ok_or_else(|| Error::ToolNotFound(params.name.clone()))?;

        // Handler failures become error envelopes with the message forwarded
        // and nothing else; the dispatcher itself keeps serving.
        let result = handler.execute(params.arguments).await?;
        Ok(serde_json::to_value(result)?)
    }

    /// Age of a session, if the id is known. Exposed for diagnostics.
    pub fn session_age(&self, id: &str) -> Option<std::time::Duration> {
        self.sessions.sessions.get(id).map(|e| e.created.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::{Tool, ToolResult};
    use crate::mcp::registry::ToolHandler;
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingTool;

    #[async_trait]
    impl ToolHandler for FailingTool {
        fn definition(&self) -> Tool {
            Tool {
                name: "explode".to_string(),
                description: "Always fails".to_string(),
                input_schema: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _args: Map<String, Value>) -> Result<ToolResult> {
            Err(Error::ToolExecutionFailed("boom".to_string()))
        }
    }

    struct OkTool;

    #[async_trait]
    impl ToolHandler for OkTool {
        fn definition(&self) -> Tool {
            Tool {
                name: "ok".to_string(),
                description: "Always succeeds".to_string(),
                input_schema: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _args: Map<String, Value>) -> Result<ToolResult> {
            Ok(ToolResult::text("fine"))
        }
    }

    fn test_server() -> McpServer {
        let mut registry = ToolRegistry::new();
        registry.register(OkTool).unwrap();
        registry.register(FailingTool).unwrap();
        McpServer::new(registry, "test-server")
    }

    fn request_body(id: i64, method: &str, params: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_issues_session() {
        let server = test_server();
        let dispatch = server
            .dispatch(&request_body(1, "initialize", json!({})), None)
            .await;

        assert!(!dispatch.response.is_error());
        let session = dispatch.new_session.expect("session id issued");
        assert_eq!(session.len(), 36);
        assert!(server.session_age(&session).is_some());

        let result = dispatch.response.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["serverInfo"]["name"], "test-server");
    }

    #[tokio::test]
    async fn test_known_session_accepted() {
        let server = test_server();
        let init = server
            .dispatch(&request_body(1, "initialize", json!({})), None)
            .await;
        let session = init.new_session.unwrap();

        let dispatch = server
            .dispatch(&request_body(2, "tools/list", json!({})), Some(&session))
            .await;
        assert!(!dispatch.response.is_error());
        assert!(dispatch.new_session.is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_rejected() {
        let server = test_server();
        let dispatch = server
            .dispatch(
                &request_body(2, "tools/list", json!({})),
                Some("never-issued"),
            )
            .await;

        let error = dispatch.response.error.unwrap();
        assert_eq!(error.code, error_codes::UNKNOWN_SESSION);
        assert_eq!(dispatch.response.id, Some(2));
    }

    #[tokio::test]
    async fn test_parse_error_null_id() {
        let server = test_server();
        let dispatch = server.dispatch(b"{not json", None).await;

        assert_eq!(dispatch.response.id, None);
        assert_eq!(
            dispatch.response.error.unwrap().code,
            error_codes::PARSE_ERROR
        );
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = test_server();
        let dispatch = server
            .dispatch(&request_body(3, "resources/list", json!({})), None)
            .await;

        let error = dispatch.response.error.unwrap();
        assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(dispatch.response.id, Some(3));
    }

    #[tokio::test]
    async fn test_tools_list_in_registration_order() {
        let server = test_server();
        let dispatch = server
            .dispatch(&request_body(1, "tools/list", json!({})), None)
            .await;

        let result = dispatch.response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "ok");
        assert_eq!(tools[1]["name"], "explode");
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = test_server();
        let dispatch = server
            .dispatch(
                &request_body(5, "tools/call", json!({"name": "nope", "arguments": {}})),
                None,
            )
            .await;

        let error = dispatch.response.error.unwrap();
        assert_eq!(error.code, error_codes::TOOL_NOT_FOUND);
        assert_eq!(dispatch.response.id, Some(5));
    }

    #[tokio::test]
    async fn test_handler_failure_becomes_envelope_and_server_survives() {
        let server = test_server();
        let dispatch = server
            .dispatch(
                &request_body(6, "tools/call", json!({"name": "explode", "arguments": {}})),
                None,
            )
            .await;

        let error = dispatch.response.error.unwrap();
        assert_eq!(error.code, error_codes::INTERNAL_ERROR);
        assert!(error.message.contains("boom"));

        // Subsequent requests still work.
        let dispatch = server
            .dispatch(
                &request_body(7, "tools/call", json!({"name": "ok", "arguments": {}})),
                None,
            )
            .await;
        assert!(!dispatch.response.is_error());
        assert_eq!(dispatch.response.id, Some(7));
    }

    #[tokio::test]
    async fn test_ping() {
        let server = test_server();
        let dispatch = server
            .dispatch(&request_body(1, "ping", json!({})), None)
            .await;
        assert_eq!(dispatch.response.result.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_call_tool_missing_name() {
        let server = test_server();
        let dispatch = server
            .dispatch(&request_body(8, "tools/call", json!({})), None)
            .await;

        let error = dispatch.response.error.unwrap();
        assert_eq!(error.code, error_codes::INVALID_PARAMS);
    }
}
