//! Error types for the Simple Tools MCP crate.

use thiserror::Error;

use crate::mcp::protocol::error_codes;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type, covering both sides of the wire.
#[derive(Error, Debug)]
pub enum Error {
    // ===== Codec Errors =====
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    // ===== Client Errors =====
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// Error envelope reported by the server, surfaced verbatim.
    #[error("Server error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // ===== Dispatch Errors =====
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidToolArguments(String),

    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    // ===== Infrastructure Errors =====
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP server error: {0}")]
    HttpServer(String),
}

impl Error {
    /// JSON-RPC error code this error maps to when it crosses the wire.
    pub fn jsonrpc_code(&self) -> i32 {
        match self {
            Self::MalformedEnvelope(_) | Self::Json(_) => error_codes::PARSE_ERROR,
            Self::UnknownMethod(_) => error_codes::METHOD_NOT_FOUND,
            Self::InvalidToolArguments(_) => error_codes::INVALID_PARAMS,
            Self::ToolNotFound(_) => error_codes::TOOL_NOT_FOUND,
            Self::UnknownSession(_) => error_codes::UNKNOWN_SESSION,
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    /// Check if this error is an HTTP-layer timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}
