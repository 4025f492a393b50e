//! Simple Tools MCP - Rust Implementation
//!
//! A minimal Model Context Protocol (MCP) tool server and client speaking
//! JSON-RPC 2.0 over streamable HTTP. The server exposes a small registry of
//! tools behind a single `POST /mcp` endpoint; the client drives the
//! initialize / tools-list / tools-call handshake and understands both plain
//! JSON and SSE-framed response bodies.
//!
//! # Architecture
//!
//! 1. **Protocol** (`mcp::protocol`) - JSON-RPC envelope and MCP result types
//! 2. **Codec** (`mcp::codec`) - request encoding, SSE-aware response decoding
//! 3. **Dispatch** (`mcp::registry`, `mcp::server`) - tool registry and the
//!    per-request dispatch state machine
//! 4. **Transports** (`http`, `client`) - axum server endpoint and the
//!    reqwest-based client with session correlation

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod tools;

pub use error::{Error, Result};

/// Crate version reported in `serverInfo` and `clientInfo`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON-RPC protocol tag.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision this crate speaks.
pub const MCP_VERSION: &str = "2024-11-05";

/// Single HTTP endpoint path serving the protocol.
pub const MCP_ENDPOINT: &str = "/mcp";

/// Header carrying the server-issued session identifier.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";
