//! MCP protocol implementation: envelope types, codec, registry, dispatcher.

pub mod codec;
pub mod protocol;
pub mod registry;
pub mod server;

pub use registry::{ToolHandler, ToolRegistry};
pub use server::McpServer;
