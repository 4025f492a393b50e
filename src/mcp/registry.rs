//! Tool registry: name -> handler lookup populated once at startup.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::mcp::protocol::{Tool, ToolResult};

/// Handler for MCP tool calls.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the tool definition.
    fn definition(&self) -> Tool;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult>;
}

/// Registry of tool handlers.
///
/// Populated during startup and read-only afterwards; `list` preserves
/// registration order.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler; duplicate names are rejected.
    pub fn register<T: ToolHandler + 'static>(&mut self, handler: T) -> Result<()> {
        let name = handler.definition().name;
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateTool(name));
        }
        self.by_name.insert(name, self.handlers.len());
        self.handlers.push(Arc::new(handler));
        Ok(())
    }

    /// All registered tool descriptors, in registration order.
    pub fn list(&self) -> Vec<Tool> {
        self.handlers.iter().map(|h| h.definition()).collect()
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.by_name.get(name).map(|&i| self.handlers[i].clone())
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// ===== Argument Helpers =====

/// Extract a required string argument.
pub fn get_string_arg(args: &Map<String, Value>, name: &str) -> Result<String> {
    args.get(name)
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| missing(name))
}

/// Extract an optional string argument with a default.
pub fn get_string_arg_or<'a>(args: &'a Map<String, Value>, name: &str, default: &'a str) -> &'a str {
    args.get(name).and_then(|v| v.as_str()).unwrap_or(default)
}

/// Extract a required numeric argument.
pub fn get_f64_arg(args: &Map<String, Value>, name: &str) -> Result<f64> {
    args.get(name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| missing(name))
}

/// Extract an optional integer argument with a default.
pub fn get_i64_arg_or(args: &Map<String, Value>, name: &str, default: i64) -> i64 {
    args.get(name).and_then(|v| v.as_i64()).unwrap_or(default)
}

fn missing(name: &str) -> Error {
    Error::InvalidToolArguments(format!("Missing required argument: {name}"))
}
