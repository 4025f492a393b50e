//! Simple Tools MCP server entry point.

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use simple_tools_mcp::config::{Args, Config};
use simple_tools_mcp::error::Result;
use simple_tools_mcp::mcp::registry::ToolRegistry;
use simple_tools_mcp::mcp::server::McpServer;
use simple_tools_mcp::{http, tools, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config: Config = args.into();
    info!("Simple Tools MCP server v{VERSION}");

    let mut registry = ToolRegistry::new();
    tools::register_builtin_tools(&mut registry)?;
    info!("Registered {} tools", registry.len());

    let server = Arc::new(McpServer::new(registry, "simple-tools-server"));
    http::serve(&config, server).await
}
