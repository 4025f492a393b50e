//! Demo client exercising every built-in tool against a running server.
//!
//! Counterpart of `simple-tools-server`; run that first, then:
//!
//! ```text
//! simple-tools-client [endpoint]
//! ```

use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

use simple_tools_mcp::client::McpClient;
use simple_tools_mcp::error::Result;

fn args_from(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8000/mcp".to_string());

    let mut client = McpClient::new(&endpoint)?;

    println!("Connecting to {endpoint}");
    let info = client.initialize().await?;
    println!(
        "Server: {} v{} (session {})",
        info.server_info.name,
        info.server_info.version,
        client.session_id().unwrap_or("none")
    );
    println!();

    println!("Available tools:");
    for tool in client.list_tools().await? {
        println!("  - {}: {}", tool.name, tool.description);
    }
    println!();

    println!("Test 1: Generate UUID");
    let result = client
        .call_tool("generate_uuid", args_from(json!({"version": 4})))
        .await?;
    println!("Result: {}", result.first_text().unwrap_or_default());
    println!();

    println!("Test 2: Convert temperature (0\u{b0}C to Fahrenheit)");
    let result = client
        .call_tool(
            "convert_temperature",
            args_from(json!({"value": 0, "from_unit": "C", "to_unit": "F"})),
        )
        .await?;
    println!("Result: {}", result.first_text().unwrap_or_default());
    println!();

    println!("Test 3: Text statistics");
    let text = "Hello world!\nThis is a test.\nThree lines total.";
    let result = client
        .call_tool("text_statistics", args_from(json!({"text": text})))
        .await?;
    println!("Result: {}", result.first_text().unwrap_or_default());

    Ok(())
}
