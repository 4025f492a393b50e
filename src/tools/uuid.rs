//! UUID generation tool.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::Result;
use crate::mcp::protocol::{Tool, ToolResult};
use crate::mcp::registry::{get_i64_arg_or, ToolHandler};

/// Generates a random UUID.
///
/// Version 4 uses the fully random scheme. Any other requested version falls
/// back to the time-based v1 scheme; this is a documented simplification, not
/// full per-version support.
pub struct GenerateUuidTool;

#[async_trait]
impl ToolHandler for GenerateUuidTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "generate_uuid".to_string(),
            description: "Generate a random UUID".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "version": {
                        "type": "integer",
                        "description": "UUID version (default 4)",
                        "default": 4
                    }
                }
            }),
        }
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolResult> {
        let version = get_i64_arg_or(&args, "version", 4);
        let id = if version == 4 {
            Uuid::new_v4()
        } else {
            Uuid::now_v1(&random_node_id())
        };
        Ok(ToolResult::text(id.to_string()))
    }
}

/// Random 6-byte node id for the time-based scheme; no stable MAC address is
/// wanted here.
fn random_node_id() -> [u8; 6] {
    let bytes = *Uuid::new_v4().as_bytes();
    [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]]
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn generate(args: Value) -> String {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let result = GenerateUuidTool.execute(args).await.unwrap();
        result.first_text().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_v4_format() {
        let id = generate(json!({"version": 4})).await;
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }

    #[tokio::test]
    async fn test_default_version_is_v4() {
        let id = generate(json!({})).await;
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);
    }

    #[tokio::test]
    async fn test_two_calls_differ() {
        let a = generate(json!({"version": 4})).await;
        let b = generate(json!({"version": 4})).await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_other_versions_fall_back_to_time_based() {
        let id = generate(json!({"version": 7})).await;
        assert_eq!(id.len(), 36);
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 1);
    }
}
