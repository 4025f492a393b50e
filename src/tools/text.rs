//! Text statistics tool.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::mcp::protocol::{Tool, ToolResult};
use crate::mcp::registry::{get_string_arg, ToolHandler};

/// Counts characters, words, and lines of a text.
///
/// Characters are Unicode scalar values including whitespace; words are
/// whitespace-delimited; lines split on line-break boundaries with a trailing
/// newline producing no extra empty line.
pub struct TextStatisticsTool;

#[async_trait]
impl ToolHandler for TextStatisticsTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "text_statistics".to_string(),
            description: "Calculate basic text statistics".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Text to analyze"
                    }
                },
                "required": ["text"]
            }),
        }
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolResult> {
        let text = get_string_arg(&args, "text")?;
        let stats = json!({
            "characters": text.chars().count(),
            "words": text.split_whitespace().count(),
            "lines": text.lines().count(),
        });
        Ok(ToolResult::text(stats.to_string()).with_structured(stats))
    }
}
