//! Temperature conversion tool.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::mcp::protocol::{Tool, ToolResult};
use crate::mcp::registry::{get_f64_arg, get_string_arg_or, ToolHandler};

/// Converts between Celsius and Fahrenheit.
///
/// Any unit pair other than C->F or F->C, including same-unit and
/// unrecognized units, returns the input unchanged. Documented identity
/// fallback; stricter validation would reject unknown units instead.
pub struct ConvertTemperatureTool;

#[async_trait]
impl ToolHandler for ConvertTemperatureTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "convert_temperature".to_string(),
            description: "Convert temperature between Celsius and Fahrenheit".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "value": {
                        "type": "number",
                        "description": "Temperature value to convert"
                    },
                    "from_unit": {
                        "type": "string",
                        "description": "Source unit ('C' or 'F')",
                        "default": "C"
                    },
                    "to_unit": {
                        "type": "string",
                        "description": "Target unit ('C' or 'F')",
                        "default": "F"
                    }
                },
                "required": ["value"]
            }),
        }
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<ToolResult> {
        let value = get_f64_arg(&args, "value")?;
        let from_unit = get_string_arg_or(&args, "from_unit", "C");
        let to_unit = get_string_arg_or(&args, "to_unit", "F");

        let converted = convert(value, from_unit, to_unit);
        Ok(ToolResult::text(format_value(converted)).with_structured(json!(converted)))
    }
}

fn convert(value: f64, from_unit: &str, to_unit: &str) -> f64 {
    match (from_unit, to_unit) {
        ("C", "F") => value * 9.0 / 5.0 + 32.0,
        ("F", "C") => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

/// Render integral values without a decimal point (32, not 32.0).
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(args: Value) -> ToolResult {
        let args = match args {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        ConvertTemperatureTool.execute(args).await.unwrap()
    }

    #[tokio::test]
    async fn test_celsius_to_fahrenheit() {
        let result = run(json!({"value": 0, "from_unit": "C", "to_unit": "F"})).await;
        assert_eq!(result.first_text(), Some("32"));
        assert_eq!(result.structured_content, Some(json!(32.0)));
    }

    #[tokio::test]
    async fn test_fahrenheit_to_celsius() {
        let result = run(json!({"value": 32, "from_unit": "F", "to_unit": "C"})).await;
        assert_eq!(result.first_text(), Some("0"));
    }

    #[tokio::test]
    async fn test_same_unit_identity() {
        let result = run(json!({"value": 5, "from_unit": "C", "to_unit": "C"})).await;
        assert_eq!(result.first_text(), Some("5"));
    }

    #[tokio::test]
    async fn test_unrecognized_units_identity() {
        let result = run(json!({"value": 300, "from_unit": "K", "to_unit": "C"})).await;
        assert_eq!(result.first_text(), Some("300"));
    }

    #[tokio::test]
    async fn test_default_units() {
        // Defaults mirror the schema: C -> F.
        let result = run(json!({"value": 100})).await;
        assert_eq!(result.first_text(), Some("212"));
    }

    #[tokio::test]
    async fn test_fractional_rendering() {
        let result = run(json!({"value": 37, "from_unit": "C", "to_unit": "F"})).await;
        assert_eq!(result.first_text(), Some("98.6"));
    }

    #[tokio::test]
    async fn test_missing_value_rejected() {
        let args = match json!({"from_unit": "C"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(ConvertTemperatureTool.execute(args).await.is_err());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(32.0), "32");
        assert_eq!(format_value(-40.0), "-40");
        assert_eq!(format_value(98.6), "98.6");
    }
}
