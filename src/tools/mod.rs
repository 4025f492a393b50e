//! Built-in tool implementations.
//!
//! Three illustrative tools exercising the dispatch path:
//!
//! - `uuid` - random identifier generation
//! - `temperature` - Celsius/Fahrenheit conversion
//! - `text` - basic text statistics

pub mod temperature;
pub mod text;
pub mod uuid;

use crate::error::Result;
use crate::mcp::registry::ToolRegistry;

/// Register the built-in tools, in the order clients should see them listed.
pub fn register_builtin_tools(registry: &mut ToolRegistry) -> Result<()> {
    registry.register(uuid::GenerateUuidTool)?;
    registry.register(temperature::ConvertTemperatureTool)?;
    registry.register(text::TextStatisticsTool)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registration_order() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry).unwrap();

        let names: Vec<_> = registry.list().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["generate_uuid", "convert_temperature", "text_statistics"]
        );
    }

    #[test]
    fn test_double_registration_fails() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry).unwrap();
        assert!(register_builtin_tools(&mut registry).is_err());
    }
}
