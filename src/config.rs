//! Configuration for the server binary.

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments for the Simple Tools server.
#[derive(Parser, Debug, Clone)]
#[command(name = "simple-tools-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP tool server over JSON-RPC 2.0 with streamable HTTP")]
pub struct Args {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1", env = "SIMPLE_TOOLS_HOST")]
    pub host: String,

    /// HTTP port
    #[arg(short, long, default_value = "8000", env = "SIMPLE_TOOLS_PORT")]
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long, env = "SIMPLE_TOOLS_DEBUG")]
    pub debug: bool,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Debug mode
    pub debug: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            debug: args.debug,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert!(!config.debug);
    }

    #[test]
    fn test_args_to_config() {
        let args = Args {
            host: "0.0.0.0".to_string(),
            port: 9000,
            debug: true,
        };

        let config: Config = args.into();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert!(config.debug);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            port: 8080,
            ..Config::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"port\":8080"));

        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.port, 8080);
    }
}
