//! Server configuration
//!
//! Values come from command-line flags with environment fallbacks. A `.env`
//! file is loaded by the binary before parsing, so it feeds the same variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};

use crate::error::{KnowledgeError, Result};
use crate::http::DEFAULT_MCP_PATH;
use crate::model::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

/// Default port for the HTTP transport
pub const DEFAULT_PORT: u16 = 8000;

/// How the MCP host reaches this server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP POST with optional SSE replies
    Http,
}

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "crypto-knowledge-server")]
#[command(about = "MCP server for Gemini-backed crypto knowledge tools")]
#[command(version)]
pub struct ServerArgs {
    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub base_url: String,

    /// Transport to serve MCP on
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value = "http")]
    pub transport: TransportKind,

    /// Bind address for the HTTP transport
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port for the HTTP transport
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path of the MCP endpoint for the HTTP transport
    #[arg(long, env = "MCP_PATH", default_value = DEFAULT_MCP_PATH)]
    pub path: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

/// Validated server configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub transport: TransportKind,
    pub addr: SocketAddr,
    pub path: String,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .field("addr", &self.addr)
            .field("path", &self.path)
            .finish()
    }
}

impl ServerArgs {
    /// Validate arguments into a [`ServerConfig`].
    ///
    /// A missing or blank API key is a configuration error: the server must
    /// not start without one.
    pub fn into_config(self) -> Result<ServerConfig> {
        let api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| KnowledgeError::Config("GOOGLE_API_KEY is required".to_string()))?;

        if self.model.trim().is_empty() {
            return Err(KnowledgeError::Config(
                "model identifier must not be empty".to_string(),
            ));
        }

        if !self.path.starts_with('/') {
            return Err(KnowledgeError::Config(format!(
                "MCP path must start with '/': {}",
                self.path
            )));
        }

        Ok(ServerConfig {
            api_key,
            model: self.model,
            base_url: self.base_url,
            transport: self.transport,
            addr: SocketAddr::new(self.host, self.port),
            path: self.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ServerArgs {
        ServerArgs {
            api_key: Some("test-key".to_string()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            transport: TransportKind::Stdio,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            path: DEFAULT_MCP_PATH.to_string(),
            log_json: false,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = args().into_config().unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.path, "/mcp");
    }

    #[test]
    fn test_missing_api_key() {
        for key in [None, Some(String::new()), Some("  ".to_string())] {
            let err = ServerArgs {
                api_key: key,
                ..args()
            }
            .into_config()
            .unwrap_err();
            assert!(matches!(err, KnowledgeError::Config(_)));
            assert!(err.to_string().contains("GOOGLE_API_KEY"));
        }
    }

    #[test]
    fn test_bad_path() {
        let err = ServerArgs {
            path: "mcp".to_string(),
            ..args()
        }
        .into_config()
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = args().into_config().unwrap();
        assert!(!format!("{:?}", config).contains("test-key"));
    }

    #[test]
    fn test_http_is_default_transport() {
        let args =
            ServerArgs::try_parse_from(["crypto-knowledge-server", "--api-key", "k"]).unwrap();
        let config = args.into_config().unwrap();
        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(config.addr.to_string(), "0.0.0.0:8000");
        assert_eq!(config.path, "/mcp");
    }

    #[test]
    fn test_stdio_transport_flag() {
        let args = ServerArgs::try_parse_from([
            "crypto-knowledge-server",
            "--api-key",
            "k",
            "--transport",
            "stdio",
        ])
        .unwrap();
        assert_eq!(args.transport, TransportKind::Stdio);
    }

    #[test]
    fn test_parse_flags() {
        let args = ServerArgs::try_parse_from([
            "crypto-knowledge-server",
            "--api-key",
            "k",
            "--transport",
            "http",
            "--port",
            "9000",
        ])
        .unwrap();
        assert_eq!(args.transport, TransportKind::Http);
        assert_eq!(args.port, 9000);
    }
}
