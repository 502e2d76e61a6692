//! Error types for the crypto knowledge server

use thiserror::Error;

/// Result type alias for crypto knowledge operations
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Main error type for the crypto knowledge server
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),
}

impl KnowledgeError {
    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            KnowledgeError::InvalidParams(_) => -32602,
            KnowledgeError::MethodNotFound(_) => -32601,
            KnowledgeError::ResourceNotFound(_) => -32002,
            _ => -32000,
        }
    }
}
