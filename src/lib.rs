//! Crypto Knowledge - MCP server for Gemini-backed crypto tools
//!
//! Registers three tools and one static resource with an MCP host. Each tool
//! renders a fixed prompt, makes one Gemini call with search grounding, and
//! normalizes the reply into JSON.

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod model;
pub mod normalize;
pub mod prompt;

pub use error::{KnowledgeError, Result};
pub use mcp::KnowledgeHandler;
pub use model::{GeminiClient, ModelInvoker};
pub use normalize::{normalize, NormalizedResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
