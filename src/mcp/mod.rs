//! MCP (Model Context Protocol) server implementation
//!
//! JSON-RPC over stdio or HTTP for AI tool integration.

pub mod handler;
pub mod protocol;
pub mod resources;
pub mod tools;

pub use handler::KnowledgeHandler;
pub use protocol::{
    methods, InitializeResult, McpHandler, McpRequest, McpResponse, McpServer, ToolCallResult,
};
pub use resources::{read_resource, ResourceDescriptor, KNOWLEDGE_BASE_URI};
pub use tools::{get_tool_definitions, ToolRequest, ToolRequestError, TOOL_DEFINITIONS};
