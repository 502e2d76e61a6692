//! MCP over HTTP
//!
//! Clients POST JSON-RPC messages to a single endpoint and get the reply back
//! either as a JSON body or as a one-event SSE stream.

mod server;

pub use server::{HttpServer, SharedHandler, DEFAULT_MCP_PATH};
