//! MCP request handler: tool dispatch and resource reads

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::protocol::{
    methods, negotiate_protocol_version, InitializeResult, McpHandler, McpRequest, McpResponse,
    ToolCallResult,
};
use super::resources::{get_resource_definitions, read_resource};
use super::tools::{get_tool_definitions, ToolRequest};
use crate::error::KnowledgeError;
use crate::model::ModelInvoker;
use crate::normalize::normalize;
use crate::prompt;

/// Handles MCP requests for the crypto knowledge tools
///
/// Holds no per-call state; one instance serves every session.
#[derive(Clone)]
pub struct KnowledgeHandler {
    model: Arc<dyn ModelInvoker>,
}

impl KnowledgeHandler {
    pub fn new(model: Arc<dyn ModelInvoker>) -> Self {
        Self { model }
    }

    /// Validate and run a tool call.
    ///
    /// Unknown tools and missing arguments come back as plain text without
    /// touching the model. Model failures come back as an error result.
    pub async fn handle_tool_call(&self, name: &str, arguments: &Value) -> ToolCallResult {
        match ToolRequest::from_call(name, arguments) {
            Ok(request) => self.run_tool(&request).await,
            Err(e) => {
                tracing::warn!(tool = name, "Rejected tool call: {}", e);
                ToolCallResult::text(e.to_string())
            }
        }
    }

    /// Render the prompt, call the model once and normalize its reply
    pub async fn run_tool(&self, request: &ToolRequest) -> ToolCallResult {
        let topic = request.topic();
        let prompt = prompt::render(&topic);

        tracing::info!(
            tool = request.tool_name(),
            model = self.model.model_name(),
            "Calling model for topic {:?}",
            topic
        );

        match self.model.invoke(&prompt).await {
            Ok(raw) => {
                let normalized = normalize(&raw);
                if !normalized.is_parsed() {
                    tracing::warn!(
                        tool = request.tool_name(),
                        "Model reply was not valid JSON ({} chars)",
                        raw.len()
                    );
                }
                ToolCallResult::text(normalized.to_pretty_json())
            }
            Err(e) => {
                tracing::error!(tool = request.tool_name(), "Model call failed: {}", e);
                ToolCallResult::error(format!("Error: {}", e))
            }
        }
    }
}

#[async_trait]
impl McpHandler for KnowledgeHandler {
    async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        if request.is_notification() {
            tracing::debug!("Notification: {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                let requested = request
                    .params
                    .get("protocolVersion")
                    .and_then(|v| v.as_str());
                let result = InitializeResult::for_version(negotiate_protocol_version(requested));
                McpResponse::success(request.id, json!(result))
            }
            methods::INITIALIZED | methods::PING => McpResponse::success(request.id, json!({})),
            methods::LIST_TOOLS => {
                let tools = get_tool_definitions();
                McpResponse::success(request.id, json!({"tools": tools}))
            }
            methods::CALL_TOOL => {
                let Some(name) = request.params.get("name").and_then(|v| v.as_str()) else {
                    return Some(McpResponse::from_error(
                        request.id,
                        KnowledgeError::InvalidParams("missing tool name".to_string()),
                    ));
                };
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(json!({}));

                let tool_result = self.handle_tool_call(name, &arguments).await;
                McpResponse::success(request.id, json!(tool_result))
            }
            methods::LIST_RESOURCES => {
                let resources = get_resource_definitions();
                McpResponse::success(request.id, json!({"resources": resources}))
            }
            methods::LIST_RESOURCE_TEMPLATES => {
                McpResponse::success(request.id, json!({"resourceTemplates": []}))
            }
            methods::READ_RESOURCE => {
                let Some(uri) = request.params.get("uri").and_then(|v| v.as_str()) else {
                    return Some(McpResponse::from_error(
                        request.id,
                        KnowledgeError::InvalidParams("missing resource uri".to_string()),
                    ));
                };
                match read_resource(uri) {
                    Ok(contents) => {
                        McpResponse::success(request.id, json!({"contents": [contents]}))
                    }
                    Err(e) => {
                        tracing::warn!("Resource read failed: {}", e);
                        McpResponse::from_error(request.id, e)
                    }
                }
            }
            _ => McpResponse::from_error(
                request.id,
                KnowledgeError::MethodNotFound(request.method.clone()),
            ),
        };

        Some(response)
    }
}
