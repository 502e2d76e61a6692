//! MCP tool definitions and typed tool requests

use serde_json::{json, Value};
use thiserror::Error;

use super::protocol::ToolDefinition;

/// Topic prefix for `get_crypto_strategy`
pub const STRATEGY_TOPIC_PREFIX: &str = "cryptocurrency trading strategy: ";

/// Topic prefix for `analyze_crypto_indicator`
pub const INDICATOR_TOPIC_PREFIX: &str = "cryptocurrency technical indicator: ";

/// All tool definitions: (name, description, input schema)
pub const TOOL_DEFINITIONS: &[(&str, &str, &str)] = &[
    (
        "explain_crypto_concept",
        "Explain a cryptocurrency or quantitative-finance concept",
        r#"{
            "type": "object",
            "properties": {
                "topic": {"type": "string", "description": "Concept to explain, e.g. \"Sharpe ratio\" or \"impermanent loss\""}
            },
            "required": ["topic"]
        }"#,
    ),
    (
        "get_crypto_strategy",
        "Generate a detailed algorithmic trading strategy outline",
        r#"{
            "type": "object",
            "properties": {
                "strategy_type": {"type": "string", "description": "Kind of strategy, e.g. \"mean reversion\" or \"grid trading\""}
            },
            "required": ["strategy_type"]
        }"#,
    ),
    (
        "analyze_crypto_indicator",
        "Analyse a technical indicator and show Python implementation",
        r#"{
            "type": "object",
            "properties": {
                "indicator": {"type": "string", "description": "Technical indicator, e.g. \"RSI\" or \"Bollinger Bands\""}
            },
            "required": ["indicator"]
        }"#,
    ),
];

/// Get all tool definitions as ToolDefinition structs
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    TOOL_DEFINITIONS
        .iter()
        .map(|(name, description, schema)| ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: serde_json::from_str(schema).unwrap_or(json!({})),
        })
        .collect()
}

/// Why a tool call could not be turned into a [`ToolRequest`].
///
/// Both are answered with ordinary text content, not protocol errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolRequestError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Error: {0} is required")]
    MissingArgument(&'static str),
}

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    /// `explain_crypto_concept`
    ExplainConcept { topic: String },
    /// `get_crypto_strategy`
    Strategy { strategy_type: String },
    /// `analyze_crypto_indicator`
    Indicator { indicator: String },
}

impl ToolRequest {
    /// Build a request from a tool name and its argument object
    pub fn from_call(name: &str, arguments: &Value) -> Result<Self, ToolRequestError> {
        match name {
            "explain_crypto_concept" => Ok(ToolRequest::ExplainConcept {
                topic: required_string(arguments, "topic", "Topic")?,
            }),
            "get_crypto_strategy" => Ok(ToolRequest::Strategy {
                strategy_type: required_string(arguments, "strategy_type", "Strategy type")?,
            }),
            "analyze_crypto_indicator" => Ok(ToolRequest::Indicator {
                indicator: required_string(arguments, "indicator", "Indicator")?,
            }),
            other => Err(ToolRequestError::UnknownTool(other.to_string())),
        }
    }

    /// Tool name as registered with the host
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRequest::ExplainConcept { .. } => "explain_crypto_concept",
            ToolRequest::Strategy { .. } => "get_crypto_strategy",
            ToolRequest::Indicator { .. } => "analyze_crypto_indicator",
        }
    }

    /// Topic substituted into the master prompt
    pub fn topic(&self) -> String {
        match self {
            ToolRequest::ExplainConcept { topic } => topic.clone(),
            ToolRequest::Strategy { strategy_type } => {
                format!("{}{}", STRATEGY_TOPIC_PREFIX, strategy_type)
            }
            ToolRequest::Indicator { indicator } => {
                format!("{}{}", INDICATOR_TOPIC_PREFIX, indicator)
            }
        }
    }
}

/// Non-blank string argument, kept exactly as the caller sent it
fn required_string(
    arguments: &Value,
    field: &str,
    label: &'static str,
) -> Result<String, ToolRequestError> {
    match arguments.get(field).and_then(|v| v.as_str()) {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(ToolRequestError::MissingArgument(label)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_parse() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 3);
        for tool in &tools {
            let required = tool.input_schema["required"].as_array().unwrap();
            assert_eq!(required.len(), 1, "{} must have one required field", tool.name);
            let field = required[0].as_str().unwrap();
            assert_eq!(tool.input_schema["properties"][field]["type"], "string");
        }
    }

    #[test]
    fn test_definitions_match_requests() {
        for tool in get_tool_definitions() {
            let field = tool.input_schema["required"][0].as_str().unwrap().to_string();
            let mut args = serde_json::Map::new();
            args.insert(field, json!("x"));
            let request = ToolRequest::from_call(&tool.name, &Value::Object(args)).unwrap();
            assert_eq!(request.tool_name(), tool.name);
        }
    }

    #[test]
    fn test_topic_composition() {
        let explain = ToolRequest::from_call("explain_crypto_concept", &json!({"topic": "VWAP"}));
        assert_eq!(explain.unwrap().topic(), "VWAP");

        let strategy =
            ToolRequest::from_call("get_crypto_strategy", &json!({"strategy_type": "momentum"}));
        assert_eq!(
            strategy.unwrap().topic(),
            "cryptocurrency trading strategy: momentum"
        );

        let indicator =
            ToolRequest::from_call("analyze_crypto_indicator", &json!({"indicator": "RSI"}));
        assert_eq!(
            indicator.unwrap().topic(),
            "cryptocurrency technical indicator: RSI"
        );
    }

    #[test]
    fn test_missing_argument() {
        for args in [
            json!({}),
            json!({"strategy_type": ""}),
            json!({"strategy_type": "   "}),
            json!({"strategy_type": 42}),
            Value::Null,
        ] {
            let err = ToolRequest::from_call("get_crypto_strategy", &args).unwrap_err();
            assert_eq!(err, ToolRequestError::MissingArgument("Strategy type"));
            assert_eq!(err.to_string(), "Error: Strategy type is required");
        }
    }

    #[test]
    fn test_unknown_tool() {
        let err = ToolRequest::from_call("get_price", &json!({"symbol": "BTC"})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: get_price");
    }

    #[test]
    fn test_argument_is_not_trimmed() {
        let request =
            ToolRequest::from_call("explain_crypto_concept", &json!({"topic": " funding rate "}))
                .unwrap();
        assert_eq!(request.topic(), " funding rate ");
    }
}
