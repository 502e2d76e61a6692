//! The static knowledge-base resource

use serde::{Deserialize, Serialize};

use super::protocol::{ResourceContents, ResourceDefinition};
use crate::error::{KnowledgeError, Result};

/// URI of the only resource this server exposes
pub const KNOWLEDGE_BASE_URI: &str = "gemini://crypto-knowledge";

const KNOWLEDGE_BASE_NAME: &str = "crypto_knowledge_base";
const KNOWLEDGE_BASE_MIME: &str = "application/json";

/// Static metadata describing this server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub description: String,
    pub capabilities: Vec<String>,
    pub usage: String,
}

impl ResourceDescriptor {
    /// Descriptor served at [`KNOWLEDGE_BASE_URI`]
    pub fn knowledge_base() -> Self {
        Self {
            description: "Gemini-powered cryptocurrency & quantitative finance knowledge base"
                .to_string(),
            capabilities: vec![
                "Concept explanations".to_string(),
                "Trading strategy design".to_string(),
                "Indicator implementation".to_string(),
                "Python snippets".to_string(),
            ],
            usage: "Invoke the tools with the relevant arguments".to_string(),
        }
    }
}

/// Resources advertised by `resources/list`
pub fn get_resource_definitions() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: KNOWLEDGE_BASE_URI.to_string(),
        name: KNOWLEDGE_BASE_NAME.to_string(),
        description: Some("Static metadata describing this server".to_string()),
        mime_type: Some(KNOWLEDGE_BASE_MIME.to_string()),
    }]
}

/// Read a resource by URI. Anything but [`KNOWLEDGE_BASE_URI`] is not found.
pub fn read_resource(uri: &str) -> Result<ResourceContents> {
    if uri != KNOWLEDGE_BASE_URI {
        return Err(KnowledgeError::ResourceNotFound(uri.to_string()));
    }

    Ok(ResourceContents {
        uri: uri.to_string(),
        mime_type: Some(KNOWLEDGE_BASE_MIME.to_string()),
        text: serde_json::to_string_pretty(&ResourceDescriptor::knowledge_base())?,
    })
}
