//! Gemini `generateContent` client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ModelInvoker;
use crate::error::{KnowledgeError, Result};

/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on parts that carry the model's thought summary
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
}

/// Tool enabled on the request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub include_thoughts: bool,
}

/// Response body of `generateContent`, reduced to the fields we read
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Final answer text of the first candidate.
    ///
    /// Thought parts are skipped and the remaining text parts concatenated.
    /// Returns `None` when the candidate holds no answer text at all.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let mut text: Option<String> = None;
        for part in parts.iter().filter(|p| !p.thought) {
            if let Some(chunk) = &part.text {
                text.get_or_insert_with(String::new).push_str(chunk);
            }
        }
        text
    }

    /// Total length of thought text, for diagnostics only
    pub fn thought_len(&self) -> usize {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| p.thought)
                    .filter_map(|p| p.text.as_ref())
                    .map(|t| t.len())
                    .sum()
            })
            .unwrap_or(0)
    }
}

/// Gemini API client
///
/// Built once at startup and shared by every tool call.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client with default settings
    pub fn new(api_key: String) -> Self {
        Self::with_config(api_key, None, None)
    }

    /// Create a new Gemini client with custom settings
    ///
    /// # Arguments
    /// * `api_key` - API key for authentication
    /// * `base_url` - API base URL (defaults to the public v1beta endpoint)
    /// * `model` - Model name (defaults to `gemini-2.5-pro`)
    pub fn with_config(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        }
    }

    /// Full URL of the generateContent endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Request body for a prompt: search grounding on, thoughts included
    pub fn build_request(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    thought: false,
                }],
            }],
            tools: vec![Tool {
                google_search: Some(GoogleSearch {}),
            }],
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    include_thoughts: true,
                }),
            }),
        }
    }

    /// Call generateContent and return the parsed response
    pub async fn generate_content(&self, prompt: &str) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_request(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::Model(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        let response = self.generate_content(prompt).await?;

        tracing::debug!(
            model = %self.model,
            thought_chars = response.thought_len(),
            "Gemini reply received"
        );

        response.text().ok_or_else(|| {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .or_else(|| {
                    response
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.clone())
                })
                .unwrap_or_else(|| "no candidates".to_string());
            KnowledgeError::Model(format!("Gemini returned no text ({})", reason))
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
