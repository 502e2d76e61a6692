//! Generative model invocation
//!
//! Tool handlers only see the [`ModelInvoker`] trait. The production backend
//! is [`GeminiClient`], which calls Gemini `generateContent` with Google Search
//! grounding and thought summaries enabled.

mod gemini;

pub use gemini::{
    Candidate, Content, GeminiClient, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, GoogleSearch, Part, PromptFeedback, ThinkingConfig, Tool,
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
};

use async_trait::async_trait;

use crate::error::Result;

/// Sends a rendered prompt to a model and returns its final answer text
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Issue exactly one request. Failures are returned, never retried.
    async fn invoke(&self, prompt: &str) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}
