use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Failures talking to (or setting up) the generative model.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not set. Please configure your .env file.")]
    MissingApiKey,

    #[error("Failed to build model client: {0}")]
    Client(String),

    #[error("Model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed model response: {0}")]
    Malformed(String),
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1200,
        }
    }
}

/// Interface for a single-shot text generation model.
/// The model keeps no conversation state between calls.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate text for `prompt`.
    /// Returns `Ok(None)` when the model answered but produced no text
    /// (blocked by safety filters, empty candidate list).
    async fn generate_content(&self, prompt: &str) -> Result<Option<String>, LlmError>;

    fn model_name(&self) -> &str;
}
