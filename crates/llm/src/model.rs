use async_trait::async_trait;

use crate::error::GenerateError;

/// A generative text model reachable with a per-call API key.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Model identifier, e.g. `gemini-1.5-flash-002`.
    fn model_name(&self) -> &str;

    /// Send `prompt` and return the model's raw text answer.
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, GenerateError>;
}
