mod google;

pub use google::GoogleProvider;

use crate::error::ModelError;
use async_trait::async_trait;

/// Generative-language backend used to turn a prompt into text
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send `prompt` to the model and return its raw text reply
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
