//! Language-model completion client.
//!
//! [`CompletionModel`] is the seam the voice intake depends on;
//! [`OpenAiClient`] implements it against the OpenAI chat completions API.

pub mod error;
pub mod openai;
pub mod types;

pub use error::LlmError;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{ChatMessage, ChatRole, CompletionRequest};

use async_trait::async_trait;

/// A chat-completion capable language model.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Model name used when a request leaves it empty.
    fn default_model(&self) -> &str;

    /// Run one completion and return the reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
