use async_trait::async_trait;
use futures_core::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Stream of generated text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>;

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("invalid response")]
    InvalidResponse,
    #[error("no reply within {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Stream the model's reply to `prompt`.
    async fn stream_chat(&self, model: &str, prompt: &str) -> Result<TextStream, LLMError>;
}
