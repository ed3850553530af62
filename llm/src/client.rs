//! HTTP client for an Ollama language model server.
//!
//! [`OllamaClient`] implements [`LLMClient`] by streaming generation chunks
//! from a running Ollama instance.

use crate::traits::{LLMClient, LLMError, TextStream};
use async_trait::async_trait;
use tokio_stream::StreamExt;

use ollama_rs::{generation::completion::request::GenerationRequest, Ollama};

pub struct OllamaClient {
    inner: Ollama,
}

impl OllamaClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, LLMError> {
        let inner = Ollama::try_new(base_url.as_ref())
            .map_err(|e| LLMError::InvalidUrl(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn stream_chat(&self, model: &str, prompt: &str) -> Result<TextStream, LLMError> {
        let req = GenerationRequest::new(model.to_string(), prompt.to_string());
        let stream = self
            .inner
            .generate_stream(req)
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;
        let mapped = stream.map(|res| {
            res.map_err(|e| LLMError::Network(e.to_string()))
                .map(|chunk| {
                    chunk
                        .into_iter()
                        .map(|c| c.response)
                        .collect::<Vec<_>>()
                        .join("")
                })
        });
        Ok(Box::pin(mapped))
    }
}
