use crate::traits::{LLMClient, LLMError};
use crate::OllamaClient;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::debug;

pub const DEFAULT_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma:2b";

/// Stream `prompt` and join every fragment into one trimmed reply.
///
/// The whole exchange must finish within `deadline`; a blank reply counts as
/// an invalid response.
pub async fn collect_reply<C: LLMClient + ?Sized>(
    client: &C,
    model: &str,
    prompt: &str,
    deadline: Duration,
) -> Result<String, LLMError> {
    let work = async {
        let mut stream = client.stream_chat(model, prompt).await?;
        let mut buffer = String::new();
        while let Some(chunk) = stream.next().await {
            buffer.push_str(&chunk?);
        }
        Ok::<_, LLMError>(buffer)
    };
    let reply = tokio::time::timeout(deadline, work)
        .await
        .map_err(|_| LLMError::Timeout(deadline))??;
    let reply = reply.trim();
    debug!(model, reply, "model replied");
    if reply.is_empty() {
        return Err(LLMError::InvalidResponse);
    }
    Ok(reply.to_string())
}

/// Read the server URL from the `OLLAMA_URL` environment variable.
pub fn url_from_env() -> String {
    std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_URL.into())
}

/// Create an [`OllamaClient`] using the `OLLAMA_URL` environment variable.
pub fn client_from_env() -> Result<OllamaClient, LLMError> {
    OllamaClient::new(url_from_env())
}

/// Read the model name from the `OLLAMA_MODEL` environment variable.
pub fn model_from_env() -> String {
    std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into())
}
