use async_trait::async_trait;
use llm::{collect_reply, LLMClient, LLMError};
use std::time::Duration;
use tracing::info;

/// Something that can answer one line of chat.
#[async_trait]
pub trait Chatter: Send + Sync {
    async fn reply(&self, text: &str) -> Result<String, LLMError>;
}

/// Answers through a language model.
pub struct LlmChatter<C: LLMClient> {
    client: C,
    model: String,
    timeout: Duration,
}

impl<C: LLMClient> LlmChatter<C> {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn prompt(text: &str) -> String {
    format!(
        "You are a cheerful houseplant chatting with the person who looks after you. \
         Answer in one or two short sentences, in the first person.\n\nThey say: {text}"
    )
}

#[async_trait]
impl<C: LLMClient> Chatter for LlmChatter<C> {
    async fn reply(&self, text: &str) -> Result<String, LLMError> {
        let prompt = prompt(text);
        info!(%prompt, "chat prompt");
        collect_reply(&self.client, &self.model, &prompt, self.timeout).await
    }
}

/// Keyword responder for running without a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineChatter;

impl OfflineChatter {
    pub fn answer(text: &str) -> &'static str {
        let text = text.to_lowercase();
        if text.contains("hello") {
            "Hello there! How can I help?"
        } else if text.contains("how are you") {
            "I am feeling great, thanks for asking."
        } else {
            "I'm not sure how to answer that yet."
        }
    }
}

#[async_trait]
impl Chatter for OfflineChatter {
    async fn reply(&self, text: &str) -> Result<String, LLMError> {
        Ok(Self::answer(text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_keywords() {
        assert_eq!(OfflineChatter::answer("Hello plant"), "Hello there! How can I help?");
        assert_eq!(
            OfflineChatter::answer("so, HOW ARE YOU today?"),
            "I am feeling great, thanks for asking."
        );
        assert_eq!(
            OfflineChatter::answer("what is the capital of France"),
            "I'm not sure how to answer that yet."
        );
    }

    #[test]
    fn prompt_carries_the_question() {
        assert!(prompt("do you like jazz?").ends_with("They say: do you like jazz?"));
    }
}
