//! Access to the language model behind the plant's opaque calls.
//!
//! The `llm` crate defines the [`LLMClient`] trait along with the
//! [`OllamaClient`] implementation, plus helpers that collect a streamed reply
//! under a deadline.

pub mod client;
pub mod runner;
pub mod traits;

pub use client::OllamaClient;
pub use runner::{client_from_env, collect_reply, model_from_env, url_from_env};
pub use traits::{LLMClient, LLMError, TextStream};
