//! The plant's conversational side.
//!
//! Each chat request is answered on its own; the agent keeps no history.
//! [`ChatAgent`] wraps a [`Chatter`] and never fails outward: a broken model
//! call turns into a fixed apology.

pub mod agent;
pub mod chatter;

pub use agent::{ChatAgent, APOLOGY};
pub use chatter::{Chatter, LlmChatter, OfflineChatter};
