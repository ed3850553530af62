use thiserror::Error;

use crate::Topic;

/// Failures while moving envelopes across a transport.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("bus closed")]
    Closed,
    #[error("outbound queue full, message dropped")]
    Backpressure,
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures while turning wire text into typed values.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed {topic} payload: {source}")]
    Malformed {
        topic: Topic,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed frame: {0}")]
    Frame(#[source] serde_json::Error),
    #[error("unknown topic `{0}`")]
    UnknownTopic(String),
    #[error("unknown mood `{0}`")]
    UnknownMood(String),
}
