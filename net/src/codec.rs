use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BusError, DecodeError, Topic};

/// A payload addressed to a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub topic: Topic,
    pub payload: Value,
}

impl Envelope {
    /// Serialize `payload` for `topic`.
    pub fn new(topic: Topic, payload: &impl Serialize) -> Result<Self, BusError> {
        Ok(Self {
            topic,
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Decode the payload into a typed message. Unknown fields are ignored.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        T::deserialize(&self.payload).map_err(|source| DecodeError::Malformed {
            topic: self.topic,
            source,
        })
    }
}

/// Text frames exchanged with the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Frame {
    Subscribe { topic: Topic },
    Publish { topic: Topic, payload: Value },
    Message { topic: Topic, payload: Value },
}

impl Frame {
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(text).map_err(DecodeError::Frame)
    }

    pub fn to_text(&self) -> String {
        // A Frame is built from a Topic and a serde_json::Value; both always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn publish(envelope: Envelope) -> Self {
        Frame::Publish {
            topic: envelope.topic,
            payload: envelope.payload,
        }
    }

    /// The envelope carried by a `message` frame.
    pub fn into_envelope(self) -> Option<Envelope> {
        match self {
            Frame::Message { topic, payload } => Some(Envelope { topic, payload }),
            _ => None,
        }
    }
}
