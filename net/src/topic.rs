use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DecodeError;

/// Named channels on the plant bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Raw environmental readings from the sensor source.
    #[serde(rename = "sensor.raw")]
    SensorRaw,
    /// "Read now" triggers for the sensor source.
    #[serde(rename = "sensor.request")]
    SensorRequest,
    /// Mood plus sentence from the inference agent.
    #[serde(rename = "mood.update")]
    MoodUpdate,
    /// Free text typed by the user.
    #[serde(rename = "chat.request")]
    ChatRequest,
    /// Speech-only replies from the conversation agent.
    #[serde(rename = "chat.update")]
    ChatUpdate,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::SensorRaw,
        Topic::SensorRequest,
        Topic::MoodUpdate,
        Topic::ChatRequest,
        Topic::ChatUpdate,
    ];

    /// Wire name of the topic.
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::SensorRaw => "sensor.raw",
            Topic::SensorRequest => "sensor.request",
            Topic::MoodUpdate => "mood.update",
            Topic::ChatRequest => "chat.request",
            Topic::ChatUpdate => "chat.update",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| DecodeError::UnknownTopic(s.to_string()))
    }
}
