use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DecodeError;

/// Discrete plant moods. Each drives which visual asset is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLabel {
    Happy,
    Thirsty,
    Sad,
    Overwatered,
    LowLight,
    HighLight,
    Smart,
    Touched,
    #[default]
    Neutral,
    Cold,
    Hot,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 11] = [
        MoodLabel::Happy,
        MoodLabel::Thirsty,
        MoodLabel::Sad,
        MoodLabel::Overwatered,
        MoodLabel::LowLight,
        MoodLabel::HighLight,
        MoodLabel::Smart,
        MoodLabel::Touched,
        MoodLabel::Neutral,
        MoodLabel::Cold,
        MoodLabel::Hot,
    ];

    /// Moods the ambient (no threshold fired) inference path may produce.
    pub const AMBIENT: [MoodLabel; 3] = [MoodLabel::Happy, MoodLabel::Sad, MoodLabel::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            MoodLabel::Happy => "happy",
            MoodLabel::Thirsty => "thirsty",
            MoodLabel::Sad => "sad",
            MoodLabel::Overwatered => "overwatered",
            MoodLabel::LowLight => "low_light",
            MoodLabel::HighLight => "high_light",
            MoodLabel::Smart => "smart",
            MoodLabel::Touched => "touched",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Cold => "cold",
            MoodLabel::Hot => "hot",
        }
    }

    pub fn is_ambient(self) -> bool {
        Self::AMBIENT.contains(&self)
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = DecodeError;

    /// Case-insensitive; accepts `low light` and `low-light` for `low_light`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        MoodLabel::ALL
            .into_iter()
            .find(|m| m.as_str() == norm)
            .ok_or_else(|| DecodeError::UnknownMood(s.to_string()))
    }
}

/// One environmental sample in canonical units.
///
/// `moisture` and `light` are percentages (0–100), `temperature` is °C and
/// `humidity` is percent. Every field is optional: a value the device failed
/// to report stays unknown rather than invalidating the whole sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(
        default,
        alias = "soil",
        alias = "soil_perc",
        skip_serializing_if = "Option::is_none"
    )]
    pub moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<f64>,
    #[serde(default, alias = "temp", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<DateTime<Utc>>,
}

impl Reading {
    /// `true` when no environmental field is known.
    pub fn is_empty(&self) -> bool {
        self.moisture.is_none()
            && self.light.is_none()
            && self.temperature.is_none()
            && self.humidity.is_none()
    }

    /// Stamp the reading with the current time.
    pub fn stamped(mut self) -> Self {
        self.taken_at = Some(Utc::now());
        self
    }
}

/// Published on [`Topic::MoodUpdate`](crate::Topic::MoodUpdate).
///
/// The reading that produced the mood rides along so the display can refresh
/// its live-data view from the same message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodUpdate {
    pub mood: MoodLabel,
    pub speech: String,
    #[serde(flatten)]
    pub reading: Reading,
}

/// Published on [`Topic::ChatUpdate`](crate::Topic::ChatUpdate). Never carries a mood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechUpdate {
    pub speech: String,
}

/// Published on [`Topic::ChatRequest`](crate::Topic::ChatRequest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Published on [`Topic::SensorRequest`](crate::Topic::SensorRequest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRequest {
    #[serde(default = "SensorRequest::default_token")]
    pub token: String,
}

impl SensorRequest {
    fn default_token() -> String {
        "update_now".to_string()
    }
}

impl Default for SensorRequest {
    fn default() -> Self {
        Self {
            token: Self::default_token(),
        }
    }
}

/// Receiver-side view of any display-bound payload.
///
/// Readings, mood updates and speech updates all decode into this shape;
/// absent fields stay `None` so the display can merge them field by field.
/// The mood stays a string here because the label set is process-local.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiUpdate {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub speech: Option<String>,
    #[serde(flatten)]
    pub reading: Reading,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_parses_loosely() {
        assert_eq!("Low Light".parse::<MoodLabel>().unwrap(), MoodLabel::LowLight);
        assert_eq!("high-light".parse::<MoodLabel>().unwrap(), MoodLabel::HighLight);
        assert_eq!(" HAPPY ".parse::<MoodLabel>().unwrap(), MoodLabel::Happy);
        assert!("grumpy".parse::<MoodLabel>().is_err());
    }

    #[test]
    fn reading_accepts_hardware_aliases() {
        let r: Reading = serde_json::from_str(r#"{"soil":55,"light":60,"temp":23}"#).unwrap();
        assert_eq!(r.moisture, Some(55.0));
        assert_eq!(r.light, Some(60.0));
        assert_eq!(r.temperature, Some(23.0));
        assert_eq!(r.humidity, None);
    }

    #[test]
    fn mood_update_flattens_reading() {
        let update = MoodUpdate {
            mood: MoodLabel::Thirsty,
            speech: "water please".into(),
            reading: Reading {
                moisture: Some(12.0),
                ..Reading::default()
            },
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["mood"], "thirsty");
        assert_eq!(json["moisture"], 12.0);
        assert!(json.get("light").is_none());
    }

    #[test]
    fn ui_update_ignores_unknown_fields() {
        let u: UiUpdate =
            serde_json::from_str(r#"{"speech":"hi","colour":"green","humidity":40.5}"#).unwrap();
        assert_eq!(u.speech.as_deref(), Some("hi"));
        assert_eq!(u.mood, None);
        assert_eq!(u.reading.humidity, Some(40.5));
    }
}
