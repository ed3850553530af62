use net::{DecodeError, Envelope, MoodLabel, Reading, UiUpdate};
use tracing::warn;

use crate::Modal;

/// Everything that can change the display.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MoodUpdate { label: MoodLabel, speech: String },
    SpeechUpdate { text: String },
    /// Present fields overwrite, absent ones are left alone.
    Readings(Reading),
    Touch,
    TouchTimeout { token: u64 },
    StartFade { token: u64 },
    FadeComplete { token: u64 },
    UserChatSend { text: String },
    ChatSendFailed,
    OpenModal(Modal),
    CloseModal(Modal),
}

impl Event {
    /// Split one inbound payload into the events it carries.
    ///
    /// Readings come first so a mood and the values behind it land together.
    /// An unknown mood label is shown as neutral; a blank one counts as absent.
    pub fn from_update(update: UiUpdate) -> Vec<Event> {
        let mut events = Vec::new();
        if !update.reading.is_empty() {
            events.push(Event::Readings(update.reading));
        }
        let mood = update.mood.filter(|m| !m.trim().is_empty());
        match (mood, update.speech) {
            (Some(mood), speech) => {
                let label = mood.parse().unwrap_or_else(|e: DecodeError| {
                    warn!(error = %e, "unknown mood, showing neutral");
                    MoodLabel::Neutral
                });
                events.push(Event::MoodUpdate {
                    label,
                    speech: speech.unwrap_or_default(),
                });
            }
            (None, Some(text)) => events.push(Event::SpeechUpdate { text }),
            (None, None) => {}
        }
        events
    }

    /// Decode a bus envelope. Malformed payloads yield the decode error.
    pub fn from_envelope(env: &Envelope) -> Result<Vec<Event>, DecodeError> {
        env.decode::<UiUpdate>().map(Event::from_update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use net::Topic;
    use serde_json::json;

    #[test]
    fn mood_payload_carries_readings_too() {
        let env = Envelope {
            topic: Topic::MoodUpdate,
            payload: json!({"mood": "thirsty", "speech": "Water!", "moisture": 12.0}),
        };
        let events = Event::from_envelope(&env).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], Event::Readings(r) if r.moisture == Some(12.0)));
        assert_eq!(
            events[1],
            Event::MoodUpdate {
                label: MoodLabel::Thirsty,
                speech: "Water!".into()
            }
        );
    }

    #[test]
    fn unknown_mood_is_neutral() {
        let events = Event::from_update(UiUpdate {
            mood: Some("ecstatic".into()),
            ..Default::default()
        });
        assert_eq!(
            events,
            vec![Event::MoodUpdate {
                label: MoodLabel::Neutral,
                speech: String::new()
            }]
        );
    }

    #[test]
    fn speech_only_and_raw_readings() {
        let speech = Event::from_update(UiUpdate {
            speech: Some("hi".into()),
            ..Default::default()
        });
        assert_eq!(speech, vec![Event::SpeechUpdate { text: "hi".into() }]);

        let env = Envelope {
            topic: Topic::SensorRaw,
            payload: json!({"soil": 40, "temp": 21.5}),
        };
        let events = Event::from_envelope(&env).unwrap();
        assert!(matches!(&events[..], [Event::Readings(r)] if r.temperature == Some(21.5)));
    }

    #[test]
    fn blank_mood_leaves_the_face_alone() {
        let env = Envelope {
            topic: Topic::ChatUpdate,
            payload: json!({"mood": "", "speech": "hello"}),
        };
        let events = Event::from_envelope(&env).unwrap();
        assert_eq!(events, vec![Event::SpeechUpdate { text: "hello".into() }]);

        let events = Event::from_update(UiUpdate {
            mood: Some("  ".into()),
            ..Default::default()
        });
        assert!(events.is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let env = Envelope {
            topic: Topic::ChatUpdate,
            payload: json!({"speech": 42}),
        };
        assert!(Event::from_envelope(&env).is_err());
    }
}
