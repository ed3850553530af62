use net::{Bus, Envelope, LocalBus, MoodLabel, MoodUpdate, Reading, SpeechUpdate, Topic, UiUpdate};
use serde_json::json;

#[tokio::test]
async fn subscription_only_sees_its_topics() {
    let bus = LocalBus::new(8);
    let mut sub = bus.subscribe(&[Topic::ChatUpdate]).await.unwrap();
    bus.publish(Envelope::new(Topic::SensorRaw, &Reading::default()).unwrap())
        .unwrap();
    bus.publish(
        Envelope::new(
            Topic::ChatUpdate,
            &SpeechUpdate {
                speech: "hello".into(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    let env = sub.recv().await.unwrap();
    assert_eq!(env.topic, Topic::ChatUpdate);
    let speech: SpeechUpdate = env.decode().unwrap();
    assert_eq!(speech.speech, "hello");
}

#[tokio::test]
async fn publish_without_subscribers_is_not_an_error() {
    let bus = LocalBus::default();
    let env = Envelope::new(Topic::ChatRequest, &json!({"text": "anyone?"})).unwrap();
    assert!(bus.publish(env).is_ok());
}

#[test]
fn mood_update_decodes_as_ui_update() {
    let update = MoodUpdate {
        mood: MoodLabel::Cold,
        speech: "brr".into(),
        reading: Reading {
            temperature: Some(4.5),
            ..Reading::default()
        },
    };
    let env = Envelope::new(Topic::MoodUpdate, &update).unwrap();
    let ui: UiUpdate = env.decode().unwrap();
    assert_eq!(ui.mood.as_deref(), Some("cold"));
    assert_eq!(ui.speech.as_deref(), Some("brr"));
    assert_eq!(ui.reading.temperature, Some(4.5));
    assert_eq!(ui.reading.moisture, None);
}

#[test]
fn malformed_payload_is_a_decode_error() {
    let env = Envelope {
        topic: Topic::SensorRaw,
        payload: json!({"moisture": "very wet"}),
    };
    let err = env.decode::<Reading>().unwrap_err();
    assert!(err.to_string().contains("sensor.raw"));
}
