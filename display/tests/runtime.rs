use async_trait::async_trait;
use display::{Command, Countenance, DisplayConfig, Mediator, Modal};
use net::{Bus, BusError, ChatRequest, Envelope, LocalBus, MoodLabel, Subscription, Topic};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;

#[derive(Clone, Default)]
struct Recording(Arc<Mutex<Vec<Command>>>);

impl Recording {
    fn layers(&self) -> Vec<PathBuf> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Command::PrepareLayer { asset, .. } => Some(asset.clone()),
                _ => None,
            })
            .collect()
    }

    fn crossfades(&self) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Command::Crossfade { .. }))
            .count()
    }
}

impl Countenance for Recording {
    fn apply(&self, command: &Command) {
        self.0.lock().unwrap().push(command.clone());
    }
}

/// Bus that refuses everything and remembers being closed.
#[derive(Default)]
struct DeadBus {
    closed: AtomicBool,
}

#[async_trait]
impl Bus for DeadBus {
    fn publish(&self, _envelope: Envelope) -> Result<(), BusError> {
        Err(BusError::Transport("broker unreachable".into()))
    }

    async fn subscribe(&self, _topics: &[Topic]) -> Result<Subscription, BusError> {
        Err(BusError::Closed)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

fn start(
    bus: Arc<dyn Bus>,
    face: &Recording,
) -> (
    display::MediatorHandle,
    oneshot::Sender<()>,
    tokio::task::JoinHandle<display::DisplayState>,
) {
    let mediator = Mediator::new(DisplayConfig::default(), bus, Arc::new(face.clone()));
    let handle = mediator.handle();
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(mediator.run(async {
        let _ = stopped.await;
    }));
    (handle, stop, task)
}

#[tokio::test(start_paused = true)]
async fn touch_reverts_after_two_seconds() {
    let face = Recording::default();
    let (handle, stop, task) = start(Arc::new(LocalBus::default()), &face);

    assert!(handle.touch().await);
    sleep(Duration::from_millis(1900)).await;
    assert_eq!(
        face.layers().last().unwrap(),
        &PathBuf::from("assets/plant_touched.jpeg")
    );
    assert_eq!(face.crossfades(), 1);

    sleep(Duration::from_millis(200)).await;
    stop.send(()).unwrap();
    let state = task.await.unwrap();
    assert_eq!(state.variant(), MoodLabel::Neutral);
    assert_eq!(face.layers().len(), 2);
    assert!(state.touch().is_none());
}

#[tokio::test(start_paused = true)]
async fn bus_updates_reach_the_screen() {
    let bus: Arc<dyn Bus> = Arc::new(LocalBus::default());
    let face = Recording::default();
    let (handle, stop, task) = start(bus.clone(), &face);
    sleep(Duration::from_millis(1)).await;

    handle.open(Modal::Chat).await;
    handle.close(Modal::Chat).await;
    bus.publish(Envelope {
        topic: Topic::MoodUpdate,
        payload: json!({"mood": 5}),
    })
    .unwrap();
    bus.publish(Envelope {
        topic: Topic::MoodUpdate,
        payload: json!({"mood": "thirsty", "speech": "Water!", "soil": 12}),
    })
    .unwrap();
    bus.publish(Envelope {
        topic: Topic::SensorRaw,
        payload: json!({"temperature": 19.5}),
    })
    .unwrap();
    sleep(Duration::from_secs(1)).await;

    stop.send(()).unwrap();
    let state = task.await.unwrap();
    assert_eq!(state.variant(), MoodLabel::Thirsty);
    assert_eq!(state.readings().moisture, Some(12.0));
    assert_eq!(state.readings().temperature, Some(19.5));
    assert_eq!(face.crossfades(), 1);
}

#[tokio::test(start_paused = true)]
async fn user_input_goes_out_on_the_bus() {
    let bus: Arc<dyn Bus> = Arc::new(LocalBus::default());
    let mut out = bus
        .subscribe(&[Topic::ChatRequest, Topic::SensorRequest])
        .await
        .unwrap();
    let face = Recording::default();
    let (handle, stop, task) = start(bus.clone(), &face);

    handle.open(Modal::Chat).await;
    handle.chat("hi").await;
    handle.open(Modal::LiveData).await;
    handle.open(Modal::LiveData).await;

    let chat = out.recv().await.unwrap();
    assert_eq!(chat.topic, Topic::ChatRequest);
    assert_eq!(
        chat.decode::<ChatRequest>().unwrap(),
        ChatRequest { text: "hi".into() }
    );
    let read = out.recv().await.unwrap();
    assert_eq!(read.topic, Topic::SensorRequest);
    assert_eq!(read.payload, json!({"token": "update_now"}));

    bus.publish(Envelope {
        topic: Topic::ChatUpdate,
        payload: json!({"speech": "Hello there!"}),
    })
    .unwrap();
    sleep(Duration::from_millis(10)).await;
    stop.send(()).unwrap();
    let state = task.await.unwrap();
    assert_eq!(state.transcript(), ["You: hi", "PlantAI: Hello there!"]);
    assert!(tokio::time::timeout(Duration::from_millis(10), out.recv())
        .await
        .is_err());
}

#[tokio::test(start_paused = true)]
async fn dead_bus_degrades_and_shutdown_cleans_up() {
    let bus = Arc::new(DeadBus::default());
    let face = Recording::default();
    let (handle, stop, task) = start(bus.clone(), &face);

    handle.chat("anyone there?").await;
    handle.touch().await;
    sleep(Duration::from_millis(10)).await;
    stop.send(()).unwrap();
    let state = task.await.unwrap();

    assert_eq!(
        state.transcript(),
        ["You: anyone there?", "Error: Could not send message."]
    );
    assert_eq!(state.variant(), MoodLabel::Touched);
    assert!(bus.closed.load(Ordering::SeqCst));

    sleep(Duration::from_secs(5)).await;
    assert_eq!(face.layers().len(), 1);
}
