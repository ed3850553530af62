use net::{Bus, Topic};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{reduce, Command, Countenance, DisplayConfig, DisplayState, Event, Modal, Outbound};

/// Events waiting for the mediator. Senders wait when it is full.
pub const QUEUE_CAPACITY: usize = 64;

/// Topics whose payloads end up on screen.
pub const INBOUND: [Topic; 3] = [Topic::SensorRaw, Topic::MoodUpdate, Topic::ChatUpdate];

/// Cheap handle for feeding user input into a running [`Mediator`].
#[derive(Clone)]
pub struct MediatorHandle {
    tx: mpsc::Sender<Event>,
}

impl MediatorHandle {
    /// Queue `event`. Returns `false` once the mediator is gone.
    pub async fn send(&self, event: Event) -> bool {
        self.tx.send(event).await.is_ok()
    }

    pub async fn touch(&self) -> bool {
        self.send(Event::Touch).await
    }

    pub async fn open(&self, modal: Modal) -> bool {
        self.send(Event::OpenModal(modal)).await
    }

    pub async fn close(&self, modal: Modal) -> bool {
        self.send(Event::CloseModal(modal)).await
    }

    pub async fn chat(&self, text: impl Into<String>) -> bool {
        self.send(Event::UserChatSend { text: text.into() }).await
    }
}

/// Carries commands out: renderer, timers and bus.
struct Executor {
    state: DisplayState,
    countenance: Arc<dyn Countenance>,
    bus: Arc<dyn Bus>,
    tx: mpsc::Sender<Event>,
    touch_timer: Option<JoinHandle<()>>,
    fade_timers: Vec<JoinHandle<()>>,
}

impl Executor {
    fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            debug!(?event, "event");
            for command in reduce(&mut self.state, event) {
                if let Some(follow_up) = self.execute(command) {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    fn execute(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::ScheduleFade { after, token } => {
                self.fade_timer(after, Event::StartFade { token });
            }
            Command::Crossfade {
                duration, token, ..
            } => {
                self.countenance.apply(&command);
                self.fade_timer(duration, Event::FadeComplete { token });
            }
            Command::ArmTouchTimer { after, token } => {
                self.cancel_touch_timer();
                self.touch_timer = Some(self.timer(after, Event::TouchTimeout { token }));
            }
            Command::CancelTouchTimer => self.cancel_touch_timer(),
            Command::Publish(outbound) => return self.publish(outbound),
            other => self.countenance.apply(&other),
        }
        None
    }

    fn publish(&self, outbound: Outbound) -> Option<Event> {
        let topic = outbound.topic();
        match outbound.envelope().and_then(|env| self.bus.publish(env)) {
            Ok(()) => {
                debug!(%topic, "published");
                None
            }
            Err(e) => {
                warn!(%topic, error = %e, "publish failed");
                matches!(outbound, Outbound::Chat(_)).then_some(Event::ChatSendFailed)
            }
        }
    }

    fn timer(&self, after: Duration, event: Event) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(event).await;
        })
    }

    fn fade_timer(&mut self, after: Duration, event: Event) {
        self.fade_timers.retain(|t| !t.is_finished());
        let timer = self.timer(after, event);
        self.fade_timers.push(timer);
    }

    fn cancel_touch_timer(&mut self) {
        if let Some(timer) = self.touch_timer.take() {
            timer.abort();
        }
    }

    fn cancel_timers(&mut self) {
        self.cancel_touch_timer();
        for timer in self.fade_timers.drain(..) {
            timer.abort();
        }
    }
}

/// Owns the display state and is its only writer.
///
/// Bus deliveries, user input and timer callbacks all pass through one
/// bounded queue, so events are reduced strictly one at a time.
pub struct Mediator {
    executor: Executor,
    rx: mpsc::Receiver<Event>,
}

impl Mediator {
    pub fn new(config: DisplayConfig, bus: Arc<dyn Bus>, countenance: Arc<dyn Countenance>) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        Self {
            executor: Executor {
                state: DisplayState::new(config),
                countenance,
                bus,
                tx,
                touch_timer: None,
                fade_timers: Vec::new(),
            },
            rx,
        }
    }

    pub fn handle(&self) -> MediatorHandle {
        MediatorHandle {
            tx: self.executor.tx.clone(),
        }
    }

    /// Process events until `shutdown` resolves, then cancel every timer,
    /// close the bus and hand back the final state.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> DisplayState {
        let Mediator {
            mut executor,
            mut rx,
        } = self;
        let forwarder = forward_bus(executor.bus.clone(), executor.tx.clone()).await;
        info!("display mediator running");
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                event = rx.recv() => match event {
                    Some(event) => executor.dispatch(event),
                    None => break,
                },
            }
        }
        if let Some(forwarder) = forwarder {
            forwarder.abort();
        }
        executor.cancel_timers();
        executor.bus.close().await;
        info!("display mediator stopped");
        executor.state
    }
}

/// Feed every inbound envelope into the mediator queue on its own task.
async fn forward_bus(bus: Arc<dyn Bus>, tx: mpsc::Sender<Event>) -> Option<JoinHandle<()>> {
    let mut sub = match bus.subscribe(&INBOUND).await {
        Ok(sub) => sub,
        Err(e) => {
            warn!(error = %e, "display cannot subscribe, running on local input only");
            return None;
        }
    };
    Some(tokio::spawn(async move {
        while let Some(env) = sub.recv().await {
            let events = match Event::from_envelope(&env) {
                Ok(events) => events,
                Err(e) => {
                    warn!(error = %e, "dropping malformed update");
                    continue;
                }
            };
            for event in events {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        }
        debug!("display subscription ended");
    }))
}
