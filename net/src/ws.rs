//! WebSocket client for the `broker` topic relay.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

use crate::{Bus, BusError, Envelope, Frame, Subscription, Topic};

/// [`Bus`] implementation that relays through a remote broker.
///
/// The connection is owned by a background supervisor which reconnects after
/// `retry` whenever the broker is unreachable, re-sending every subscription.
/// Messages published while disconnected are dropped, never replayed.
/// Closing ends every open subscription.
pub struct WsBus {
    outbound: mpsc::Sender<Frame>,
    /// Taken on close so receivers see the channel end.
    inbound: Mutex<Option<broadcast::Sender<Envelope>>>,
    topics: Arc<Mutex<HashSet<Topic>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WsBus {
    pub const OUTBOUND_CAPACITY: usize = 64;
    pub const INBOUND_CAPACITY: usize = 64;
    pub const DEFAULT_RETRY: Duration = Duration::from_secs(2);

    /// Start talking to the broker at `url`. Returns immediately.
    pub fn connect(url: Url) -> Self {
        Self::with_retry(url, Self::DEFAULT_RETRY)
    }

    pub fn with_retry(url: Url, retry: Duration) -> Self {
        let (outbound, outbound_rx) = mpsc::channel(Self::OUTBOUND_CAPACITY);
        let (inbound, _) = broadcast::channel(Self::INBOUND_CAPACITY);
        let topics = Arc::new(Mutex::new(HashSet::new()));
        let task = tokio::spawn(supervise(
            url,
            outbound_rx,
            inbound.clone(),
            topics.clone(),
            retry,
        ));
        Self {
            outbound,
            inbound: Mutex::new(Some(inbound)),
            topics,
            task: Mutex::new(Some(task)),
        }
    }

    fn send_frame(&self, frame: Frame) -> Result<(), BusError> {
        self.outbound.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => BusError::Backpressure,
            mpsc::error::TrySendError::Closed(_) => BusError::Closed,
        })
    }
}

#[async_trait]
impl Bus for WsBus {
    fn publish(&self, envelope: Envelope) -> Result<(), BusError> {
        self.send_frame(Frame::publish(envelope))
    }

    async fn subscribe(&self, topics: &[Topic]) -> Result<Subscription, BusError> {
        let rx = self
            .inbound
            .lock()
            .map_err(|_| BusError::Transport("inbound channel poisoned".into()))?
            .as_ref()
            .ok_or(BusError::Closed)?
            .subscribe();
        for &topic in topics {
            let fresh = self
                .topics
                .lock()
                .map_err(|_| BusError::Transport("subscription set poisoned".into()))?
                .insert(topic);
            if fresh {
                // Re-sent on every reconnect, so a dropped frame here heals itself.
                if let Err(e) = self.send_frame(Frame::Subscribe { topic }) {
                    warn!(%topic, error = %e, "subscribe deferred until reconnect");
                }
            }
        }
        Ok(Subscription::new(topics, rx))
    }

    async fn close(&self) {
        let handle = self.task.lock().ok().and_then(|mut t| t.take());
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
            info!("broker connection closed");
        }
        // The supervisor's clone went with the task; this was the last sender.
        if let Ok(mut inbound) = self.inbound.lock() {
            inbound.take();
        }
    }
}

async fn supervise(
    url: Url,
    mut outbound: mpsc::Receiver<Frame>,
    inbound: broadcast::Sender<Envelope>,
    topics: Arc<Mutex<HashSet<Topic>>>,
    retry: Duration,
) {
    loop {
        match connect_async(url.as_str()).await {
            Ok((ws, _)) => {
                info!(%url, "connected to broker");
                let (mut sink, mut stream) = ws.split();
                let subscribed: Vec<Topic> = topics
                    .lock()
                    .map(|t| t.iter().copied().collect())
                    .unwrap_or_default();
                let mut alive = true;
                for topic in subscribed {
                    let frame = Frame::Subscribe { topic }.to_text();
                    if sink.send(Message::Text(frame)).await.is_err() {
                        alive = false;
                        break;
                    }
                }
                while alive {
                    tokio::select! {
                        frame = outbound.recv() => match frame {
                            Some(frame) => {
                                if let Err(e) = sink.send(Message::Text(frame.to_text())).await {
                                    warn!(error = %e, "broker send failed");
                                    alive = false;
                                }
                            }
                            None => {
                                let _ = sink.close().await;
                                return;
                            }
                        },
                        msg = stream.next() => match msg {
                            Some(Ok(Message::Text(text))) => dispatch(&inbound, &text),
                            Some(Ok(Message::Close(_))) | None => {
                                warn!("broker closed the connection");
                                alive = false;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                warn!(error = %e, "broker receive failed");
                                alive = false;
                            }
                        },
                    }
                }
            }
            Err(e) => warn!(%url, error = %e, "broker unreachable"),
        }

        let wait = tokio::time::sleep(retry);
        tokio::pin!(wait);
        loop {
            tokio::select! {
                _ = &mut wait => break,
                frame = outbound.recv() => match frame {
                    Some(frame) => debug!(?frame, "dropping frame while disconnected"),
                    None => return,
                },
            }
        }
    }
}

fn dispatch(inbound: &broadcast::Sender<Envelope>, text: &str) {
    match Frame::parse(text) {
        Ok(frame) => {
            if let Some(env) = frame.into_envelope() {
                let _ = inbound.send(env);
            }
        }
        Err(e) => warn!(error = %e, "dropping malformed frame from broker"),
    }
}
