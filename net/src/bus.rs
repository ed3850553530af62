use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::broadcast;
use tracing::warn;

use crate::{BusError, Envelope, Topic};

/// Topic-addressed publish/subscribe transport.
///
/// Publishing is fire-and-forget: it never waits for delivery and a message
/// nobody listens to is simply gone.
#[async_trait]
pub trait Bus: Send + Sync {
    /// Hand `envelope` to the transport.
    fn publish(&self, envelope: Envelope) -> Result<(), BusError>;

    /// Start receiving envelopes published on any of `topics`.
    async fn subscribe(&self, topics: &[Topic]) -> Result<Subscription, BusError>;

    /// Release the transport. Subscriptions that depend on a connection end
    /// once it is closed; an in-process bus lives as long as any clone of it.
    async fn close(&self) {}
}

/// Stream of envelopes for a fixed set of topics.
pub struct Subscription {
    topics: HashSet<Topic>,
    rx: broadcast::Receiver<Envelope>,
}

impl Subscription {
    pub(crate) fn new(topics: &[Topic], rx: broadcast::Receiver<Envelope>) -> Self {
        Self {
            topics: topics.iter().copied().collect(),
            rx,
        }
    }

    /// Next matching envelope, or `None` once the bus is gone.
    ///
    /// A slow subscriber that lags behind loses the overflowed messages.
    pub async fn recv(&mut self) -> Option<Envelope> {
        loop {
            match self.rx.recv().await {
                Ok(env) if self.topics.contains(&env.topic) => return Some(env),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "subscriber lagged, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// In-process bus backed by a broadcast channel.
#[derive(Clone)]
pub struct LocalBus {
    tx: broadcast::Sender<Envelope>,
}

impl LocalBus {
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Create a new bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl Bus for LocalBus {
    fn publish(&self, envelope: Envelope) -> Result<(), BusError> {
        // No receivers is not an error: delivery is at most once.
        let _ = self.tx.send(envelope);
        Ok(())
    }

    async fn subscribe(&self, topics: &[Topic]) -> Result<Subscription, BusError> {
        Ok(Subscription::new(topics, self.tx.subscribe()))
    }
}
