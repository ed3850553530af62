use net::{Bus, Envelope, Reading, SensorRequest, Topic};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::ReadingSource;

/// Samples a [`ReadingSource`] and publishes readings on `sensor.raw`.
pub struct SensorService {
    source: Box<dyn ReadingSource>,
    bus: Arc<dyn Bus>,
    interval: Duration,
}

impl SensorService {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);

    pub fn new(source: Box<dyn ReadingSource>, bus: Arc<dyn Bus>, interval: Duration) -> Self {
        Self {
            source,
            bus,
            interval,
        }
    }

    /// One sampling cycle. Failures are logged and the cycle is skipped.
    pub async fn produce(&mut self) -> Option<Reading> {
        let reading = match self.source.read().await {
            Ok(Some(reading)) => reading.stamped(),
            Ok(None) => {
                debug!(source = self.source.describe(), "no reading this cycle");
                return None;
            }
            Err(e) => {
                warn!(source = self.source.describe(), error = %e, "sensor unavailable, skipping cycle");
                return None;
            }
        };
        let published =
            Envelope::new(Topic::SensorRaw, &reading).and_then(|env| self.bus.publish(env));
        match published {
            Ok(()) => info!(?reading, "published reading"),
            Err(e) => warn!(error = %e, "could not publish reading"),
        }
        Some(reading)
    }

    /// Extra cycle outside the interval, answering a `sensor.request`.
    pub async fn on_demand_read(&mut self) -> Option<Reading> {
        if let Err(e) = self.source.trigger().await {
            warn!(error = %e, "could not trigger device");
        }
        self.produce().await
    }

    /// Sample forever, interleaving on-demand requests with the interval.
    pub async fn run(mut self) {
        let mut requests = match self.bus.subscribe(&[Topic::SensorRequest]).await {
            Ok(sub) => Some(sub),
            Err(e) => {
                warn!(error = %e, "on-demand reads unavailable");
                None
            }
        };
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(source = self.source.describe(), interval = ?self.interval, "sensor running");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.produce().await;
                }
                env = next_request(&mut requests) => match env {
                    Some(env) => {
                        // The token is opaque; any message on the topic is a trigger.
                        let token = env
                            .decode::<SensorRequest>()
                            .map(|r| r.token)
                            .unwrap_or_default();
                        info!(token = %token, "on-demand read requested");
                        self.on_demand_read().await;
                    }
                    None => {
                        warn!("request subscription ended");
                        requests = None;
                    }
                },
            }
        }
    }
}

async fn next_request(sub: &mut Option<net::Subscription>) -> Option<Envelope> {
    match sub {
        Some(sub) => sub.recv().await,
        None => std::future::pending().await,
    }
}
