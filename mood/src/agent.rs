use net::{Bus, Envelope, MoodLabel, MoodUpdate, Reading, Topic};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{phrases, MoodOracle, Thresholds};

/// Turns raw readings into mood updates.
pub struct MoodAgent {
    thresholds: Thresholds,
    oracle: Box<dyn MoodOracle>,
}

impl MoodAgent {
    pub fn new(thresholds: Thresholds, oracle: Box<dyn MoodOracle>) -> Self {
        Self { thresholds, oracle }
    }

    /// Infer the plant's mood from one reading. Never fails.
    ///
    /// A crossed threshold fixes the mood and the oracle only phrases it;
    /// a disagreeing oracle label is discarded. Otherwise the oracle's label
    /// must be one of the ambient moods. Oracle failures fall back to fixed
    /// phrasing: the threshold mood if one fired, else neutral.
    pub async fn infer(&self, reading: &Reading) -> MoodUpdate {
        let required = self.thresholds.evaluate(reading);
        let consulted = self.oracle.consult(reading, required).await;
        let (mood, speech) = match (required, consulted) {
            (Some(required), Ok((label, speech))) => {
                if label != required {
                    debug!(%label, %required, "oracle disagreed with threshold, keeping threshold");
                }
                (required, speech)
            }
            (None, Ok((label, speech))) if label.is_ambient() => (label, speech),
            (None, Ok((label, _))) => {
                warn!(%label, "oracle chose a mood outside the ambient set");
                (MoodLabel::Neutral, phrases::GENERIC.to_string())
            }
            (Some(required), Err(e)) => {
                warn!(error = %e, %required, "oracle failed, using fixed phrasing");
                (required, phrases::fallback(required).to_string())
            }
            (None, Err(e)) => {
                warn!(error = %e, "oracle failed, falling back to neutral");
                (MoodLabel::Neutral, phrases::GENERIC.to_string())
            }
        };
        info!(%mood, %speech, threshold = required.is_some(), "mood decided");
        MoodUpdate {
            mood,
            speech,
            reading: reading.clone(),
        }
    }

    /// Answer every reading on `sensor.raw` until the bus goes away.
    pub async fn run(self, bus: Arc<dyn Bus>) {
        let mut readings = match bus.subscribe(&[Topic::SensorRaw]).await {
            Ok(sub) => sub,
            Err(e) => {
                warn!(error = %e, "cannot subscribe to readings");
                return;
            }
        };
        info!("mood agent listening for readings");
        while let Some(env) = readings.recv().await {
            let reading: Reading = match env.decode() {
                Ok(reading) => reading,
                Err(e) => {
                    warn!(error = %e, "dropping malformed reading");
                    continue;
                }
            };
            if reading.is_empty() {
                debug!("ignoring reading without any values");
                continue;
            }
            let update = self.infer(&reading).await;
            let published =
                Envelope::new(Topic::MoodUpdate, &update).and_then(|env| bus.publish(env));
            if let Err(e) = published {
                warn!(error = %e, "could not publish mood update");
            }
        }
        info!("reading subscription ended");
    }
}
