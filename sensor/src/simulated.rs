use async_trait::async_trait;
use net::Reading;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::{ReadingSource, SensorError};

/// Random readings for running the plant without hardware.
pub struct SimulatedSource {
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence, handy for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadingSource for SimulatedSource {
    async fn read(&mut self) -> Result<Option<Reading>, SensorError> {
        let reading = Reading {
            moisture: Some(f64::from(self.rng.gen_range(10..=99))),
            light: Some(f64::from(self.rng.gen_range(10..=99))),
            temperature: Some(f64::from(self.rng.gen_range(15..=35))),
            humidity: Some(f64::from(self.rng.gen_range(30..=80))),
            taken_at: None,
        };
        debug!(?reading, "simulated reading");
        Ok(Some(reading))
    }

    fn describe(&self) -> &'static str {
        "simulator"
    }
}
