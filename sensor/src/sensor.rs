use async_trait::async_trait;
use net::Reading;

use crate::SensorError;

/// Something that can be sampled for environmental readings.
#[async_trait]
pub trait ReadingSource: Send {
    /// Take one sample. `Ok(None)` means nothing arrived this cycle.
    async fn read(&mut self) -> Result<Option<Reading>, SensorError>;

    /// Ask the device for an immediate sample ahead of its own cadence.
    async fn trigger(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    /// Short human readable name used in logs.
    fn describe(&self) -> &'static str;
}
