//! Sensor source for the plant.
//!
//! A [`ReadingSource`] produces [`Reading`](net::Reading)s in canonical units;
//! the [`SensorService`] samples it on a fixed interval, answers on-demand
//! `sensor.request` messages and publishes every sample on `sensor.raw`.

pub mod error;
pub mod line;
pub mod sensor;
pub mod service;
pub mod simulated;

pub use error::SensorError;
pub use line::{parse_line, LineSource, DEFAULT_FULL_SCALE_LUX};
pub use sensor::ReadingSource;
pub use service::SensorService;
pub use simulated::SimulatedSource;
