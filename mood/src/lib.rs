//! Mood inference for the plant.
//!
//! A [`MoodAgent`] turns each [`Reading`](net::Reading) arriving on
//! `sensor.raw` into a [`MoodUpdate`](net::MoodUpdate) on `mood.update`.
//! Deterministic [`Thresholds`] decide safety-relevant moods; only when none
//! fires does a [`MoodOracle`] choose between happy, sad and neutral. The
//! oracle always supplies the sentence.
//!
//! ```
//! use mood::Thresholds;
//! use net::{MoodLabel, Reading};
//!
//! let dry = Reading { moisture: Some(15.0), temperature: Some(50.0), light: Some(5.0), ..Reading::default() };
//! assert_eq!(Thresholds::default().evaluate(&dry), Some(MoodLabel::Thirsty));
//! ```

pub mod agent;
pub mod phrases;
pub mod oracle;
pub mod thresholds;

pub use agent::MoodAgent;
pub use oracle::{parse_reply, CannedOracle, LlmOracle, MoodOracle, OracleError};
pub use thresholds::Thresholds;
