//! Topic bus shared by every plant participant.
//!
//! Participants never talk to each other directly. They publish
//! [`Envelope`]s on a [`Topic`] and drain a [`Subscription`] for the topics
//! they care about. Two transports implement the [`Bus`] trait:
//! [`LocalBus`] for in-process wiring and tests, and [`WsBus`] which talks to
//! the `broker` relay over a WebSocket.

pub mod bus;
pub mod codec;
pub mod error;
pub mod payload;
pub mod topic;
pub mod ws;

pub use bus::{Bus, LocalBus, Subscription};
pub use codec::{Envelope, Frame};
pub use error::{BusError, DecodeError};
pub use payload::{
    ChatRequest, MoodLabel, MoodUpdate, Reading, SensorRequest, SpeechUpdate, UiUpdate,
};
pub use topic::Topic;
pub use ws::WsBus;
