//! The display mediator.
//!
//! Inbound bus messages, touches, modal toggles and timer callbacks all
//! become [`Event`]s. A single [`reduce`] function folds each event into the
//! [`DisplayState`] and returns the [`Command`]s needed to make the screen
//! and the bus match. [`Mediator`] owns the state, drains one event queue and
//! carries the commands out through a [`Countenance`] and a [`net::Bus`].

pub mod assets;
pub mod command;
pub mod config;
pub mod countenance;
pub mod event;
pub mod format;
pub mod reducer;
pub mod runtime;
pub mod state;

pub use assets::AssetMap;
pub use command::{Command, Outbound};
pub use config::DisplayConfig;
pub use countenance::{Countenance, LogCountenance, NoopCountenance};
pub use event::Event;
pub use format::{ReadingLabels, INFO_TEXT};
pub use reducer::reduce;
pub use runtime::{Mediator, MediatorHandle};
pub use state::{DisplayState, Layer, Modal, TouchOverride};
