use net::{ChatRequest, Envelope, SensorRequest, Topic};
use std::path::PathBuf;
use std::time::Duration;

use crate::{Layer, Modal, ReadingLabels};

/// Something a reducer step asks the outside world to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load `asset` into the hidden `layer`.
    PrepareLayer { layer: Layer, asset: PathBuf },
    /// Deliver [`Event::StartFade`](crate::Event::StartFade) after `after`.
    ScheduleFade { after: Duration, token: u64 },
    /// Fade `fade_out` to transparent while `fade_in` becomes opaque, then
    /// deliver [`Event::FadeComplete`](crate::Event::FadeComplete).
    Crossfade {
        fade_out: Layer,
        fade_in: Layer,
        duration: Duration,
        token: u64,
    },
    /// Deliver [`Event::TouchTimeout`](crate::Event::TouchTimeout) after `after`.
    ArmTouchTimer { after: Duration, token: u64 },
    CancelTouchTimer,
    AppendTranscript(String),
    ShowModal(Modal),
    HideModal(Modal),
    ShowReadings(ReadingLabels),
    Publish(Outbound),
}

/// Requests the display sends out over the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Chat(ChatRequest),
    SensorRead(SensorRequest),
}

impl Outbound {
    pub fn topic(&self) -> Topic {
        match self {
            Outbound::Chat(_) => Topic::ChatRequest,
            Outbound::SensorRead(_) => Topic::SensorRequest,
        }
    }

    pub fn envelope(&self) -> Result<Envelope, net::BusError> {
        match self {
            Outbound::Chat(req) => Envelope::new(self.topic(), req),
            Outbound::SensorRead(req) => Envelope::new(self.topic(), req),
        }
    }
}
