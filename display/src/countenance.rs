use tracing::info;

use crate::{Command, Modal, INFO_TEXT};

/// The visible surface of the display.
///
/// Implementations draw layers, fades, modals and transcript lines. They
/// receive commands only and never reach back into the state.
pub trait Countenance: Send + Sync {
    fn apply(&self, command: &Command);
}

/// [`Countenance`] implementation that does nothing.
#[derive(Clone, Default)]
pub struct NoopCountenance;

impl Countenance for NoopCountenance {
    fn apply(&self, _command: &Command) {}
}

/// Renders by logging what a screen would show.
#[derive(Clone, Default)]
pub struct LogCountenance;

impl Countenance for LogCountenance {
    fn apply(&self, command: &Command) {
        match command {
            Command::PrepareLayer { layer, asset } => {
                info!(?layer, asset = %asset.display(), "prepare layer")
            }
            Command::Crossfade {
                fade_out,
                fade_in,
                duration,
                ..
            } => info!(?fade_out, ?fade_in, ?duration, "crossfade"),
            Command::AppendTranscript(line) => info!("{line}"),
            Command::ShowModal(Modal::Info) => info!("{INFO_TEXT}"),
            Command::ShowModal(modal) => info!(%modal, "modal shown"),
            Command::HideModal(modal) => info!(%modal, "modal hidden"),
            Command::ShowReadings(labels) => info!(
                "{} | {} | {} | {}",
                labels.temperature, labels.humidity, labels.light, labels.moisture
            ),
            Command::ScheduleFade { .. }
            | Command::ArmTouchTimer { .. }
            | Command::CancelTouchTimer
            | Command::Publish(_) => {}
        }
    }
}
