use net::{MoodLabel, Reading};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::DisplayConfig;

/// One of the two stacked image layers used for crossfades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    A,
    B,
}

impl Layer {
    pub fn other(self) -> Self {
        match self {
            Layer::A => Layer::B,
            Layer::B => Layer::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Layer::A => 0,
            Layer::B => 1,
        }
    }
}

/// Popups that can sit on top of the plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modal {
    Info,
    LiveData,
    Chat,
}

impl Modal {
    pub fn as_str(self) -> &'static str {
        match self {
            Modal::Info => "info",
            Modal::LiveData => "live_data",
            Modal::Chat => "chat",
        }
    }
}

impl fmt::Display for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown modal {0:?}")]
pub struct UnknownModal(pub String);

impl FromStr for Modal {
    type Err = UnknownModal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "info" => Ok(Modal::Info),
            "live_data" | "livedata" | "live" | "data" => Ok(Modal::LiveData),
            "chat" => Ok(Modal::Chat),
            _ => Err(UnknownModal(s.to_string())),
        }
    }
}

/// An active touch override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchOverride {
    /// Variant shown before the first touch of this override.
    pub revert_target: MoodLabel,
    /// Token of the one revert timer that may end it.
    pub token: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingFade {
    pub token: u64,
    pub incoming: Layer,
}

/// Everything the mediator remembers. Only [`reduce`](crate::reduce) mutates it.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub(crate) config: DisplayConfig,
    pub(crate) variant: MoodLabel,
    pub(crate) previous: Option<MoodLabel>,
    pub(crate) touch: Option<TouchOverride>,
    pub(crate) modals: BTreeSet<Modal>,
    pub(crate) readings: Reading,
    pub(crate) last_known_mood: Option<MoodLabel>,
    pub(crate) pending_mood: Option<MoodLabel>,
    pub(crate) transcript: Vec<String>,
    pub(crate) active_layer: Layer,
    pub(crate) layers: [Option<PathBuf>; 2],
    pub(crate) fade: Option<PendingFade>,
    next_token: u64,
}

impl DisplayState {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            variant: MoodLabel::Neutral,
            previous: None,
            touch: None,
            modals: BTreeSet::new(),
            readings: Reading::default(),
            last_known_mood: None,
            pending_mood: None,
            transcript: Vec::new(),
            active_layer: Layer::A,
            layers: [None, None],
            fade: None,
            next_token: 0,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// The visual variant currently shown.
    pub fn variant(&self) -> MoodLabel {
        self.variant
    }

    pub fn previous(&self) -> Option<MoodLabel> {
        self.previous
    }

    pub fn touch(&self) -> Option<TouchOverride> {
        self.touch
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.modals.contains(&modal)
    }

    pub fn any_modal_open(&self) -> bool {
        !self.modals.is_empty()
    }

    pub fn open_modals(&self) -> impl Iterator<Item = Modal> + '_ {
        self.modals.iter().copied()
    }

    pub fn readings(&self) -> &Reading {
        &self.readings
    }

    pub fn last_known_mood(&self) -> Option<MoodLabel> {
        self.last_known_mood
    }

    pub fn pending_mood(&self) -> Option<MoodLabel> {
        self.pending_mood
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn active_layer(&self) -> Layer {
        self.active_layer
    }

    pub fn layer_asset(&self, layer: Layer) -> Option<&Path> {
        self.layers[layer.index()].as_deref()
    }

    pub(crate) fn set_layer_asset(&mut self, layer: Layer, asset: PathBuf) {
        self.layers[layer.index()] = Some(asset);
    }

    /// Hand out a fresh timer token. Older tokens become stale.
    pub(crate) fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_neutral_and_unknown() {
        let state = DisplayState::default();
        assert_eq!(state.variant(), MoodLabel::Neutral);
        assert!(state.readings().is_empty());
        assert!(!state.any_modal_open());
        assert!(state.touch().is_none());
        assert_eq!(state.active_layer(), Layer::A);
    }

    #[test]
    fn modal_names_parse() {
        assert_eq!("live-data".parse::<Modal>().unwrap(), Modal::LiveData);
        assert_eq!("Chat".parse::<Modal>().unwrap(), Modal::Chat);
        assert!("settings".parse::<Modal>().is_err());
    }
}
