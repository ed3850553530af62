use net::{ChatRequest, MoodLabel, Reading, SensorRequest};
use tracing::{debug, info, warn};

use crate::format::{self, ReadingLabels};
use crate::state::PendingFade;
use crate::{Command, DisplayState, Event, Modal, Outbound, TouchOverride};

/// Fold one event into the state and return what must happen next.
///
/// Never blocks, never fails, never touches anything but `state`.
pub fn reduce(state: &mut DisplayState, event: Event) -> Vec<Command> {
    let mut out = Vec::new();
    match event {
        Event::MoodUpdate { label, speech } => on_mood(state, label, &speech, &mut out),
        Event::SpeechUpdate { text } => append_plant_line(state, &text, &mut out),
        Event::Readings(patch) => on_readings(state, patch, &mut out),
        Event::Touch => on_touch(state, &mut out),
        Event::TouchTimeout { token } => on_touch_timeout(state, token, &mut out),
        Event::StartFade { token } => on_start_fade(state, token, &mut out),
        Event::FadeComplete { token } => on_fade_complete(state, token),
        Event::UserChatSend { text } => on_chat_send(state, &text, &mut out),
        Event::ChatSendFailed => append(state, format::SEND_FAILED.to_string(), &mut out),
        Event::OpenModal(modal) => on_open(state, modal, &mut out),
        Event::CloseModal(modal) => on_close(state, modal, &mut out),
    }
    out
}

fn append(state: &mut DisplayState, line: String, out: &mut Vec<Command>) {
    state.transcript.push(line.clone());
    out.push(Command::AppendTranscript(line));
}

fn append_plant_line(state: &mut DisplayState, text: &str, out: &mut Vec<Command>) {
    let text = text.trim();
    if text.is_empty() || !state.is_open(Modal::Chat) {
        return;
    }
    append(state, format::plant_line(text), out);
}

fn on_mood(state: &mut DisplayState, label: MoodLabel, speech: &str, out: &mut Vec<Command>) {
    append_plant_line(state, speech, out);
    state.last_known_mood = Some(label);
    if state.touch.is_some() {
        debug!(%label, "touch override active, mood only recorded");
    } else if state.any_modal_open() {
        debug!(%label, "modal open, mood held back");
        state.pending_mood = Some(label);
    } else {
        state.pending_mood = None;
        transition_to(state, label, out);
    }
}

fn on_readings(state: &mut DisplayState, patch: Reading, out: &mut Vec<Command>) {
    let known = &mut state.readings;
    let fields = [
        (&mut known.temperature, patch.temperature),
        (&mut known.humidity, patch.humidity),
        (&mut known.light, patch.light),
        (&mut known.moisture, patch.moisture),
    ];
    for (slot, value) in fields {
        if value.is_some() {
            *slot = value;
        }
    }
    if patch.taken_at.is_some() {
        known.taken_at = patch.taken_at;
    }
    if state.is_open(Modal::LiveData) {
        out.push(Command::ShowReadings(ReadingLabels::from(&state.readings)));
    }
}

/// Swap to `label` unless it is already showing.
fn transition_to(state: &mut DisplayState, label: MoodLabel, out: &mut Vec<Command>) {
    if label == state.variant {
        return;
    }
    let Some(asset) = state.config.assets.resolve(label) else {
        warn!(%label, "no asset to show, keeping current variant");
        return;
    };
    info!(from = %state.variant, to = %label, "transition");
    state.previous = Some(state.variant);
    state.variant = label;

    let incoming = state.active_layer.other();
    let token = state.next_token();
    state.set_layer_asset(incoming, asset.clone());
    state.fade = Some(PendingFade { token, incoming });
    out.push(Command::PrepareLayer {
        layer: incoming,
        asset,
    });
    out.push(Command::ScheduleFade {
        after: state.config.fade_delay,
        token,
    });
}

fn on_start_fade(state: &mut DisplayState, token: u64, out: &mut Vec<Command>) {
    match state.fade {
        Some(fade) if fade.token == token => out.push(Command::Crossfade {
            fade_out: state.active_layer,
            fade_in: fade.incoming,
            duration: state.config.fade_duration,
            token,
        }),
        _ => debug!(token, "stale fade start ignored"),
    }
}

fn on_fade_complete(state: &mut DisplayState, token: u64) {
    match state.fade {
        Some(fade) if fade.token == token => {
            state.active_layer = fade.incoming;
            state.fade = None;
        }
        _ => debug!(token, "stale fade completion ignored"),
    }
}

fn on_touch(state: &mut DisplayState, out: &mut Vec<Command>) {
    if state.any_modal_open() {
        debug!("touch ignored while a modal is open");
        return;
    }
    let revert_target = match state.touch {
        Some(active) => {
            out.push(Command::CancelTouchTimer);
            active.revert_target
        }
        None => state.variant,
    };
    let token = state.next_token();
    state.touch = Some(TouchOverride {
        revert_target,
        token,
    });
    transition_to(state, MoodLabel::Touched, out);
    out.push(Command::ArmTouchTimer {
        after: state.config.touch_revert,
        token,
    });
}

fn on_touch_timeout(state: &mut DisplayState, token: u64, out: &mut Vec<Command>) {
    match state.touch {
        Some(active) if active.token == token => {
            state.touch = None;
            transition_to(state, active.revert_target, out);
        }
        _ => debug!(token, "stale touch timeout ignored"),
    }
}

fn on_chat_send(state: &mut DisplayState, text: &str, out: &mut Vec<Command>) {
    let text = text.trim();
    if text.is_empty() {
        debug!("refusing to send empty chat text");
        return;
    }
    append(state, format::user_line(text), out);
    out.push(Command::Publish(Outbound::Chat(ChatRequest {
        text: text.to_string(),
    })));
}

fn on_open(state: &mut DisplayState, modal: Modal, out: &mut Vec<Command>) {
    if !state.modals.insert(modal) {
        return;
    }
    out.push(Command::ShowModal(modal));
    if modal == Modal::LiveData {
        out.push(Command::ShowReadings(ReadingLabels::from(&state.readings)));
        out.push(Command::Publish(Outbound::SensorRead(SensorRequest::default())));
    }
}

fn on_close(state: &mut DisplayState, modal: Modal, out: &mut Vec<Command>) {
    if !state.modals.remove(&modal) {
        return;
    }
    out.push(Command::HideModal(modal));
    if state.config.replay_pending_on_close && !state.any_modal_open() && state.touch.is_none() {
        if let Some(label) = state.pending_mood.take() {
            debug!(%label, "replaying held back mood");
            transition_to(state, label, out);
        }
    }
}
