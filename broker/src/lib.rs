//! Topic relay for plant participants.
//!
//! Every participant opens a WebSocket to `/ws`, sends `subscribe` frames for
//! the topics it wants and `publish` frames for what it produces. The broker
//! forwards each publish to every connection subscribed to that topic,
//! including the publisher itself. Delivery is at most once: a connection
//! that falls behind the relay buffer loses the overflow.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use net::{Envelope, Frame, Topic};
use std::collections::HashSet;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Shared relay channel handed to every connection.
#[derive(Clone)]
pub struct BrokerState {
    relay: broadcast::Sender<Envelope>,
}

impl BrokerState {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        let (relay, _) = broadcast::channel(capacity);
        Self { relay }
    }
}

impl Default for BrokerState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<BrokerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: BrokerState) {
    let mut relay = state.relay.subscribe();
    let mut topics: HashSet<Topic> = HashSet::new();
    info!("participant connected");
    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => match Frame::parse(&text) {
                    Ok(Frame::Subscribe { topic }) => {
                        if topics.insert(topic) {
                            debug!(%topic, "subscribed");
                        }
                    }
                    Ok(Frame::Publish { topic, payload }) => {
                        let _ = state.relay.send(Envelope { topic, payload });
                    }
                    Ok(Frame::Message { topic, .. }) => {
                        warn!(%topic, "participants may not send message frames");
                    }
                    Err(e) => warn!(error = %e, "dropping malformed frame"),
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "participant socket failed");
                    break;
                }
            },
            env = relay.recv() => match env {
                Ok(env) if topics.contains(&env.topic) => {
                    let frame = Frame::Message { topic: env.topic, payload: env.payload };
                    if socket.send(Message::Text(frame.to_text())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "participant lagged, messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    info!("participant disconnected");
}

/// Build the broker router with the provided state.
pub fn router(state: BrokerState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}

/// Serve the relay on an already bound listener until the process ends.
pub async fn serve(listener: TcpListener, state: BrokerState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "broker listening");
    }
    axum::serve(listener, router(state)).await
}
