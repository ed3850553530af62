use net::{Bus, ChatRequest, Envelope, SpeechUpdate, Topic};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::Chatter;

/// Said instead of a reply when the model cannot be reached.
pub const APOLOGY: &str = "I'm having trouble connecting to my AI brain.";

pub struct ChatAgent {
    chatter: Box<dyn Chatter>,
}

impl ChatAgent {
    pub fn new(chatter: Box<dyn Chatter>) -> Self {
        Self { chatter }
    }

    /// Answer one request. Blank requests get no answer at all.
    pub async fn respond(&self, text: &str) -> Option<SpeechUpdate> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring empty chat request");
            return None;
        }
        let speech = match self.chatter.reply(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "chat reply failed, apologising");
                APOLOGY.to_string()
            }
        };
        info!(request = text, %speech, "chat reply");
        Some(SpeechUpdate { speech })
    }

    /// Answer every `chat.request` on the bus with a `chat.update`.
    pub async fn run(self, bus: Arc<dyn Bus>) {
        let mut requests = match bus.subscribe(&[Topic::ChatRequest]).await {
            Ok(sub) => sub,
            Err(e) => {
                warn!(error = %e, "cannot subscribe to chat requests");
                return;
            }
        };
        info!("chat agent listening");
        while let Some(env) = requests.recv().await {
            let request: ChatRequest = match env.decode() {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = %e, "dropping malformed chat request");
                    continue;
                }
            };
            let Some(update) = self.respond(&request.text).await else {
                continue;
            };
            let published =
                Envelope::new(Topic::ChatUpdate, &update).and_then(|env| bus.publish(env));
            if let Err(e) = published {
                warn!(error = %e, "could not publish chat reply");
            }
        }
        info!("chat subscription ended");
    }
}
