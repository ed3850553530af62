use async_trait::async_trait;
use llm::{collect_reply, LLMClient, LLMError};
use net::{MoodLabel, Reading};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::phrases;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error(transparent)]
    Llm(#[from] LLMError),
    #[error("malformed oracle reply: {0:?}")]
    Malformed(String),
}

/// The opaque, non-deterministic half of mood inference.
///
/// With `required` set the mood is already decided and the oracle only
/// phrases it; without it the oracle must pick from
/// [`MoodLabel::AMBIENT`]. Callers still validate whatever comes back.
#[async_trait]
pub trait MoodOracle: Send + Sync {
    async fn consult(
        &self,
        reading: &Reading,
        required: Option<MoodLabel>,
    ) -> Result<(MoodLabel, String), OracleError>;
}

/// Oracle backed by a language model.
pub struct LlmOracle<C: LLMClient> {
    client: C,
    model: String,
    timeout: Duration,
}

impl<C: LLMClient> LlmOracle<C> {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<C: LLMClient> MoodOracle for LlmOracle<C> {
    async fn consult(
        &self,
        reading: &Reading,
        required: Option<MoodLabel>,
    ) -> Result<(MoodLabel, String), OracleError> {
        let prompt = prompt(reading, required);
        info!(%prompt, "mood prompt");
        let reply = collect_reply(&self.client, &self.model, &prompt, self.timeout).await?;
        info!(%reply, "mood response");
        parse_reply(&reply)
    }
}

fn describe(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| format!("{v:.0}{unit}"))
}

fn prompt(reading: &Reading, required: Option<MoodLabel>) -> String {
    let senses = format!(
        "soil moisture {}, light {}, temperature {}, humidity {}",
        describe(reading.moisture, "%"),
        describe(reading.light, "%"),
        describe(reading.temperature, "°C"),
        describe(reading.humidity, "%"),
    );
    match required {
        Some(mood) => format!(
            "You are a houseplant. Your sensors read: {senses}. You feel {mood}. \
             Reply with exactly one line of the form `{mood}|<one short first-person sentence about how you feel>`."
        ),
        None => format!(
            "You are a houseplant. Your sensors read: {senses}. \
             Decide whether you feel happy, sad or neutral. \
             Reply with exactly one line of the form `<mood>|<one short first-person sentence about how you feel>`."
        ),
    }
}

/// Parse a `mood|sentence` reply.
///
/// Also accepts `mood: sentence` and `mood - sentence`, with surrounding
/// quotes, backticks and blank lines.
pub fn parse_reply(reply: &str) -> Result<(MoodLabel, String), OracleError> {
    let malformed = || OracleError::Malformed(reply.to_string());
    let strip = |s: &str| {
        s.trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .trim()
            .to_string()
    };
    let line = reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(malformed)?;
    // The earliest separator ends the label; the sentence may contain others.
    let (at, sep) = ["|", ":", " - "]
        .iter()
        .filter_map(|sep| line.find(sep).map(|at| (at, sep.len())))
        .min_by_key(|&(at, _)| at)
        .ok_or_else(malformed)?;
    let (mood, sentence) = (&line[..at], &line[at + sep..]);
    let mood: MoodLabel = strip(mood).parse().map_err(|_| malformed())?;
    let sentence = strip(sentence);
    if sentence.is_empty() {
        return Err(malformed());
    }
    Ok((mood, sentence))
}

/// Oracle that never leaves the process: fixed phrasing, happy when free to choose.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedOracle;

#[async_trait]
impl MoodOracle for CannedOracle {
    async fn consult(
        &self,
        _reading: &Reading,
        required: Option<MoodLabel>,
    ) -> Result<(MoodLabel, String), OracleError> {
        let mood = required.unwrap_or(MoodLabel::Happy);
        Ok((mood, phrases::fallback(mood).to_string()))
    }
}
