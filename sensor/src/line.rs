//! Newline-framed readings from a microcontroller.
//!
//! Two line formats are understood:
//!
//! * key/value, e.g. `temp:24.1,humidity:55,soil_perc:40,lux:800`, where
//!   light arrives in lux and is converted to percent of `full_scale_lux`;
//! * a JSON object such as `{"soil":55,"light":60,"temp":23}` whose soil and
//!   light values are already percentages.

use async_trait::async_trait;
use net::Reading;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{ReadingSource, SensorError};

/// Lux mapped to 100 % light. 500 lux, the classic "too dark" mark, lands on 20 %.
pub const DEFAULT_FULL_SCALE_LUX: f64 = 2500.0;

const REQUIRED_KEYS: [&str; 4] = ["temp:", "humidity:", "soil_perc:", "lux:"];

/// Parse one device line into a canonical [`Reading`].
///
/// Returns `None` for blank lines and for anything that is neither format.
/// A key/value field whose value fails to parse becomes unknown instead of
/// discarding the line.
pub fn parse_line(line: &str, full_scale_lux: f64) -> Option<Reading> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('{') {
        return match serde_json::from_str::<Reading>(line) {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!(line, error = %e, "ignoring unparsable JSON line");
                None
            }
        };
    }
    if !REQUIRED_KEYS.iter().all(|k| line.contains(k)) {
        debug!(line, "ignoring device junk");
        return None;
    }

    let mut reading = Reading::default();
    for part in line.split(',') {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let parsed = match value.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                warn!(key = key.trim(), value, "could not parse value");
                None
            }
        };
        match key.trim() {
            "temp" => reading.temperature = parsed,
            "humidity" => reading.humidity = parsed,
            "soil_perc" => reading.moisture = parsed,
            "lux" => reading.light = parsed.map(|lux| lux_to_percent(lux, full_scale_lux)),
            _ => {}
        }
    }
    Some(reading)
}

fn lux_to_percent(lux: f64, full_scale_lux: f64) -> f64 {
    if full_scale_lux <= 0.0 {
        return 0.0;
    }
    (lux / full_scale_lux * 100.0).clamp(0.0, 100.0)
}

/// Newest parsed sample and its sequence number.
type Latest = Option<(u64, Reading)>;

/// Reads device lines from any async reader, e.g. a serial device node.
///
/// A background task drains the reader and keeps only the newest valid
/// reading, so a slow sampling cadence never works through a backlog and a
/// read timeout never splits a line.
pub struct LineSource {
    reader: Option<Box<dyn AsyncBufRead + Unpin + Send>>,
    feed: Option<watch::Sender<Latest>>,
    latest: watch::Receiver<Latest>,
    seen: u64,
    pump: Option<JoinHandle<()>>,
    writer: Option<Box<dyn AsyncWrite + Unpin + Send>>,
    read_timeout: Duration,
    full_scale_lux: f64,
}

impl LineSource {
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);
    /// Written to the device to request an immediate sample.
    pub const TRIGGER: &'static [u8] = b"r\n";

    pub fn new(reader: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        let (feed, latest) = watch::channel(None);
        Self {
            reader: Some(Box::new(reader)),
            feed: Some(feed),
            latest,
            seen: 0,
            pump: None,
            writer: None,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            full_scale_lux: DEFAULT_FULL_SCALE_LUX,
        }
    }

    /// Open a device node (or any file) for reading and triggering.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SensorError> {
        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .await?;
        let (read, write) = tokio::io::split(file);
        Ok(Self::new(BufReader::new(read)).with_writer(write))
    }

    pub fn with_writer(mut self, writer: impl AsyncWrite + Unpin + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_full_scale_lux(mut self, lux: f64) -> Self {
        self.full_scale_lux = lux;
        self
    }

    /// Spawn the line pump on first use.
    fn start(&mut self) {
        if let (Some(reader), Some(feed)) = (self.reader.take(), self.feed.take()) {
            self.pump = Some(tokio::spawn(pump(reader, feed, self.full_scale_lux)));
        }
    }

    /// The newest reading not yet handed out, if any.
    fn take_fresh(&mut self) -> Option<Reading> {
        let latest = self.latest.borrow_and_update();
        match &*latest {
            Some((seq, reading)) if *seq > self.seen => {
                self.seen = *seq;
                Some(reading.clone())
            }
            _ => None,
        }
    }

    /// Mark everything received so far as stale.
    fn discard_pending(&mut self) {
        if let Some((seq, _)) = &*self.latest.borrow_and_update() {
            self.seen = *seq;
        }
    }
}

impl Drop for LineSource {
    fn drop(&mut self) {
        if let Some(pump) = &self.pump {
            pump.abort();
        }
    }
}

async fn pump(
    mut reader: Box<dyn AsyncBufRead + Unpin + Send>,
    feed: watch::Sender<Latest>,
    full_scale_lux: f64,
) {
    let mut line = String::new();
    let mut seq = 0u64;
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("device stream ended");
                return;
            }
            Ok(_) => {
                if let Some(reading) = parse_line(&line, full_scale_lux) {
                    seq += 1;
                    feed.send_replace(Some((seq, reading)));
                }
            }
            Err(e) => {
                warn!(error = %e, "device read failed");
                return;
            }
        }
        if feed.is_closed() {
            return;
        }
    }
}

#[async_trait]
impl ReadingSource for LineSource {
    async fn read(&mut self) -> Result<Option<Reading>, SensorError> {
        self.start();
        if let Some(reading) = self.take_fresh() {
            return Ok(Some(reading));
        }
        match tokio::time::timeout(self.read_timeout, self.latest.changed()).await {
            // Nothing arrived in time; not an error.
            Err(_) => Ok(None),
            Ok(Ok(())) => Ok(self.take_fresh()),
            Ok(Err(_)) => Err(SensorError::Disconnected),
        }
    }

    /// Drop whatever is queued, then ask the device for a new sample. The
    /// following `read` waits for a line that arrives after this call.
    async fn trigger(&mut self) -> Result<(), SensorError> {
        self.start();
        self.discard_pending();
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(Self::TRIGGER).await?;
            writer.flush().await?;
            debug!("sent read trigger to device");
        }
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "line device"
    }
}
