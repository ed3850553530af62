use clap::{Args, Parser, Subcommand};
use display::{AssetMap, DisplayConfig};
use mood::Thresholds;
use net::Topic;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Parser)]
#[command(author, version, about = "Plant companion participants")]
pub struct Cli {
    /// Broker endpoint every participant connects to
    #[arg(
        long,
        global = true,
        env = "PLANT_BUS_URL",
        default_value = "ws://127.0.0.1:8000/ws"
    )]
    pub bus: Url,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Relay topics between participants
    Broker(BrokerArgs),
    /// Publish readings from a device, stdin or a simulator
    Sensor(SensorArgs),
    /// Turn readings into moods
    Mood(MoodArgs),
    /// Answer chat requests
    Chat(LlmArgs),
    /// Run the display mediator, driven from stdin
    Display(DisplayArgs),
    /// Publish one JSON payload and exit
    Publish {
        /// Topic, e.g. `sensor.request`
        topic: Topic,
        /// JSON object payload
        payload: String,
    },
}

#[derive(Args)]
pub struct BrokerArgs {
    /// Address to accept participant connections on
    #[arg(long, env = "PLANT_BROKER_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,
    /// Messages buffered per participant before the slowest starts losing them
    #[arg(long, default_value_t = broker::BrokerState::DEFAULT_CAPACITY)]
    pub capacity: usize,
}

#[derive(Args)]
pub struct SensorArgs {
    /// Serial device (or any file) producing reading lines
    #[arg(long, env = "PLANT_SENSOR_DEVICE", conflicts_with = "stdin")]
    pub device: Option<PathBuf>,
    /// Read reading lines from stdin
    #[arg(long)]
    pub stdin: bool,
    /// Seconds between scheduled readings
    #[arg(long, env = "PLANT_SENSOR_INTERVAL", default_value_t = 15)]
    pub interval: u64,
    /// Lux reported at 100 % light
    #[arg(long, env = "PLANT_FULL_SCALE_LUX", default_value_t = sensor::DEFAULT_FULL_SCALE_LUX)]
    pub full_scale_lux: f64,
    /// Seed for the simulator
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SensorArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }
}

#[derive(Args)]
pub struct LlmArgs {
    /// Use canned replies instead of a language model
    #[arg(long, env = "PLANT_OFFLINE")]
    pub offline: bool,
    /// Ollama server; falls back to `OLLAMA_URL`
    #[arg(long)]
    pub ollama_url: Option<String>,
    /// Model name; falls back to `OLLAMA_MODEL`
    #[arg(long)]
    pub model: Option<String>,
    /// Seconds to wait for a complete reply
    #[arg(long, env = "PLANT_LLM_TIMEOUT", default_value_t = 20)]
    pub timeout: u64,
}

impl LlmArgs {
    pub fn url(&self) -> String {
        self.ollama_url.clone().unwrap_or_else(llm::url_from_env)
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(llm::model_from_env)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Args)]
pub struct MoodArgs {
    #[command(flatten)]
    pub llm: LlmArgs,
    #[arg(long, env = "PLANT_LOW_SOIL", default_value_t = 30.0)]
    pub low_soil: f64,
    #[arg(long, env = "PLANT_HIGH_SOIL", default_value_t = 90.0)]
    pub high_soil: f64,
    #[arg(long, env = "PLANT_LOW_TEMP", default_value_t = 10.0)]
    pub low_temp: f64,
    #[arg(long, env = "PLANT_HIGH_TEMP", default_value_t = 35.0)]
    pub high_temp: f64,
    #[arg(long, env = "PLANT_LOW_LIGHT", default_value_t = 20.0)]
    pub low_light: f64,
    #[arg(long, env = "PLANT_HIGH_LIGHT", default_value_t = 95.0)]
    pub high_light: f64,
}

impl MoodArgs {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            low_soil: self.low_soil,
            high_soil: self.high_soil,
            low_temp: self.low_temp,
            high_temp: self.high_temp,
            low_light: self.low_light,
            high_light: self.high_light,
        }
    }
}

#[derive(Args)]
pub struct DisplayArgs {
    /// Directory holding the mood pictures
    #[arg(long, env = "PLANT_ASSET_DIR", default_value = "assets")]
    pub assets: PathBuf,
    /// Fall back to the neutral picture when one is missing on disk
    #[arg(long)]
    pub check_assets: bool,
    /// Show a mood held back by a modal once the last modal closes
    #[arg(long, env = "PLANT_REPLAY_PENDING")]
    pub replay_pending_on_close: bool,
}

impl DisplayArgs {
    pub fn config(&self) -> DisplayConfig {
        let assets = AssetMap::new(&self.assets);
        DisplayConfig {
            assets: if self.check_assets {
                assets.checked()
            } else {
                assets
            },
            replay_pending_on_close: self.replay_pending_on_close,
            ..DisplayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_libraries() {
        let cli = Cli::try_parse_from(["plant", "mood", "--offline"]).unwrap();
        let Cmd::Mood(args) = cli.cmd else {
            panic!("expected mood");
        };
        assert!(args.llm.offline);
        assert_eq!(args.thresholds(), Thresholds::default());
        assert_eq!(cli.bus.as_str(), "ws://127.0.0.1:8000/ws");
    }

    #[test]
    fn publish_takes_a_topic() {
        let cli =
            Cli::try_parse_from(["plant", "publish", "sensor.request", r#"{"token":"x"}"#]).unwrap();
        assert!(matches!(
            cli.cmd,
            Cmd::Publish {
                topic: Topic::SensorRequest,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["plant", "publish", "plant.gossip", "{}"]).is_err());
    }

    #[test]
    fn device_and_stdin_conflict() {
        assert!(Cli::try_parse_from(["plant", "sensor", "--stdin", "--device", "/dev/ttyUSB0"]).is_err());
    }
}
