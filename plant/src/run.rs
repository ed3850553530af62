use anyhow::Context;
use display::{LogCountenance, Mediator};
use futures_util::SinkExt;
use mood::{CannedOracle, LlmOracle, MoodAgent, MoodOracle};
use net::{Bus, Envelope, Frame, Topic, WsBus};
use sensor::{LineSource, ReadingSource, SensorService, SimulatedSource};
use std::future::Future;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::oneshot;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::info;
use url::Url;
use voice::{ChatAgent, Chatter, LlmChatter, OfflineChatter};

use crate::cli::{BrokerArgs, DisplayArgs, LlmArgs, MoodArgs, SensorArgs};
use crate::{read_commands, Cli, Cmd};

/// Run the participant selected on the command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let url = cli.bus;
    match cli.cmd {
        Cmd::Broker(args) => broker(args).await,
        Cmd::Sensor(args) => sensor(url, args).await,
        Cmd::Mood(args) => mood(url, args).await,
        Cmd::Chat(args) => chat(url, args).await,
        Cmd::Display(args) => display(url, args).await,
        Cmd::Publish { topic, payload } => publish(url, topic, &payload).await,
    }
}

async fn broker(args: BrokerArgs) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    let state = broker::BrokerState::new(args.capacity);
    tokio::select! {
        served = broker::serve(listener, state) => served?,
        _ = tokio::signal::ctrl_c() => info!("broker shutting down"),
    }
    Ok(())
}

/// Run `work` against a fresh broker connection until it ends or Ctrl-C.
async fn participant<F, Fut>(url: Url, name: &str, work: F) -> anyhow::Result<()>
where
    F: FnOnce(Arc<dyn Bus>) -> Fut,
    Fut: Future<Output = ()>,
{
    info!(%url, name, "starting");
    let bus: Arc<dyn Bus> = Arc::new(WsBus::connect(url));
    tokio::select! {
        _ = work(bus.clone()) => {}
        _ = tokio::signal::ctrl_c() => info!(name, "shutting down"),
    }
    bus.close().await;
    Ok(())
}

async fn sensor(url: Url, args: SensorArgs) -> anyhow::Result<()> {
    let source: Box<dyn ReadingSource> = if let Some(path) = &args.device {
        let device = LineSource::open(path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;
        Box::new(device.with_full_scale_lux(args.full_scale_lux))
    } else if args.stdin {
        let stdin = LineSource::new(BufReader::new(tokio::io::stdin()));
        Box::new(stdin.with_full_scale_lux(args.full_scale_lux))
    } else {
        Box::new(args.seed.map_or_else(SimulatedSource::new, SimulatedSource::seeded))
    };
    let interval = args.interval();
    participant(url, "sensor", move |bus| {
        SensorService::new(source, bus, interval).run()
    })
    .await
}

fn llm_client(args: &LlmArgs) -> anyhow::Result<llm::OllamaClient> {
    let url = args.url();
    llm::OllamaClient::new(&url).with_context(|| format!("ollama url {url}"))
}

async fn mood(url: Url, args: MoodArgs) -> anyhow::Result<()> {
    let oracle: Box<dyn MoodOracle> = if args.llm.offline {
        Box::new(CannedOracle)
    } else {
        Box::new(LlmOracle::new(llm_client(&args.llm)?, args.llm.model()).with_timeout(args.llm.timeout()))
    };
    let agent = MoodAgent::new(args.thresholds(), oracle);
    participant(url, "mood", move |bus| agent.run(bus)).await
}

async fn chat(url: Url, args: LlmArgs) -> anyhow::Result<()> {
    let chatter: Box<dyn Chatter> = if args.offline {
        Box::new(OfflineChatter)
    } else {
        Box::new(LlmChatter::new(llm_client(&args)?, args.model()).with_timeout(args.timeout()))
    };
    let agent = ChatAgent::new(chatter);
    participant(url, "chat", move |bus| agent.run(bus)).await
}

async fn display(url: Url, args: DisplayArgs) -> anyhow::Result<()> {
    info!(%url, "starting display");
    let bus: Arc<dyn Bus> = Arc::new(WsBus::connect(url));
    let mediator = Mediator::new(args.config(), bus, Arc::new(LogCountenance));
    let (quit_tx, quit_rx) = oneshot::channel();
    tokio::spawn(read_commands(
        BufReader::new(tokio::io::stdin()),
        mediator.handle(),
        quit_tx,
    ));
    let state = mediator
        .run(async {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = quit_rx => {}
            }
        })
        .await;
    info!(variant = %state.variant(), "display finished");
    Ok(())
}

/// Send one message straight to the broker and close the socket.
async fn publish(url: Url, topic: Topic, payload: &str) -> anyhow::Result<()> {
    let payload: serde_json::Value =
        serde_json::from_str(payload).context("payload must be JSON")?;
    let frame = Frame::publish(Envelope { topic, payload });
    let (mut ws, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("connecting to {url}"))?;
    ws.send(Message::Text(frame.to_text())).await?;
    ws.close(None).await?;
    info!(%topic, "published");
    Ok(())
}
