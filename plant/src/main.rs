use clap::Parser;
use plant::{init_logging, run, Cli};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    run(Cli::parse()).await
}
