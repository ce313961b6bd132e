#![forbid(unsafe_code)]
use anyhow::Result;
use botmap::{config::Config, server::run_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    run_server(Config::from_env()).await
}

/*
TESTING:

BOTMAP_DATASET=data/bots.json cargo run
curl -s 'http://localhost:8000/annotations.json?policy=fail-fast'
curl -s 'http://localhost:8000/travel?lat=52.52&lon=13.405&zoom=14' > travel.html

 */
