use anyhow::Result;
use movielogger::api::http_client;
use movielogger::{Config, Pipeline, server};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movielogger=info,tower_http=info".into()),
        )
        .init();

    let config = Config::load(Config::default_path()).await?;
    let client = http_client(&config)?;
    let pipeline = Arc::new(Pipeline::from_config(client, &config));

    server::serve(&config.bind_addr, pipeline).await
}
