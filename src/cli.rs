use anyhow::{Context, Result};
use clap::Parser;
use movielogger::api::http_client;
use movielogger::{Config, Pipeline, SearchQuery};
use tracing_subscriber::EnvFilter;

/// Post a movie trailer to Tumblr from the command line.
#[derive(Debug, Parser)]
#[command(name = "movielogger-cli", version)]
struct Args {
    /// Config file (defaults to $MOVIELOGGER_CONFIG, then config.ini)
    #[arg(long)]
    config: Option<String>,

    /// Optional comment added under the title
    #[arg(long)]
    comment: Option<String>,

    /// Movie to search for, e.g. "Back to the future 1985"
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "movielogger=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&path).await?;

    let query = SearchQuery::new(&args.query.join(" "), args.comment.as_deref())
        .context("Please enter the name of a movie!")?;

    let pipeline = Pipeline::from_config(http_client(&config)?, &config);
    let response = pipeline.run(&query).await;
    println!("{}", serde_json::to_string(&response)?);

    let code = if response.is_success() { 0 } else { 1 };
    std::process::exit(code);
}
