//! Clients for the three external providers and the traits the pipeline drives them through.

use crate::caption::Caption;
use crate::config::Config;
use crate::error::ProviderError;
use crate::query::{PostId, ReferenceMatch, VideoMatch};
use anyhow::Context;
use async_trait::async_trait;

const USER_AGENT: &str = concat!("movielogger/", env!("CARGO_PKG_VERSION"));

pub mod tumblr;
pub mod yahoo;
pub mod youtube;

pub use tumblr::TumblrPublisher;
pub use yahoo::YahooSearch;
pub use youtube::YouTubeSearch;

/// Video search returning the first hit only.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn first_video(&self, query: &str) -> Result<Option<VideoMatch>, ProviderError>;
}

/// Web search returning the first hit only.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn first_result(&self, query: &str) -> Result<Option<ReferenceMatch>, ProviderError>;
}

/// Creates a video post on the blogging provider.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, video: &VideoMatch, caption: &Caption) -> Result<PostId, ProviderError>;
}

/// Shared client for all providers; each request also carries its own timeout.
pub fn http_client(cfg: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(cfg.request_timeout())
        .connect_timeout(cfg.connect_timeout())
        .build()
        .context("failed to build reqwest client")
}
