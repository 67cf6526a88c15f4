use crate::api::VideoSearch;
use crate::config::Config;
use crate::error::ProviderError;
use crate::logi;
use crate::query::VideoMatch;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const GDATA_VIDEO_PREFIX: &str = "http://gdata.youtube.com/feeds/api/videos/";

pub struct YouTubeSearch {
    client: Client,
    search_url: String,
    timeout: Duration,
}

impl YouTubeSearch {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            search_url: cfg.youtube_search_url.clone(),
            timeout: cfg.request_timeout(),
        }
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn first_video(&self, query: &str) -> Result<Option<VideoMatch>, ProviderError> {
        let resp = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("alt", "json")])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: raw.chars().take(200).collect(),
            });
        }

        let feed: GdataResponse = serde_json::from_str(&raw)?;
        let found = feed
            .feed
            .and_then(|f| f.entry.into_iter().next())
            .and_then(|entry| video_id_from_entry(&entry.id.text))
            .map(VideoMatch);

        if let Some(video) = &found {
            logi(format!("YouTube match for '{}': {}", query, video.id()));
        }
        Ok(found)
    }
}

/// Strips the gdata feed prefix; ids in any other URL shape yield their last path segment.
fn video_id_from_entry(id: &str) -> Option<String> {
    let id = id.trim();
    let video_id = match id.strip_prefix(GDATA_VIDEO_PREFIX) {
        Some(rest) => rest,
        None => id.rsplit('/').next().unwrap_or(id),
    };
    if video_id.is_empty() {
        return None;
    }
    Some(video_id.to_string())
}

#[derive(Debug, Deserialize)]
struct GdataResponse {
    feed: Option<GdataFeed>,
}

#[derive(Debug, Deserialize)]
struct GdataFeed {
    #[serde(default)]
    entry: Vec<GdataEntry>,
}

#[derive(Debug, Deserialize)]
struct GdataEntry {
    id: GdataText,
}

#[derive(Debug, Deserialize)]
struct GdataText {
    #[serde(rename = "$t")]
    text: String,
}
