use crate::api::{Publisher, TumblrPublisher, VideoSearch, WebSearch, YahooSearch, YouTubeSearch};
use crate::caption::build_caption;
use crate::config::Config;
use crate::query::{PostId, SearchQuery};
use crate::resolve::{ReferenceResolver, VideoResolver};
use crate::{logi, logok, logw};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

pub const MSG_POSTED: &str = "Video posted successfully!";
pub const MSG_NO_TRAILER: &str = "Couldn't find a trailer on YouTube!";
pub const MSG_PUBLISH_FAILED: &str = "Couldn't post the video to Tumblr!";

const FILM_SUFFIX: &str = "film";

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ResponseBody")]
pub enum PipelineResponse {
    Posted { post_id: PostId, message: String },
    Failed { message: String },
}

impl PipelineResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Posted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Posted { message, .. } | Self::Failed { message } => message,
        }
    }
}

/// Wire shape: `{"success": 0|1, "message": ..., "post_id": ...}`.
#[derive(Serialize)]
struct ResponseBody {
    success: u8,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_id: Option<String>,
}

impl From<PipelineResponse> for ResponseBody {
    fn from(resp: PipelineResponse) -> Self {
        match resp {
            PipelineResponse::Posted { post_id, message } => Self {
                success: 1,
                message,
                post_id: Some(post_id.0),
            },
            PipelineResponse::Failed { message } => Self {
                success: 0,
                message,
                post_id: None,
            },
        }
    }
}

/// Search -> trailer -> caption -> post.
pub struct Pipeline {
    videos: VideoResolver,
    references: ReferenceResolver,
    publisher: Arc<dyn Publisher>,
}

impl Pipeline {
    pub fn new(
        videos: Arc<dyn VideoSearch>,
        references: Arc<dyn WebSearch>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            videos: VideoResolver::new(videos),
            references: ReferenceResolver::new(references),
            publisher,
        }
    }

    /// Wires the YouTube, Yahoo and Tumblr clients from configuration.
    pub fn from_config(client: Client, cfg: &Config) -> Self {
        Self::new(
            Arc::new(YouTubeSearch::new(client.clone(), cfg)),
            Arc::new(YahooSearch::new(client.clone(), cfg)),
            Arc::new(TumblrPublisher::new(client, cfg)),
        )
    }

    pub async fn run(&self, query: &SearchQuery) -> PipelineResponse {
        logi(format!("Searching for a trailer: {}", query.text()));

        let Some(video) = self.videos.resolve(query.text()).await else {
            logw(format!("No trailer found for '{}'", query.text()));
            return PipelineResponse::failed(MSG_NO_TRAILER);
        };

        let reference = self
            .references
            .resolve(&format!("{} {}", query.text(), FILM_SUFFIX))
            .await;
        if reference.is_none() {
            logi(format!("No reference page for '{}', using plain caption", query.text()));
        }

        let caption = build_caption(query.text(), query.comment(), reference.as_ref());

        match self.publisher.publish(&video, &caption).await {
            Ok(post_id) => {
                logok(format!("Posted '{}' as {}", query.text(), post_id.0));
                PipelineResponse::Posted {
                    post_id,
                    message: MSG_POSTED.to_string(),
                }
            }
            Err(err) => {
                logw(format!("Publishing '{}' failed: {}", query.text(), err));
                PipelineResponse::failed(MSG_PUBLISH_FAILED)
            }
        }
    }
}
