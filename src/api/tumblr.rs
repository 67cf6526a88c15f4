use crate::api::Publisher;
use crate::caption::Caption;
use crate::config::{Config, PublishPolicy};
use crate::error::ProviderError;
use crate::query::{PostId, VideoMatch};
use crate::{logok, logw};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Client for the Tumblr legacy write API (`/api/write`).
pub struct TumblrPublisher {
    client: Client,
    write_url: String,
    email: String,
    password: String,
    blog: String,
    embed_url_prefix: String,
    generator: String,
    policy: PublishPolicy,
    timeout: Duration,
}

impl TumblrPublisher {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            write_url: cfg.tumblr_write_url.clone(),
            email: cfg.tumblr_email.clone(),
            password: cfg.tumblr_password.clone(),
            blog: cfg.tumblr_blog.clone(),
            embed_url_prefix: cfg.embed_url_prefix.clone(),
            generator: cfg.generator.clone(),
            policy: cfg.publish_policy,
            timeout: cfg.request_timeout(),
        }
    }

    pub fn embed_url(&self, video: &VideoMatch) -> String {
        format!("{}{}", self.embed_url_prefix, video.id())
    }
}

#[async_trait]
impl Publisher for TumblrPublisher {
    async fn publish(&self, video: &VideoMatch, caption: &Caption) -> Result<PostId, ProviderError> {
        let embed = self.embed_url(video);
        let form = [
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
            ("group", self.blog.as_str()),
            ("type", "video"),
            ("embed", embed.as_str()),
            ("caption", caption.as_str()),
            ("generator", self.generator.as_str()),
        ];

        let resp = self
            .client
            .post(&self.write_url)
            .form(&form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::PublishFailed(e.to_string()))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| ProviderError::PublishFailed(e.to_string()))?;

        let post = accept_response(self.policy, status, raw)?;
        logok(format!("Tumblr post created for {}: {}", embed, post.0));
        Ok(post)
    }
}

/// The one place that decides whether a write response counts as a post.
pub fn accept_response(
    policy: PublishPolicy,
    status: StatusCode,
    body: String,
) -> Result<PostId, ProviderError> {
    match policy {
        PublishPolicy::Lenient => {
            if !status.is_success() {
                logw(format!(
                    "Tumblr HTTP {} accepted as post id (lenient policy)",
                    status.as_u16()
                ));
            }
            Ok(PostId(body))
        }
        PublishPolicy::Strict => {
            if !status.is_success() {
                let snippet = body.chars().take(200).collect::<String>();
                return Err(ProviderError::PublishFailed(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    snippet
                )));
            }
            let id = body.trim();
            if id.is_empty() {
                return Err(ProviderError::PublishFailed("empty response body".to_string()));
            }
            Ok(PostId(id.to_string()))
        }
    }
}
