use crate::api::WebSearch;
use crate::config::Config;
use crate::error::ProviderError;
use crate::query::ReferenceMatch;
use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub struct YahooSearch {
    client: Client,
    search_url: String,
    app_id: String,
    timeout: Duration,
}

impl YahooSearch {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            search_url: cfg.yahoo_search_url.clone(),
            app_id: cfg.yahoo_app_id.clone(),
            timeout: cfg.request_timeout(),
        }
    }
}

#[async_trait]
impl WebSearch for YahooSearch {
    async fn first_result(&self, query: &str) -> Result<Option<ReferenceMatch>, ProviderError> {
        // BOSS takes the query as a path segment
        let url = format!(
            "{}/{}",
            self.search_url.trim_end_matches('/'),
            urlencoding::encode(query)
        );

        let resp = self
            .client
            .get(&url)
            .query(&[("appid", self.app_id.as_str()), ("format", "json")])
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

        let body: BossResponse = serde_json::from_str(&raw)?;
        let first = body
            .ysearchresponse
            .and_then(|r| r.resultset_web.into_iter().next());

        Ok(first.map(|hit| ReferenceMatch {
            title: strip_tags(&hit.title),
            url: hit.url,
        }))
    }
}

/// Removes markup such as the `<b>` highlighting BOSS puts around matched terms.
pub fn strip_tags(input: &str) -> String {
    match tag_regex() {
        Ok(re) => re.replace_all(input, "").into_owned(),
        Err(_) => input.to_string(),
    }
}

fn tag_regex() -> anyhow::Result<&'static Regex> {
    static TAG_RE: OnceCell<Regex> = OnceCell::new();
    TAG_RE.get_or_try_init(|| Regex::new(r"<[^>]*>").context("failed to compile tag regex"))
}

#[derive(Debug, Deserialize)]
struct BossResponse {
    ysearchresponse: Option<BossResultSet>,
}

#[derive(Debug, Deserialize)]
struct BossResultSet {
    #[serde(default)]
    resultset_web: Vec<BossHit>,
}

#[derive(Debug, Deserialize)]
struct BossHit {
    title: String,
    url: String,
}
