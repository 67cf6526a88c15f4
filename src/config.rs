use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

pub const CONFIG_PATH_ENV: &str = "MOVIELOGGER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.ini";
const ENV_PREFIX: &str = "MOVIELOGGER";

/// How the publisher decides whether a write succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishPolicy {
    /// Any response body is taken as the post id.
    #[default]
    Lenient,
    /// Only a 2xx response with a non-empty body counts.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tumblr_email: String,
    #[serde(default)]
    pub tumblr_password: String,
    #[serde(default)]
    pub tumblr_blog: String,
    #[serde(default)]
    pub yahoo_app_id: String,
    #[serde(default = "default_youtube_search_url")]
    pub youtube_search_url: String,
    #[serde(default = "default_yahoo_search_url")]
    pub yahoo_search_url: String,
    #[serde(default = "default_tumblr_write_url")]
    pub tumblr_write_url: String,
    #[serde(default = "default_embed_url_prefix")]
    pub embed_url_prefix: String,
    #[serde(default = "default_generator")]
    pub generator: String,
    #[serde(default)]
    pub publish_policy: PublishPolicy,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_youtube_search_url() -> String {
    "http://gdata.youtube.com/feeds/api/videos".to_string()
}

fn default_yahoo_search_url() -> String {
    "http://boss.yahooapis.com/ysearch/web/v1".to_string()
}

fn default_tumblr_write_url() -> String {
    "http://www.tumblr.com/api/write".to_string()
}

fn default_embed_url_prefix() -> String {
    "http://www.youtube.com/watch?v=".to_string()
}

fn default_generator() -> String {
    "Movielogger .01".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl Config {
    /// Reads an ini file; `MOVIELOGGER_*` environment variables override its keys.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        Self::from_sources(&content, Some(env_overrides(std::env::vars())))
    }

    /// Path from `MOVIELOGGER_CONFIG`, falling back to `config.ini`.
    pub fn default_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Parses ini text alone, without environment overrides.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        Self::from_sources(content, None)
    }

    fn from_sources(content: &str, env: Option<::config::Map<String, String>>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::File::from_str(content, ::config::FileFormat::Ini));
        if let Some(vars) = env {
            builder = builder.add_source(
                ::config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)),
            );
        }
        let settings = builder.build().context("Failed to parse config ini")?;
        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize config")?;

        if config.tumblr_email.is_empty() {
            anyhow::bail!("config.ini: tumblr_email missing");
        }
        if config.tumblr_password.is_empty() {
            anyhow::bail!("config.ini: tumblr_password missing");
        }
        if config.tumblr_blog.is_empty() {
            anyhow::bail!("config.ini: tumblr_blog missing");
        }
        if config.yahoo_app_id.is_empty() {
            anyhow::bail!("config.ini: yahoo_app_id missing");
        }
        if config.request_timeout_secs == 0 {
            anyhow::bail!("config.ini: request_timeout_secs must be at least 1");
        }
        if config.connect_timeout_secs == 0 {
            anyhow::bail!("config.ini: connect_timeout_secs must be at least 1");
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// `MOVIELOGGER_*` variables minus the config-path variable, which is not a config key.
fn env_overrides(vars: impl Iterator<Item = (String, String)>) -> ::config::Map<String, String> {
    vars.filter(|(key, _)| key.starts_with(ENV_PREFIX) && key != CONFIG_PATH_ENV)
        .collect()
}
