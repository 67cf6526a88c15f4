pub mod api;
pub mod caption;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod resolve;
pub mod server;

pub use crate::config::Config;
pub use pipeline::{Pipeline, PipelineResponse};
pub use query::SearchQuery;

pub(crate) fn logv(tag: &str, message: &str) {
    match tag {
        "WARN" => tracing::warn!(tag, "{}", message),
        _ => tracing::info!(tag, "{}", message),
    }
}

pub(crate) fn logi(message: impl AsRef<str>) {
    logv("INFO", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    logv("OK", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    logv("WARN", message.as_ref());
}
