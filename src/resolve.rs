use crate::api::{VideoSearch, WebSearch};
use crate::logw;
use crate::query::{ReferenceMatch, VideoMatch};
use std::sync::Arc;

const TRAILER_SUFFIX: &str = "trailer";
const REFERENCE_SUFFIX: &str = "wikipedia";

/// Finds a trailer for a movie search. Provider failures count as "not found".
#[derive(Clone)]
pub struct VideoResolver {
    search: Arc<dyn VideoSearch>,
}

impl VideoResolver {
    pub fn new(search: Arc<dyn VideoSearch>) -> Self {
        Self { search }
    }

    pub async fn resolve(&self, query: &str) -> Option<VideoMatch> {
        let biased = format!("{} {}", query, TRAILER_SUFFIX);
        match self.search.first_video(&biased).await {
            Ok(found) => found,
            Err(err) => {
                logw(format!("Video search failed for '{}': {}", biased, err));
                None
            }
        }
    }
}

/// Finds the encyclopedia page for a movie search. Always best-effort.
#[derive(Clone)]
pub struct ReferenceResolver {
    search: Arc<dyn WebSearch>,
}

impl ReferenceResolver {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self { search }
    }

    pub async fn resolve(&self, query: &str) -> Option<ReferenceMatch> {
        // adding "wikipedia" should put the main article in the top result
        let biased = format!("{} {}", query, REFERENCE_SUFFIX);
        match self.search.first_result(&biased).await {
            Ok(found) => found,
            Err(err) => {
                logw(format!("Reference search failed for '{}': {}", biased, err));
                None
            }
        }
    }
}
