use crate::error::QueryError;

/// A trimmed movie search with an optional comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    comment: Option<String>,
}

impl SearchQuery {
    /// Trims both inputs. Empty search text is rejected; an empty comment becomes `None`.
    pub fn new(text: &str, comment: Option<&str>) -> Result<Self, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::EmptySearch);
        }

        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(Self {
            text: text.to_string(),
            comment,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Opaque video id from the video-search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMatch(pub String);

impl VideoMatch {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// First web-search hit: markup-free title and its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch {
    pub title: String,
    pub url: String,
}

/// Post id as returned by the publishing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostId(pub String);
