//! Content source resolution.
//!
//! A request can carry a URL, pasted article text, or both. Resolution picks
//! exactly one [`ContentSource`] before any stage runs, or rejects the request
//! with [`WorkflowError::InvalidInput`]. No network I/O happens here; when the
//! URL path is chosen the actual fetch-and-extract is performed downstream by
//! the text-generation provider.

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// The single origin of article content for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentSource {
    /// Fetch-and-extract this URL via the provider's web scraping.
    Url(String),
    /// Use the supplied text directly, no fetch.
    RawText(String),
}

impl ContentSource {
    /// Short tag for logging and audit summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentSource::Url(_) => "url",
            ContentSource::RawText(_) => "raw_text",
        }
    }
}

/// Decide which content source a request uses.
///
/// Rules:
/// - both `url` and `article_text` absent → `InvalidInput`
/// - `use_extraction` without a URL → `InvalidInput`
/// - extraction requested with a URL → `Url`
/// - otherwise article text wins when present; a bare URL falls back to the
///   extraction path since there is nothing else to process
pub fn resolve_source(
    url: Option<&str>,
    article_text: Option<&str>,
    use_extraction: bool,
) -> Result<ContentSource, WorkflowError> {
    let url = url.map(str::trim).filter(|s| !s.is_empty());
    let text = article_text.map(str::trim).filter(|s| !s.is_empty());

    if url.is_none() && text.is_none() {
        return Err(WorkflowError::InvalidInput(
            "either 'url' (with use_web_scraping=true) or 'article_text' must be provided".into(),
        ));
    }

    if use_extraction {
        return match url {
            Some(u) => Ok(ContentSource::Url(u.to_string())),
            None => Err(WorkflowError::InvalidInput(
                "'url' is required when use_web_scraping is true".into(),
            )),
        };
    }

    match (text, url) {
        (Some(t), _) => Ok(ContentSource::RawText(t.to_string())),
        (None, Some(u)) => Ok(ContentSource::Url(u.to_string())),
        (None, None) => unreachable!("both-absent case rejected above"),
    }
}
