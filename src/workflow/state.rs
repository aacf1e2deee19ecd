use std::fmt;

use serde::{Deserialize, Serialize};

use super::audit::AuditEntry;
use super::source::ContentSource;

/// The six phases of a workflow run.
///
/// Every run walks: START → RESOLVING → GENERATING_TEXT → GENERATING_IMAGES
/// → FINALIZING → DONE. No transition skips a phase, even under failure:
/// failure is carried in [`WorkflowState::error`], not as a separate terminal
/// phase, and `Done` is the only terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Resolving,
    GeneratingText,
    GeneratingImages,
    Finalizing,
    Done,
}

impl Phase {
    /// The phase that follows this one. `Done` is terminal and stays put.
    pub fn next(self) -> Phase {
        match self {
            Phase::Start => Phase::Resolving,
            Phase::Resolving => Phase::GeneratingText,
            Phase::GeneratingText => Phase::GeneratingImages,
            Phase::GeneratingImages => Phase::Finalizing,
            Phase::Finalizing => Phase::Done,
            Phase::Done => Phase::Done,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Start => write!(f, "START"),
            Phase::Resolving => write!(f, "RESOLVING"),
            Phase::GeneratingText => write!(f, "GENERATING_TEXT"),
            Phase::GeneratingImages => write!(f, "GENERATING_IMAGES"),
            Phase::Finalizing => write!(f, "FINALIZING"),
            Phase::Done => write!(f, "DONE"),
        }
    }
}

/// Posts and metadata produced by the text-generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPosts {
    pub linkedin_post: String,
    pub twitter_post: String,
    pub key_insights: Vec<String>,
    pub article_title: String,
    pub article_author: Option<String>,
    pub article_date: Option<String>,
}

/// Status-tagged result of the text-generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostsOutcome {
    Ready(GeneratedPosts),
    Failed(String),
}

/// Base64 image payloads produced by the image-generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImages {
    pub infographic: Option<String>,
    pub social: Option<String>,
}

/// Status-tagged result of the image-generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImagesOutcome {
    Ready(GeneratedImages),
    Failed(String),
}

/// The single mutable record threaded through the pipeline.
///
/// Created fresh per request, never shared across requests, and dropped once
/// the final output has been extracted.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub source: ContentSource,
    pub posts: Option<PostsOutcome>,
    pub images: Option<ImagesOutcome>,
    /// First stage-level error. Once set, later stages skip their real work.
    pub error: Option<String>,
    /// Append-only, insertion order = execution order.
    pub audit_trail: Vec<AuditEntry>,
    pub phase: Phase,
}

impl WorkflowState {
    pub fn new(source: ContentSource) -> Self {
        Self {
            source,
            posts: None,
            images: None,
            error: None,
            audit_trail: Vec::new(),
            phase: Phase::Start,
        }
    }

    /// Move to the next phase.
    pub fn advance(&mut self) {
        self.phase = self.phase.next();
    }

    /// Record a stage error. The first error wins; later ones are ignored so
    /// the run-level failure always names the stage that actually broke.
    pub fn record_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(message.into());
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn push_audit(&mut self, entry: AuditEntry) {
        self.audit_trail.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_state() -> WorkflowState {
        WorkflowState::new(ContentSource::RawText("An article".into()))
    }

    #[test]
    fn phases_walk_in_order_and_done_is_terminal() {
        let mut state = fresh_state();
        assert_eq!(state.phase, Phase::Start);

        let expected = [
            Phase::Resolving,
            Phase::GeneratingText,
            Phase::GeneratingImages,
            Phase::Finalizing,
            Phase::Done,
        ];
        for phase in expected {
            state.advance();
            assert_eq!(state.phase, phase);
        }

        state.advance();
        assert_eq!(state.phase, Phase::Done);
    }

    #[test]
    fn first_error_wins() {
        let mut state = fresh_state();
        assert!(!state.is_failed());

        state.record_error("text generation blew up");
        state.record_error("image generation also blew up");

        assert_eq!(state.error.as_deref(), Some("text generation blew up"));
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::Start.to_string(), "START");
        assert_eq!(Phase::GeneratingText.to_string(), "GENERATING_TEXT");
        assert_eq!(Phase::GeneratingImages.to_string(), "GENERATING_IMAGES");
        assert_eq!(Phase::Done.to_string(), "DONE");
    }

    #[test]
    fn new_state_is_empty() {
        let state = fresh_state();
        assert!(state.posts.is_none());
        assert!(state.images.is_none());
        assert!(state.error.is_none());
        assert!(state.audit_trail.is_empty());
    }
}
