use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::AppConfig;
use crate::error::WorkflowError;
use crate::renderer::ImageRenderer;
use crate::venice::GenerationClient;
use crate::workflow::{
    AuditEntry, AuditStatus, ContentSource, ImagesOutcome, PostsOutcome, WorkflowState,
    image_summary, resolve_source, text_preview,
};
use crate::writer::PostWriter;

/// Overall status of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// Article metadata echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub title: String,
    pub author: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

/// Posts section of the final output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsPayload {
    pub linkedin: String,
    pub twitter: String,
    pub key_insights: Vec<String>,
}

/// Images section of the final output. Payloads are base64 blobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesPayload {
    pub infographic: Option<String>,
    pub social: Option<String>,
}

/// The envelope produced exactly once per request by finalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalOutput {
    pub status: RunStatus,
    pub error: Option<String>,
    pub article: Option<ArticleMeta>,
    pub posts: Option<PostsPayload>,
    pub images: Option<ImagesPayload>,
    pub audit_trail: Vec<AuditEntry>,
}

/// Drives one request through the full pipeline.
///
/// Stages run strictly in order: resolve → text generation → image generation
/// → finalize. Once a stage records an error, later remote-call stages skip
/// their real work but still contribute an audit entry, so every completed run
/// carries exactly five entries (workflow_start, generate_posts,
/// generate_images, finalize, workflow_complete).
pub struct WorkflowCoordinator {
    writer: PostWriter,
    renderer: ImageRenderer,
}

impl WorkflowCoordinator {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            writer: PostWriter::new(config.text_model.clone(), config.temperature),
            renderer: ImageRenderer::new(
                config.image_model.clone(),
                config.image_width,
                config.image_height,
                config.image_steps,
                config.image_cfg_scale,
            ),
        }
    }

    /// Process one request end to end.
    ///
    /// Returns `Err` only for input validation failures, before any stage
    /// runs. Stage-level failures come back as `Ok` with an error-status
    /// [`FinalOutput`] and a complete audit trail.
    pub async fn process(
        &self,
        client: &impl GenerationClient,
        url: Option<&str>,
        article_text: Option<&str>,
        use_extraction: bool,
    ) -> Result<FinalOutput, WorkflowError> {
        let source = resolve_source(url, article_text, use_extraction)?;
        tracing::info!(source = source.kind(), "workflow starting");

        let mut state = WorkflowState::new(source);

        let started = Instant::now();
        state.push_audit(AuditEntry::record(
            "coordinator",
            "workflow_start",
            AuditStatus::Success,
            started,
            source_summary(&state.source),
            Value::Null,
        ));

        // Resolution already happened; walk the phase anyway so the state
        // machine never skips a transition.
        state.advance();
        debug_assert_eq!(state.phase, crate::workflow::Phase::Resolving);

        state.advance();
        self.run_text_stage(client, &mut state).await;

        state.advance();
        self.run_image_stage(client, &mut state).await;

        state.advance();
        let output = self.finalize(&mut state);

        state.advance();
        debug_assert_eq!(state.phase, crate::workflow::Phase::Done);

        Ok(output)
    }

    async fn run_text_stage(&self, client: &impl GenerationClient, state: &mut WorkflowState) {
        // Resolution cannot fail once we are here, but keep the skip shape
        // uniform with the image stage.
        if state.is_failed() {
            state.push_audit(AuditEntry::skipped("post_writer", "generate_posts"));
            return;
        }

        let started = Instant::now();
        let input = source_summary(&state.source);
        let outcome = self.writer.generate_posts(client, &state.source).await;

        let (status, output) = match &outcome {
            PostsOutcome::Ready(posts) => (
                AuditStatus::Success,
                json!({
                    "status": "success",
                    "linkedin_chars": posts.linkedin_post.chars().count(),
                    "twitter_chars": posts.twitter_post.chars().count(),
                    "insight_count": posts.key_insights.len(),
                    "article_title": posts.article_title,
                }),
            ),
            PostsOutcome::Failed(message) => {
                tracing::error!(error = %message, "text generation failed");
                state.record_error(format!("post generation failed: {message}"));
                (AuditStatus::Error, json!({ "status": "error", "message": message }))
            }
        };

        state.push_audit(AuditEntry::record(
            "post_writer",
            "generate_posts",
            status,
            started,
            input,
            output,
        ));
        state.posts = Some(outcome);
    }

    async fn run_image_stage(&self, client: &impl GenerationClient, state: &mut WorkflowState) {
        if state.is_failed() {
            state.push_audit(AuditEntry::skipped("image_renderer", "generate_images"));
            return;
        }

        // The text stage succeeded, so posts are present and ready.
        let (title, insights) = match &state.posts {
            Some(PostsOutcome::Ready(posts)) => {
                (posts.article_title.clone(), posts.key_insights.clone())
            }
            _ => ("Article".to_string(), Vec::new()),
        };

        let started = Instant::now();
        let input = json!({ "title": title, "insight_count": insights.len() });
        let outcome = self.renderer.generate_images(client, &title, &insights).await;

        let (status, output) = match &outcome {
            ImagesOutcome::Ready(images) => (
                AuditStatus::Success,
                json!({
                    "status": "success",
                    "infographic": image_summary(images.infographic.as_deref()),
                    "social": image_summary(images.social.as_deref()),
                }),
            ),
            ImagesOutcome::Failed(message) => {
                tracing::error!(error = %message, "image generation failed");
                state.record_error(format!("image generation failed: {message}"));
                (AuditStatus::Error, json!({ "status": "error", "message": message }))
            }
        };

        state.push_audit(AuditEntry::record(
            "image_renderer",
            "generate_images",
            status,
            started,
            input,
            output,
        ));
        state.images = Some(outcome);
    }

    /// Assemble the final output. Never fails: the status is derived solely
    /// from whether a stage recorded an error.
    fn finalize(&self, state: &mut WorkflowState) -> FinalOutput {
        let started = Instant::now();

        let mut output = match &state.error {
            Some(message) => FinalOutput {
                status: RunStatus::Error,
                error: Some(message.clone()),
                article: None,
                posts: None,
                images: None,
                audit_trail: Vec::new(),
            },
            None => {
                let posts = match &state.posts {
                    Some(PostsOutcome::Ready(p)) => p.clone(),
                    // Unreachable on a clean run; degrade instead of panicking.
                    _ => crate::workflow::GeneratedPosts {
                        linkedin_post: String::new(),
                        twitter_post: String::new(),
                        key_insights: Vec::new(),
                        article_title: "Untitled Article".into(),
                        article_author: None,
                        article_date: None,
                    },
                };
                let images = match &state.images {
                    Some(ImagesOutcome::Ready(i)) => i.clone(),
                    _ => crate::workflow::GeneratedImages {
                        infographic: None,
                        social: None,
                    },
                };
                FinalOutput {
                    status: RunStatus::Success,
                    error: None,
                    article: Some(ArticleMeta {
                        title: posts.article_title.clone(),
                        author: posts.article_author.clone(),
                        date: posts.article_date.clone(),
                        url: match &state.source {
                            ContentSource::Url(u) => Some(u.clone()),
                            ContentSource::RawText(_) => None,
                        },
                    }),
                    posts: Some(PostsPayload {
                        linkedin: posts.linkedin_post,
                        twitter: posts.twitter_post,
                        key_insights: posts.key_insights,
                    }),
                    images: Some(ImagesPayload {
                        infographic: images.infographic,
                        social: images.social,
                    }),
                    audit_trail: Vec::new(),
                }
            }
        };

        let finalize_status = if state.is_failed() {
            AuditStatus::Error
        } else {
            AuditStatus::Success
        };
        state.push_audit(AuditEntry::record(
            "coordinator",
            "finalize",
            finalize_status,
            started,
            json!({ "failed": state.is_failed() }),
            json!({
                "status": if state.is_failed() { "error" } else { "success" },
                "has_posts": output.posts.is_some(),
                "has_images": output.images.is_some(),
            }),
        ));

        state.push_audit(AuditEntry::record(
            "coordinator",
            "workflow_complete",
            finalize_status,
            started,
            Value::Null,
            json!({ "status": if state.is_failed() { "error" } else { "success" } }),
        ));

        tracing::info!(
            status = ?output.status,
            entries = state.audit_trail.len(),
            "workflow complete"
        );

        output.audit_trail = std::mem::take(&mut state.audit_trail);
        output
    }
}

fn source_summary(source: &ContentSource) -> Value {
    match source {
        ContentSource::Url(url) => json!({ "source": "url", "url": url }),
        ContentSource::RawText(text) => json!({
            "source": "raw_text",
            "chars": text.chars().count(),
            "preview": text_preview(text, 80),
        }),
    }
}
