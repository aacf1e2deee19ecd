//! Audit trail records.
//!
//! Every stage invocation — including the `workflow_start` and
//! `workflow_complete` pseudo-stages — produces exactly one [`AuditEntry`].
//! Entries are immutable after creation, appended in execution order, and live
//! only as long as the request they belong to.
//!
//! Input/output summaries stored here must stay small and inspectable: image
//! payloads are summarized as presence + encoded length, never embedded.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Outcome of a single stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Error,
}

/// Immutable record of one stage invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    /// Which component ran ("coordinator", "post_writer", "image_renderer").
    pub agent: String,
    /// The stage name ("generate_posts", "finalize", ...).
    pub step: String,
    pub status: AuditStatus,
    pub duration_ms: f64,
    /// Summarized stage input — previews and counts, no full payloads.
    pub input: Value,
    /// Summarized stage output.
    pub output: Value,
}

impl AuditEntry {
    /// Record a completed stage invocation timed from `started`.
    pub fn record(
        agent: &str,
        step: &str,
        status: AuditStatus,
        started: Instant,
        input: Value,
        output: Value,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            agent: agent.to_string(),
            step: step.to_string(),
            status,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            input,
            output,
        }
    }

    /// Record a stage that was skipped because an earlier stage failed.
    ///
    /// Skipped stages still contribute exactly one entry so the trail keeps
    /// its uniform length.
    pub fn skipped(agent: &str, step: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            agent: agent.to_string(),
            step: step.to_string(),
            status: AuditStatus::Error,
            duration_ms: 0.0,
            input: json!({ "reason": "skipped_due_to_error" }),
            output: Value::Null,
        }
    }
}

/// A short, char-boundary-safe preview of a text for audit summaries.
pub fn text_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Summarize an optional base64 image payload without embedding it.
pub fn image_summary(image: Option<&str>) -> Value {
    match image {
        Some(data) => json!({ "present": true, "encoded_len": data.len() }),
        None => json!({ "present": false }),
    }
}
