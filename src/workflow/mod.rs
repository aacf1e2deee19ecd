pub mod audit;
pub mod source;
pub mod state;

pub use audit::{AuditEntry, AuditStatus, image_summary, text_preview};
pub use source::{ContentSource, resolve_source};
pub use state::{
    GeneratedImages, GeneratedPosts, ImagesOutcome, Phase, PostsOutcome, WorkflowState,
};
