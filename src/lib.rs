//! link2social — turn an article (URL or pasted text) into social-media posts
//! and two generated images.
//!
//! The pipeline is strictly sequential: content-source resolution, text
//! generation, image generation, then finalization, all driven by
//! [`coordinator::WorkflowCoordinator`] over a per-request
//! [`workflow::WorkflowState`] with a uniform audit trail.

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod renderer;
pub mod server;
pub mod ui;
pub mod venice;
pub mod workflow;
pub mod writer;
