//! Configuration loaded from `link2social.toml`.
//!
//! Every field has a sensible default so the file is optional. The
//! `VENICE_API_KEY` environment variable takes precedence over the file for
//! the API key.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Venice.ai API key.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the Venice.ai API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Text-generation model.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Sampling temperature for text generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Image-generation model.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Rendered image width in pixels.
    #[serde(default = "default_image_dim")]
    pub image_width: u32,

    /// Rendered image height in pixels.
    #[serde(default = "default_image_dim")]
    pub image_height: u32,

    /// Diffusion steps per render.
    #[serde(default = "default_image_steps")]
    pub image_steps: u32,

    /// Classifier-free guidance scale.
    #[serde(default = "default_cfg_scale")]
    pub image_cfg_scale: f32,

    /// Per-call timeout for provider requests, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.venice.ai/api/v1".to_string()
}

fn default_text_model() -> String {
    "llama-3.2-3b".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_image_model() -> String {
    "venice-sd35".to_string()
}

fn default_image_dim() -> u32 {
    1080
}

fn default_image_steps() -> u32 {
    25
}

fn default_cfg_scale() -> f32 {
    7.5
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            text_model: default_text_model(),
            temperature: default_temperature(),
            image_model: default_image_model(),
            image_width: default_image_dim(),
            image_height: default_image_dim(),
            image_steps: default_image_steps(),
            image_cfg_scale: default_cfg_scale(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load from `link2social.toml` in the current directory, falling back to
    /// defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("link2social.toml"))
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the file for the key.
        if let Ok(key) = std::env::var("VENICE_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }
}
