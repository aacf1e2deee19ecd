//! Request and response types for the Venice.ai API.
//!
//! Covers the two endpoints the pipeline consumes: `/chat/completions` for
//! text generation and `/image/generate` for image rendering. All structs
//! derive `Serialize`/`Deserialize` matching the wire format.

use serde::{Deserialize, Serialize};

/// Body for the `/chat/completions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "llama-3.2-3b").
    pub model: String,
    /// Conversation messages (system and user).
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Hard cap on generated tokens.
    pub max_completion_tokens: u32,
    /// Venice-specific switches (web scraping, citations).
    pub venice_parameters: VeniceParameters,
    /// Optional JSON-schema response format constraint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant".
    pub role: String,
    pub content: String,
}

/// Venice-specific request parameters.
///
/// `enable_web_scraping` makes the provider fetch and extract the URL
/// referenced in the prompt before generating, which is how the extraction
/// path works without a scraper on our side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeniceParameters {
    pub enable_web_scraping: bool,
    pub enable_web_citations: bool,
    pub include_venice_system_prompt: bool,
}

impl Default for VeniceParameters {
    fn default() -> Self {
        Self {
            enable_web_scraping: false,
            enable_web_citations: false,
            include_venice_system_prompt: true,
        }
    }
}

/// Response from `/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Token accounting for a chat call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Body for the `/image/generate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    /// Diffusion steps.
    pub steps: u32,
    /// Classifier-free guidance scale.
    pub cfg_scale: f32,
    /// Output encoding ("webp").
    pub format: String,
    /// When false the API returns base64 text instead of raw bytes.
    pub return_binary: bool,
    pub safe_mode: bool,
    pub embed_exif_metadata: bool,
    pub hide_watermark: bool,
    pub style_preset: String,
}

/// Response from `/image/generate` — base64-encoded payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
}

impl ImageResponse {
    /// First image payload, if the provider returned one.
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
