pub mod client;
pub mod error;
pub mod types;

pub use client::{GenerationClient, VeniceClient};
pub use error::VeniceError;
pub use types::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse, VeniceParameters,
};
