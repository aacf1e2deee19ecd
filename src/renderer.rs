//! Image-generation stage.
//!
//! [`ImageRenderer`] requests two renders from the provider: an infographic
//! composition and a square social-post composition, each with its own prompt
//! and negative prompt over fixed style parameters. Each render walks a small
//! per-request state machine (`NotStarted → Requested → {Completed | Failed}`)
//! with a single attempt and no retries. The stage never raises past its
//! boundary: it always returns a status-tagged [`ImagesOutcome`].

use crate::venice::{GenerationClient, ImageRequest};
use crate::workflow::{GeneratedImages, ImagesOutcome};

/// Lifecycle of one image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    NotStarted,
    Requested,
    Completed,
    Failed,
}

impl RenderState {
    /// Mark the request as sent. Only valid from `NotStarted`.
    pub fn on_request(self) -> Self {
        match self {
            RenderState::NotStarted => RenderState::Requested,
            other => other,
        }
    }

    /// Settle the request. Only valid from `Requested`; terminal states stay put.
    pub fn on_result(self, ok: bool) -> Self {
        match self {
            RenderState::Requested => {
                if ok {
                    RenderState::Completed
                } else {
                    RenderState::Failed
                }
            }
            other => other,
        }
    }
}

/// The image-generation stage.
pub struct ImageRenderer {
    model: String,
    width: u32,
    height: u32,
    steps: u32,
    cfg_scale: f32,
}

impl ImageRenderer {
    pub fn new(model: String, width: u32, height: u32, steps: u32, cfg_scale: f32) -> Self {
        Self {
            model,
            width,
            height,
            steps,
            cfg_scale,
        }
    }

    /// Render the infographic and social images for an article.
    ///
    /// The first failed render fails the whole stage; both payload fields are
    /// then absent.
    pub async fn generate_images(
        &self,
        client: &impl GenerationClient,
        title: &str,
        key_insights: &[String],
    ) -> ImagesOutcome {
        let infographic = match self
            .render(client, "infographic", infographic_prompt(title, key_insights), INFOGRAPHIC_NEGATIVE)
            .await
        {
            Ok(image) => image,
            Err(message) => return ImagesOutcome::Failed(message),
        };

        let social = match self
            .render(client, "social", social_prompt(title), SOCIAL_NEGATIVE)
            .await
        {
            Ok(image) => image,
            Err(message) => return ImagesOutcome::Failed(message),
        };

        ImagesOutcome::Ready(GeneratedImages {
            infographic: Some(infographic),
            social: Some(social),
        })
    }

    /// Drive one render through its state machine. Single attempt.
    async fn render(
        &self,
        client: &impl GenerationClient,
        kind: &str,
        prompt: String,
        negative_prompt: &str,
    ) -> Result<String, String> {
        let req = ImageRequest {
            model: self.model.clone(),
            prompt,
            negative_prompt: negative_prompt.to_string(),
            width: self.width,
            height: self.height,
            steps: self.steps,
            cfg_scale: self.cfg_scale,
            format: "webp".into(),
            return_binary: false,
            safe_mode: false,
            embed_exif_metadata: false,
            hide_watermark: true,
            style_preset: "Digital Art".into(),
        };

        let mut state = RenderState::NotStarted;
        state = state.on_request();
        tracing::debug!(kind, ?state, "requesting image render");

        let result = client.generate_image(&req).await;

        match result {
            Ok(response) => match response.first_image() {
                Some(image) => {
                    state = state.on_result(true);
                    tracing::debug!(kind, ?state, encoded_len = image.len(), "render completed");
                    Ok(image.to_string())
                }
                None => {
                    state = state.on_result(false);
                    tracing::error!(kind, ?state, "provider returned no image");
                    Err(format!("{kind} render returned no image"))
                }
            },
            Err(e) => {
                state = state.on_result(false);
                tracing::error!(kind, ?state, error = %e, "render failed");
                Err(format!("{kind} render failed: {e}"))
            }
        }
    }
}

fn infographic_prompt(title: &str, key_insights: &[String]) -> String {
    let insights_text = key_insights
        .iter()
        .take(5)
        .map(|insight| format!("• {insight}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Professional management consulting infographic design, watercolor style, \
         elegant business aesthetics, minimalist layout, \
         soft professional colors (navy blue, gold accents, white space), \
         title: \"{title}\", \
         key insights illustrated with icons and text:\n{insights_text}\n\
         clean typography, executive presentation style, \
         consulting firm quality, sophisticated and modern"
    )
}

const INFOGRAPHIC_NEGATIVE: &str = "low quality, blurry, cartoonish, unprofessional, \
cluttered, bright neon colors, childish design, \
text overlay errors, distorted text, amateur design";

fn social_prompt(title: &str) -> String {
    let short_title: String = title.chars().take(60).collect();
    format!(
        "Professional social media post image for management consulting, \
         watercolor style, elegant business design, \
         title text: \"{short_title}\", \
         soft professional watercolor background in navy blue and gold tones, \
         minimalist composition with strategic white space, \
         sophisticated consulting firm branding, \
         clean modern aesthetics, suitable for LinkedIn and X/Twitter, \
         1080x1080 square format, centered composition, \
         executive presentation quality"
    )
}

const SOCIAL_NEGATIVE: &str = "low quality, blurry, unreadable text, \
cluttered design, amateur graphics, \
bright garish colors, cartoonish elements, \
distorted or overlapping text";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venice::{ChatRequest, ChatResponse, ImageResponse, VeniceError};
    use std::sync::Mutex;

    struct MockClient {
        /// One canned result per expected render call, in order.
        responses: Mutex<Vec<Result<ImageResponse, u16>>>,
        requests: Mutex<Vec<ImageRequest>>,
    }

    impl MockClient {
        fn with_responses(responses: Vec<Result<ImageResponse, u16>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn image(data: &str) -> Result<ImageResponse, u16> {
            Ok(ImageResponse {
                images: vec![data.to_string()],
            })
        }
    }

    impl GenerationClient for MockClient {
        async fn chat(&self, _req: &ChatRequest) -> Result<ChatResponse, VeniceError> {
            unimplemented!("renderer never chats")
        }

        async fn generate_image(&self, req: &ImageRequest) -> Result<ImageResponse, VeniceError> {
            self.requests.lock().unwrap().push(req.clone());
            match self.responses.lock().unwrap().remove(0) {
                Ok(resp) => Ok(resp),
                Err(status) => Err(VeniceError::from_status(status, "mock error".into())),
            }
        }
    }

    fn renderer() -> ImageRenderer {
        ImageRenderer::new("venice-sd35".into(), 1080, 1080, 25, 7.5)
    }

    #[test]
    fn render_state_happy_walk() {
        let state = RenderState::NotStarted.on_request();
        assert_eq!(state, RenderState::Requested);
        assert_eq!(state.on_result(true), RenderState::Completed);
        assert_eq!(state.on_result(false), RenderState::Failed);
    }

    #[test]
    fn render_state_terminal_states_are_inert() {
        assert_eq!(RenderState::Completed.on_request(), RenderState::Completed);
        assert_eq!(RenderState::Failed.on_result(true), RenderState::Failed);
        // A result before a request does nothing.
        assert_eq!(
            RenderState::NotStarted.on_result(true),
            RenderState::NotStarted
        );
    }

    #[tokio::test]
    async fn both_renders_succeed() {
        let client = MockClient::with_responses(vec![
            MockClient::image("aW5mbw=="),
            MockClient::image("c29jaWFs"),
        ]);

        let outcome = renderer()
            .generate_images(&client, "The State of AI", &["Adoption doubled".into()])
            .await;

        match outcome {
            ImagesOutcome::Ready(images) => {
                assert_eq!(images.infographic.as_deref(), Some("aW5mbw=="));
                assert_eq!(images.social.as_deref(), Some("c29jaWFs"));
            }
            other => panic!("expected Ready, got {other:?}"),
        }

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].prompt.contains("infographic"));
        assert!(requests[0].prompt.contains("The State of AI"));
        assert!(requests[0].prompt.contains("Adoption doubled"));
        assert!(requests[1].prompt.contains("social media post image"));
        assert_eq!(requests[0].width, 1080);
        assert_eq!(requests[0].style_preset, "Digital Art");
        assert!(!requests[0].return_binary);
    }

    #[tokio::test]
    async fn first_failure_fails_the_stage_without_second_attempt() {
        let client = MockClient::with_responses(vec![Err(503)]);

        let outcome = renderer().generate_images(&client, "T", &[]).await;

        match outcome {
            ImagesOutcome::Failed(msg) => {
                assert!(msg.contains("infographic render failed"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        // No retry, and the social render was never requested.
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_image_in_success_response_is_a_failure() {
        let client = MockClient::with_responses(vec![
            MockClient::image("aW5mbw=="),
            Ok(ImageResponse { images: vec![] }),
        ]);

        let outcome = renderer().generate_images(&client, "T", &[]).await;
        match outcome {
            ImagesOutcome::Failed(msg) => assert!(msg.contains("no image")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn social_prompt_truncates_long_titles() {
        let long_title = "A".repeat(120);
        let prompt = social_prompt(&long_title);
        assert!(prompt.contains(&"A".repeat(60)));
        assert!(!prompt.contains(&"A".repeat(61)));
    }

    #[test]
    fn infographic_prompt_caps_insights_at_five() {
        let insights: Vec<String> = (1..=8).map(|i| format!("Insight {i}")).collect();
        let prompt = infographic_prompt("T", &insights);
        assert!(prompt.contains("Insight 5"));
        assert!(!prompt.contains("Insight 6"));
    }
}
