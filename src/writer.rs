//! Text-generation stage.
//!
//! [`PostWriter`] builds the provider request for the resolved content source,
//! then validates and repairs whatever comes back. A malformed response never
//! fails the stage: parsing degrades to raw truncated text. Only transport
//! failures surface as a failed outcome.

use serde_json::json;

use crate::error::WorkflowError;
use crate::venice::{ChatMessage, ChatRequest, GenerationClient, VeniceParameters};
use crate::workflow::{ContentSource, GeneratedPosts, PostsOutcome};

/// Hard length ceiling for the short-form post.
pub const TWITTER_CAP: usize = 280;

/// Three-character marker appended when a post is truncated.
const TRUNCATION_MARKER: &str = "...";

const SYSTEM_PROMPT: &str = "You are an expert social media content creator for \
management consulting firms. You create professional, insight-driven content \
that engages business executives and thought leaders.";

/// Result of parsing the provider response: either the structured object we
/// asked for, or a degraded fallback built from the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPosts {
    Parsed(GeneratedPosts),
    Degraded(GeneratedPosts),
}

impl ParsedPosts {
    fn into_inner(self) -> GeneratedPosts {
        match self {
            ParsedPosts::Parsed(posts) | ParsedPosts::Degraded(posts) => posts,
        }
    }
}

/// Shape we ask the provider to return.
#[derive(Debug, serde::Deserialize)]
struct RawPosts {
    #[serde(default)]
    linkedin_post: String,
    #[serde(default)]
    twitter_post: String,
    #[serde(default)]
    key_insights: Vec<String>,
    #[serde(default)]
    article_title: String,
    #[serde(default)]
    article_author: Option<String>,
    #[serde(default)]
    article_date: Option<String>,
}

/// The text-generation stage.
pub struct PostWriter {
    model: String,
    temperature: f32,
}

impl PostWriter {
    pub fn new(model: String, temperature: f32) -> Self {
        Self { model, temperature }
    }

    /// Generate posts, insights and article metadata from the resolved source.
    ///
    /// Always returns a status-tagged outcome; never panics past its boundary.
    pub async fn generate_posts(
        &self,
        client: &impl GenerationClient,
        source: &ContentSource,
    ) -> PostsOutcome {
        let req = self.build_request(source);

        let response = match client.chat(&req).await {
            Ok(r) => r,
            Err(e) => return PostsOutcome::Failed(transport_message(source, e.into())),
        };

        let Some(text) = response.first_content() else {
            return PostsOutcome::Failed("provider returned an empty response".into());
        };

        let mut posts = parse_posts(text).into_inner();
        posts.twitter_post = cap_short_post(&posts.twitter_post);
        PostsOutcome::Ready(posts)
    }

    fn build_request(&self, source: &ContentSource) -> ChatRequest {
        let (user_prompt, scraping) = match source {
            ContentSource::Url(url) => (prompt_for_url(url), true),
            ContentSource::RawText(text) => (prompt_for_text(text), false),
        };

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_completion_tokens: 1500,
            venice_parameters: VeniceParameters {
                enable_web_scraping: scraping,
                ..Default::default()
            },
            response_format: Some(response_schema()),
        }
    }
}

fn prompt_for_url(url: &str) -> String {
    format!(
        "Please analyze the article at this URL: {url}\n\n{}",
        GENERATION_INSTRUCTIONS
    )
}

fn prompt_for_text(text: &str) -> String {
    format!(
        "Please analyze this article:\n\n{text}\n\n{}",
        GENERATION_INSTRUCTIONS
    )
}

const GENERATION_INSTRUCTIONS: &str = r#"Generate TWO social media posts based on this article:

1. LinkedIn Post (3-5 sentences):
   - Start with a hook that captures attention
   - Include 2-3 key insights or takeaways
   - End with a thought-provoking question or call to action

2. X/Twitter Post (under 280 characters):
   - Punchy and engaging
   - Include 1-2 key insights
   - Include a call to action or question

3. Extract 3-5 key insights as a JSON array

4. Extract article metadata: title, author (if available), date (if available)

Return your response as a JSON object with this exact structure:
{
  "linkedin_post": "...",
  "twitter_post": "...",
  "key_insights": ["...", "..."],
  "article_title": "...",
  "article_author": "name or null",
  "article_date": "date or null"
}"#;

fn response_schema() -> serde_json::Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "type": "object",
            "properties": {
                "linkedin_post": { "type": "string" },
                "twitter_post": { "type": "string" },
                "key_insights": { "type": "array", "items": { "type": "string" } },
                "article_title": { "type": "string" },
                "article_author": { "type": "string", "nullable": true },
                "article_date": { "type": "string", "nullable": true }
            },
            "required": ["linkedin_post", "twitter_post", "key_insights", "article_title"]
        }
    })
}

/// User-facing message for a transport failure, with actionable guidance when
/// the extraction path could not reach the article.
fn transport_message(source: &ContentSource, err: WorkflowError) -> String {
    match (source, &err) {
        (
            ContentSource::Url(url),
            WorkflowError::ProviderUnavailable(_)
            | WorkflowError::NetworkError(_)
            | WorkflowError::Timeout,
        ) => format!(
            "unable to access the URL {url} ({err}); if the page is paywalled or \
             blocked, paste the article text directly instead"
        ),
        _ => err.to_string(),
    }
}

/// Tolerant parse of the provider response.
///
/// Strips markdown code fences first. On a JSON failure, builds a degraded
/// result from the raw text rather than failing the stage.
pub fn parse_posts(text: &str) -> ParsedPosts {
    let cleaned = strip_fences(text);

    match serde_json::from_str::<RawPosts>(cleaned) {
        Ok(raw) => ParsedPosts::Parsed(GeneratedPosts {
            linkedin_post: raw.linkedin_post,
            twitter_post: raw.twitter_post,
            key_insights: raw.key_insights,
            article_title: if raw.article_title.is_empty() {
                "Untitled Article".into()
            } else {
                raw.article_title
            },
            article_author: raw.article_author,
            article_date: raw.article_date,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "provider response was not valid JSON, degrading");
            ParsedPosts::Degraded(GeneratedPosts {
                linkedin_post: text.chars().take(500).collect(),
                twitter_post: cap_short_post(text),
                key_insights: Vec::new(),
                article_title: "Untitled Article".into(),
                article_author: None,
                article_date: None,
            })
        }
    }
}

fn strip_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Enforce the hard cap on the short-form post, char-boundary safe:
/// anything over the cap becomes cap−3 characters plus a 3-character marker.
pub fn cap_short_post(post: &str) -> String {
    if post.chars().count() <= TWITTER_CAP {
        post.to_string()
    } else {
        let truncated: String = post
            .chars()
            .take(TWITTER_CAP - TRUNCATION_MARKER.len())
            .collect();
        format!("{truncated}{TRUNCATION_MARKER}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venice::{
        ChatChoice, ChatResponse, ImageRequest, ImageResponse, VeniceError,
    };
    use std::sync::Mutex;

    struct MockClient {
        response: Result<String, u16>,
        last_chat: Mutex<Option<ChatRequest>>,
    }

    impl MockClient {
        fn ok(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                last_chat: Mutex::new(None),
            }
        }
        fn err(status: u16) -> Self {
            Self {
                response: Err(status),
                last_chat: Mutex::new(None),
            }
        }
    }

    impl GenerationClient for MockClient {
        async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, VeniceError> {
            *self.last_chat.lock().unwrap() = Some(req.clone());
            match &self.response {
                Ok(text) => Ok(ChatResponse {
                    id: Some("mock".into()),
                    choices: vec![ChatChoice {
                        message: ChatMessage {
                            role: "assistant".into(),
                            content: text.clone(),
                        },
                    }],
                    usage: None,
                }),
                Err(status) => Err(VeniceError::from_status(*status, "mock error".into())),
            }
        }

        async fn generate_image(&self, _req: &ImageRequest) -> Result<ImageResponse, VeniceError> {
            unimplemented!("writer never renders images")
        }
    }

    fn writer() -> PostWriter {
        PostWriter::new("llama-3.2-3b".into(), 0.7)
    }

    const VALID_RESPONSE: &str = r#"{
        "linkedin_post": "Deep dive on AI adoption.",
        "twitter_post": "AI adoption is accelerating. Are you ready?",
        "key_insights": ["Adoption doubled", "Costs fell"],
        "article_title": "The State of AI",
        "article_author": "J. Doe",
        "article_date": "2025-06-01"
    }"#;

    #[tokio::test]
    async fn raw_text_source_disables_scraping_and_inlines_article() {
        let client = MockClient::ok(VALID_RESPONSE);
        let source = ContentSource::RawText("Short test article about AI.".into());

        let outcome = writer().generate_posts(&client, &source).await;
        assert!(matches!(outcome, PostsOutcome::Ready(_)));

        let req = client.last_chat.lock().unwrap().clone().unwrap();
        assert!(!req.venice_parameters.enable_web_scraping);
        assert!(req.messages[1].content.contains("Short test article about AI."));
    }

    #[tokio::test]
    async fn url_source_enables_scraping() {
        let client = MockClient::ok(VALID_RESPONSE);
        let source = ContentSource::Url("https://example.com/post".into());

        writer().generate_posts(&client, &source).await;

        let req = client.last_chat.lock().unwrap().clone().unwrap();
        assert!(req.venice_parameters.enable_web_scraping);
        assert!(req.messages[1].content.contains("https://example.com/post"));
    }

    #[tokio::test]
    async fn valid_response_produces_ready_posts() {
        let client = MockClient::ok(VALID_RESPONSE);
        let source = ContentSource::RawText("text".into());

        match writer().generate_posts(&client, &source).await {
            PostsOutcome::Ready(posts) => {
                assert_eq!(posts.article_title, "The State of AI");
                assert_eq!(posts.key_insights.len(), 2);
                assert_eq!(posts.article_author.as_deref(), Some("J. Doe"));
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_on_url_source_mentions_the_url() {
        let client = MockClient::err(500);
        let source = ContentSource::Url("https://blocked.example/paywalled".into());

        match writer().generate_posts(&client, &source).await {
            PostsOutcome::Failed(msg) => {
                assert!(msg.contains("unable to access the URL"));
                assert!(msg.contains("https://blocked.example/paywalled"));
                assert!(msg.contains("paste the article text"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn auth_error_is_categorized() {
        let client = MockClient::err(401);
        let source = ContentSource::RawText("text".into());

        match writer().generate_posts(&client, &source).await {
            PostsOutcome::Failed(msg) => assert!(msg.contains("authentication failed")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn parse_posts_strips_json_fences() {
        let fenced = format!("```json\n{VALID_RESPONSE}\n```");
        match parse_posts(&fenced) {
            ParsedPosts::Parsed(posts) => assert_eq!(posts.article_title, "The State of AI"),
            other => panic!("expected Parsed, got {other:?}"),
        }
    }

    #[test]
    fn parse_posts_degrades_on_invalid_json() {
        let raw = "not json at all, just prose about the article";
        match parse_posts(raw) {
            ParsedPosts::Degraded(posts) => {
                assert!(posts.linkedin_post.starts_with("not json"));
                assert_eq!(posts.article_title, "Untitled Article");
                assert!(posts.key_insights.is_empty());
            }
            other => panic!("expected Degraded, got {other:?}"),
        }
    }

    #[test]
    fn empty_title_becomes_placeholder() {
        let json = r#"{"linkedin_post": "a", "twitter_post": "b", "key_insights": []}"#;
        match parse_posts(json) {
            ParsedPosts::Parsed(posts) => assert_eq!(posts.article_title, "Untitled Article"),
            other => panic!("expected Parsed, got {other:?}"),
        }
    }

    #[test]
    fn cap_leaves_posts_at_or_under_the_limit_alone() {
        let exactly = "x".repeat(TWITTER_CAP);
        assert_eq!(cap_short_post(&exactly), exactly);
        assert_eq!(cap_short_post("short"), "short");
    }

    #[test]
    fn cap_truncates_to_277_plus_marker() {
        let long = "y".repeat(TWITTER_CAP + 50);
        let capped = cap_short_post(&long);
        assert_eq!(capped.chars().count(), TWITTER_CAP);
        assert!(capped.ends_with("..."));
        assert_eq!(capped.chars().filter(|&c| c == 'y').count(), TWITTER_CAP - 3);
    }

    #[test]
    fn cap_is_char_boundary_safe() {
        let long = "é".repeat(TWITTER_CAP + 10);
        let capped = cap_short_post(&long);
        assert_eq!(capped.chars().count(), TWITTER_CAP);
    }

    #[tokio::test]
    async fn overlong_twitter_post_is_capped_in_outcome() {
        let long_post = "z".repeat(400);
        let response = format!(
            r#"{{"linkedin_post": "ok", "twitter_post": "{long_post}",
                "key_insights": [], "article_title": "T"}}"#
        );
        let client = MockClient::ok(&response);
        let source = ContentSource::RawText("text".into());

        match writer().generate_posts(&client, &source).await {
            PostsOutcome::Ready(posts) => {
                assert_eq!(posts.twitter_post.chars().count(), TWITTER_CAP);
                assert!(posts.twitter_post.ends_with("..."));
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }
}
