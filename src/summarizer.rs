use crate::types::{Article, DigestError, GeneratorConfig, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Prompt for condensing a digest's article set into prose. `{{newsData}}`
/// receives the articles as serialized JSON.
pub const NEWS_SUMMARY_PROMPT: &str = "\
You are a financial news editor writing a short daily market briefing for a retail investor.

Below is today's selection of news articles as JSON. Write a concise, friendly summary in plain
text: two or three short paragraphs covering the most significant stories, mentioning ticker
symbols where relevant. Do not invent facts that are not in the articles. If the list is empty,
say that there is no notable news today. Do not use markdown formatting.

Articles:
{{newsData}}";

/// Prompt for the personalized welcome-email intro. `{{userProfile}}`
/// receives the signup-form answers as a bullet list.
pub const WELCOME_INTRO_PROMPT: &str = "\
You are writing the opening paragraph of a welcome email for a new user of MarketBrief, a stock
market tracking app. Using their profile below, write one warm, personal paragraph (2-3
sentences, plain text, no markdown) about how the app will help them follow the markets.

User profile:
{{userProfile}}";

/// Shown in place of a generated summary when text generation fails.
pub const FALLBACK_SUMMARY: &str = "We were unable to generate your personalized news summary \
today. Please check back tomorrow for your market briefing.";

/// Shown in place of a generated welcome intro when text generation fails.
pub const FALLBACK_WELCOME_INTRO: &str = "Thanks for joining MarketBrief! You now have \
real-time alerts and a daily briefing for the companies you track, so you can spot \
opportunities before they become mainstream news.";

/// Trait for external text-generation capabilities.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run a single-turn prompt and return the generated text.
    async fn infer(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Text generator backed by the Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(DigestError::Config(
                "text generation API key is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn infer(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::General(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        debug!("Generated {} characters of text", text.len());
        Ok(text)
    }
}

/// Mock text generator for development and testing.
pub struct MockGenerator {
    response: String,
    fail: bool,
    delay_ms: u64,
}

impl MockGenerator {
    /// Always answers with the given text.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
            delay_ms: 0,
        }
    }

    /// Always fails, for exercising fallback paths.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
            delay_ms: 0,
        }
    }

    /// Always answers with an empty string.
    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn infer(&self, _prompt: &str) -> Result<String> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail {
            return Err(DigestError::General(
                "mock generator configured to fail".to_string(),
            ));
        }
        Ok(self.response.clone())
    }
}

/// Turns an article set into briefing prose via a text generator, degrading
/// to fixed fallback text instead of propagating generation failures.
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Summarize a digest. `None` signals the caller to use `FALLBACK_SUMMARY`.
    pub async fn summarize(&self, articles: &[Article]) -> Option<String> {
        let payload = match serde_json::to_string_pretty(articles) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize articles for summarization: {}", e);
                return None;
            }
        };

        let prompt = NEWS_SUMMARY_PROMPT.replacen("{{newsData}}", &payload, 1);

        match self.generator.infer(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("Text generation returned no usable summary");
                None
            }
            Err(e) => {
                warn!("Summarization failed: {}", e);
                None
            }
        }
    }

    /// Generate the personalized welcome intro, falling back to the fixed text.
    pub async fn welcome_intro(&self, profile_block: &str) -> String {
        let prompt = WELCOME_INTRO_PROMPT.replacen("{{userProfile}}", profile_block, 1);

        match self.generator.infer(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Text generation returned no usable welcome intro");
                FALLBACK_WELCOME_INTRO.to_string()
            }
            Err(e) => {
                warn!("Welcome intro generation failed: {}", e);
                FALLBACK_WELCOME_INTRO.to_string()
            }
        }
    }
}
