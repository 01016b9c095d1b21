#![allow(dead_code)]

// Shared doubles and helpers for the integration tests.

use async_trait::async_trait;
use market_brief::{
    DateRange, DigestError, NewsSource, RawArticle, RecipientProfile, Result, TextGenerator,
    UserDirectory,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// A well-formed raw article for test fixtures.
pub fn raw_article(id: i64, headline: &str, datetime: i64) -> RawArticle {
    RawArticle {
        id,
        headline: headline.to_string(),
        url: format!("https://news.example.com/{}", id),
        source: "TestWire".to_string(),
        summary: format!("Summary of {}", headline),
        category: "company".to_string(),
        datetime,
        ..Default::default()
    }
}

/// News source double with per-symbol queues, a general feed, and switchable
/// failure modes. Call counters let tests assert which path was taken.
pub struct MockNewsSource {
    pub per_symbol: HashMap<String, Vec<RawArticle>>,
    pub general: Vec<RawArticle>,
    pub fail_symbols: bool,
    pub fail_general: bool,
    pub company_calls: AtomicUsize,
    pub general_calls: AtomicUsize,
}

impl MockNewsSource {
    pub fn new() -> Self {
        Self {
            per_symbol: HashMap::new(),
            general: Vec::new(),
            fail_symbols: false,
            fail_general: false,
            company_calls: AtomicUsize::new(0),
            general_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_symbol(mut self, symbol: &str, articles: Vec<RawArticle>) -> Self {
        self.per_symbol.insert(symbol.to_string(), articles);
        self
    }

    pub fn with_general(mut self, articles: Vec<RawArticle>) -> Self {
        self.general = articles;
        self
    }

    pub fn failing_symbols(mut self) -> Self {
        self.fail_symbols = true;
        self
    }

    pub fn failing_general(mut self) -> Self {
        self.fail_general = true;
        self
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    async fn company_news(&self, symbol: &str, _range: &DateRange) -> Result<Vec<RawArticle>> {
        self.company_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_symbols {
            return Err(DigestError::General("mock symbol fetch failure".to_string()));
        }
        Ok(self.per_symbol.get(symbol).cloned().unwrap_or_default())
    }

    async fn general_news(&self) -> Result<Vec<RawArticle>> {
        self.general_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_general {
            return Err(DigestError::General("mock general fetch failure".to_string()));
        }
        Ok(self.general.clone())
    }
}

/// Text generator that fails whenever the prompt contains a marker string,
/// and answers with canned text otherwise. Lets a test fail summarization
/// for exactly one recipient by planting the marker in their articles.
pub struct MarkerFailGenerator {
    pub marker: String,
    pub response: String,
}

impl MarkerFailGenerator {
    pub fn new(marker: &str, response: &str) -> Self {
        Self {
            marker: marker.to_string(),
            response: response.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for MarkerFailGenerator {
    async fn infer(&self, prompt: &str) -> Result<String> {
        if prompt.contains(&self.marker) {
            return Err(DigestError::General(format!(
                "mock generation failure on marker {}",
                self.marker
            )));
        }
        Ok(self.response.clone())
    }
}

/// User directory whose listing always fails, for bootstrap-error tests.
pub struct FailingDirectory;

#[async_trait]
impl UserDirectory for FailingDirectory {
    async fn eligible_recipients(&self) -> Result<Vec<RecipientProfile>> {
        Err(DigestError::General(
            "mock directory unavailable".to_string(),
        ))
    }
}

pub fn recipient(id: &str, email: &str, name: &str) -> RecipientProfile {
    RecipientProfile {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
    }
}
