use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Raw article record as returned by the news provider.
///
/// Every field defaults so that a malformed record deserializes instead of
/// poisoning the whole payload; `is_valid` decides whether it is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub related: String,
    #[serde(default)]
    pub image: String,
    /// Publication time in Unix seconds.
    #[serde(default)]
    pub datetime: i64,
}

impl RawArticle {
    /// A record is usable only when all identity and ordering fields are present.
    pub fn is_valid(&self) -> bool {
        !self.headline.trim().is_empty()
            && self.id != 0
            && !self.url.trim().is_empty()
            && self.datetime > 0
            && !self.source.trim().is_empty()
    }

    /// Composite identity key used for deduplication.
    pub fn dedup_key(&self) -> String {
        format!("{}-{}-{}", self.id, self.url, self.headline)
    }
}

/// Canonical article in a digest. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub url: String,
    pub headline: String,
    pub source: String,
    pub summary: String,
    /// Publication time in Unix seconds; digests are ordered by this.
    pub datetime: i64,
    pub related_symbol: Option<String>,
    pub is_company_news: bool,
    pub discovery_round: usize,
}

impl Article {
    pub fn from_raw(
        raw: &RawArticle,
        is_company_news: bool,
        related_symbol: Option<&str>,
        discovery_round: usize,
    ) -> Self {
        Self {
            id: raw.id,
            url: raw.url.clone(),
            headline: raw.headline.clone(),
            source: raw.source.clone(),
            summary: raw.summary.clone(),
            datetime: raw.datetime,
            related_symbol: related_symbol.map(|s| s.to_string()),
            is_company_news,
            discovery_round,
        }
    }
}

/// A user eligible to receive digests. Supplied by the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Per-recipient outcome of one digest cycle.
#[derive(Debug, Clone)]
pub struct DigestResult {
    pub profile: RecipientProfile,
    pub articles: Vec<Article>,
    /// None signals that the fixed fallback sentence was (or should be) used.
    pub summary_text: Option<String>,
    pub succeeded: bool,
}

/// Signup-form fields folded into the welcome-email prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WelcomeDetails {
    pub country: String,
    pub investment_goals: String,
    pub risk_tolerance: String,
    pub preferred_industry: String,
}

impl WelcomeDetails {
    pub fn profile_block(&self) -> String {
        format!(
            "- Country: {}\n- Investment goals: {}\n- Risk tolerance: {}\n- Preferred industry: {}",
            self.country, self.investment_goals, self.risk_tolerance, self.preferred_industry
        )
    }
}

/// Inclusive date window passed to company-news queries, as YYYY-MM-DD.
#[derive(Debug, Clone)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    /// Trailing window ending today (UTC).
    pub fn trailing_days(days: i64) -> Self {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(days);
        Self {
            from: from.format("%Y-%m-%d").to_string(),
            to: to.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub token: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    /// How long a fetched payload may be served from the in-client cache.
    pub cache_ttl_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://finnhub.io/api/v1".to_string(),
            token: String::new(),
            timeout_seconds: 30,
            max_retries: 2,
            retry_delay_seconds: 1,
            cache_ttl_seconds: 300,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Hard cap on articles per digest.
    pub max_articles: usize,
    /// Trailing window for company-news queries, in days.
    pub window_days: i64,
    /// Safety cap on how many general-feed candidates are scanned for duplicates.
    pub general_scan_cap: usize,
    /// Upper bound on concurrent per-symbol fetches.
    pub fetch_concurrency: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            max_articles: 6,
            window_days: 5,
            general_scan_cap: 20,
            fetch_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_address: String,
    pub timeout_seconds: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            username: String::new(),
            password: String::new(),
            from_name: "MarketBrief".to_string(),
            from_address: "briefings@marketbrief.app".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Message build error: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, DigestError>;
