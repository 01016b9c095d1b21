use crate::types::{DateRange, DigestError, ProviderConfig, RawArticle, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = "market-brief/0.1";

/// Trait for fetching raw news articles from a provider.
///
/// Implementations may fail with network, timeout, or rate-limit errors;
/// callers are expected to degrade a failure to an empty result set rather
/// than letting it propagate through the digest pipeline.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Company news for one symbol over a trailing date window.
    async fn company_news(&self, symbol: &str, range: &DateRange) -> Result<Vec<RawArticle>>;

    /// The general market feed, used when no symbol-specific news is available.
    async fn general_news(&self) -> Result<Vec<RawArticle>>;
}

struct CachedPayload {
    fetched_at: Instant,
    articles: Vec<RawArticle>,
}

/// HTTP client for the Finnhub news API.
///
/// The client is an injected value: credential, retry policy, and cache TTL
/// all arrive through `ProviderConfig` at construction time.
pub struct FinnhubClient {
    client: Client,
    config: ProviderConfig,
    cache: Arc<RwLock<HashMap<String, CachedPayload>>>,
}

impl FinnhubClient {
    /// Build a client from configuration.
    ///
    /// A missing API key is a fatal configuration error and is reported here,
    /// before any fetch fan-out can start.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(DigestError::Config(
                "news provider API key is not configured".to_string(),
            ));
        }

        // Validate the base URL up front so endpoint building cannot fail later.
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let base = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse_with_params(&base, params)?;
        url.query_pairs_mut()
            .append_pair("token", &self.config.token);
        Ok(url)
    }

    async fn cache_lookup(&self, key: &str) -> Option<Vec<RawArticle>> {
        if self.config.cache_ttl_seconds == 0 {
            return None;
        }
        let cache = self.cache.read().await;
        let entry = cache.get(key)?;
        if entry.fetched_at.elapsed() < Duration::from_secs(self.config.cache_ttl_seconds) {
            debug!("Cache hit for {}", key);
            Some(entry.articles.clone())
        } else {
            None
        }
    }

    async fn cache_store(&self, key: &str, articles: &[RawArticle]) {
        if self.config.cache_ttl_seconds == 0 {
            return;
        }
        let mut cache = self.cache.write().await;
        cache.insert(
            key.to_string(),
            CachedPayload {
                fetched_at: Instant::now(),
                articles: articles.to_vec(),
            },
        );
    }

    async fn fetch_articles(&self, cache_key: &str, url: Url) -> Result<Vec<RawArticle>> {
        if let Some(hit) = self.cache_lookup(cache_key).await {
            return Ok(hit);
        }

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 32),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 60)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        match response.json::<Vec<RawArticle>>().await {
                            Ok(articles) => {
                                info!(
                                    "Fetched {} raw articles from {}",
                                    articles.len(),
                                    cache_key
                                );
                                self.cache_store(cache_key, &articles).await;
                                return Ok(articles);
                            }
                            Err(e) => {
                                last_error = Some(DigestError::Http(e));
                            }
                        }
                    } else {
                        last_error = Some(DigestError::General(format!(
                            "HTTP {}: {}",
                            status,
                            status.canonical_reason().unwrap_or("Unknown")
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(DigestError::Http(e));
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!(
                        "Attempt {} failed for {}, retrying in {:?}",
                        attempt + 1,
                        cache_key,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DigestError::General("provider request failed".to_string())))
    }
}

#[async_trait]
impl NewsSource for FinnhubClient {
    async fn company_news(&self, symbol: &str, range: &DateRange) -> Result<Vec<RawArticle>> {
        let url = self.endpoint(
            "company-news",
            &[
                ("symbol", symbol),
                ("from", range.from.as_str()),
                ("to", range.to.as_str()),
            ],
        )?;
        let cache_key = format!("company-news:{}:{}:{}", symbol, range.from, range.to);
        self.fetch_articles(&cache_key, url).await
    }

    async fn general_news(&self) -> Result<Vec<RawArticle>> {
        let url = self.endpoint("news", &[("category", "general")])?;
        self.fetch_articles("news:general", url).await
    }
}
