use crate::finnhub::NewsSource;
use crate::merge::{dedupe_general, round_robin_merge};
use crate::types::{Article, DateRange, DigestConfig, RawArticle, Result};
use crate::utils::normalize_symbols;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-user digest orchestration: resolve symbols, fan out fetches, merge,
/// and fall back to the general feed when the symbol path yields nothing.
pub struct DigestBuilder {
    source: Arc<dyn NewsSource>,
    config: DigestConfig,
}

impl DigestBuilder {
    pub fn new(source: Arc<dyn NewsSource>, config: DigestConfig) -> Self {
        Self { source, config }
    }

    /// Build a capped, recency-ordered article set for a watchlist.
    ///
    /// An empty symbol set, or a symbol fan-out that produces nothing (every
    /// fetch failed or returned no valid records), falls back to the
    /// deduplicated general feed. A general-feed failure degrades to an
    /// empty digest rather than an error.
    pub async fn build_for(&self, symbols: &[String]) -> Result<Vec<Article>> {
        let cleaned = normalize_symbols(symbols);

        if !cleaned.is_empty() {
            let range = DateRange::trailing_days(self.config.window_days);
            let queues = self.fetch_per_symbol(&cleaned, &range).await;
            let merged = round_robin_merge(&cleaned, &queues, self.config.max_articles);
            if !merged.is_empty() {
                info!(
                    "Merged {} company-news articles across {} symbols",
                    merged.len(),
                    cleaned.len()
                );
                return Ok(merged);
            }
            debug!(
                "No company news for {} watchlist symbols, falling back to the general feed",
                cleaned.len()
            );
        }

        let general = match self.source.general_news().await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("General news fetch failed: {}", e);
                Vec::new()
            }
        };

        Ok(dedupe_general(
            &general,
            self.config.general_scan_cap,
            self.config.max_articles,
        ))
    }

    /// Fetch and validate company news for each symbol concurrently.
    ///
    /// Concurrency is bounded by `fetch_concurrency`; a failed fetch becomes
    /// an empty queue for that symbol and never aborts the others.
    async fn fetch_per_symbol(
        &self,
        symbols: &[String],
        range: &DateRange,
    ) -> HashMap<String, Vec<RawArticle>> {
        let fetches = stream::iter(symbols.to_vec())
            .map(|symbol| {
                let source = Arc::clone(&self.source);
                let range = range.clone();
                async move {
                    let articles: Vec<RawArticle> = match source.company_news(&symbol, &range).await
                    {
                        Ok(articles) => {
                            articles.into_iter().filter(RawArticle::is_valid).collect()
                        }
                        Err(e) => {
                            warn!("Error fetching company news for {}: {}", symbol, e);
                            Vec::new()
                        }
                    };
                    (symbol, articles)
                }
            })
            .buffer_unordered(self.config.fetch_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        fetches.into_iter().collect()
    }
}
