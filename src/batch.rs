use crate::digest::DigestBuilder;
use crate::mailer::DigestMailer;
use crate::summarizer::{Summarizer, FALLBACK_SUMMARY};
use crate::types::{DigestResult, RecipientProfile, WelcomeDetails};
use crate::users::{UserDirectory, WatchlistStore};
use crate::utils::formatted_today;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Structured result returned by every trigger entry point. Errors never
/// propagate past this boundary.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub success: bool,
    pub message: String,
}

/// Drives the digest pipeline across the full recipient population with
/// per-recipient fault isolation.
pub struct BatchRunner {
    directory: Arc<dyn UserDirectory>,
    watchlists: Arc<dyn WatchlistStore>,
    builder: Arc<DigestBuilder>,
    summarizer: Arc<Summarizer>,
    mailer: Arc<DigestMailer>,
    user_concurrency: usize,
}

impl BatchRunner {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        watchlists: Arc<dyn WatchlistStore>,
        builder: Arc<DigestBuilder>,
        summarizer: Arc<Summarizer>,
        mailer: Arc<DigestMailer>,
    ) -> Self {
        Self {
            directory,
            watchlists,
            builder,
            summarizer,
            mailer,
            user_concurrency: 8,
        }
    }

    pub fn with_user_concurrency(mut self, user_concurrency: usize) -> Self {
        self.user_concurrency = user_concurrency.max(1);
        self
    }

    /// Run the daily briefing across every eligible recipient.
    ///
    /// Only a failed or empty recipient listing stops the run. Every later
    /// per-recipient failure is recorded and the batch carries on: a failed
    /// summarization still dispatches the fallback text, and a failed send
    /// never cancels the other recipients.
    pub async fn run_daily(&self) -> RunSummary {
        let run_id = Uuid::new_v4();
        info!("Starting daily briefing run {}", run_id);

        let recipients = match self.directory.eligible_recipients().await {
            Ok(recipients) => recipients,
            Err(e) => {
                error!("Run {}: failed to load recipients: {}", run_id, e);
                return RunSummary {
                    success: false,
                    message: "Failed to load recipients for the daily briefing".to_string(),
                };
            }
        };

        if recipients.is_empty() {
            warn!("Run {}: no recipients eligible for the daily briefing", run_id);
            return RunSummary {
                success: false,
                message: "No recipients eligible for the daily briefing".to_string(),
            };
        }

        let total = recipients.len();

        // Stage one: build and summarize every digest.
        let digests: Vec<DigestResult> = stream::iter(recipients)
            .map(|profile| self.digest_for(profile))
            .buffer_unordered(self.user_concurrency)
            .collect()
            .await;

        // Stage two: dispatch, capturing each recipient's outcome independently.
        let date = formatted_today();
        let results: Vec<DigestResult> = stream::iter(digests)
            .map(|digest| {
                let date = date.clone();
                async move {
                    let content = digest
                        .summary_text
                        .clone()
                        .unwrap_or_else(|| FALLBACK_SUMMARY.to_string());
                    match self
                        .mailer
                        .send_news_summary(&digest.profile.email, &date, &content)
                        .await
                    {
                        Ok(()) => DigestResult {
                            succeeded: true,
                            ..digest
                        },
                        Err(e) => {
                            error!(
                                "Failed to send briefing to {}: {}",
                                digest.profile.email, e
                            );
                            DigestResult {
                                succeeded: false,
                                ..digest
                            }
                        }
                    }
                }
            })
            .buffer_unordered(self.user_concurrency)
            .collect()
            .await;

        let delivered = results.iter().filter(|r| r.succeeded).count();
        info!("Run {}: delivered {}/{} briefings", run_id, delivered, total);

        RunSummary {
            success: true,
            message: format!("Daily briefing sent to {} of {} recipients", delivered, total),
        }
    }

    /// Resolve one recipient's watchlist, build their digest, and summarize it.
    ///
    /// Each step degrades rather than skipping the recipient: a failed
    /// watchlist lookup or article build becomes an empty article set, and a
    /// failed summarization leaves `summary_text` unset for the dispatcher's
    /// fallback text.
    async fn digest_for(&self, profile: RecipientProfile) -> DigestResult {
        let symbols = match self.watchlists.symbols_for(&profile.id).await {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!("Watchlist lookup failed for {}: {}", profile.id, e);
                Vec::new()
            }
        };

        let articles = match self.builder.build_for(&symbols).await {
            Ok(articles) => articles,
            Err(e) => {
                error!("Digest build failed for {}: {}", profile.email, e);
                Vec::new()
            }
        };

        let summary_text = self.summarizer.summarize(&articles).await;

        DigestResult {
            profile,
            articles,
            summary_text,
            succeeded: false,
        }
    }
}

/// Single-recipient welcome path, triggered on signup.
///
/// Mirrors the batch's degrade-not-fail policy: a generation failure falls
/// back to the fixed intro text, and a send failure is reported in the
/// summary rather than raised.
pub async fn run_welcome(
    summarizer: &Summarizer,
    mailer: &DigestMailer,
    profile: &RecipientProfile,
    details: &WelcomeDetails,
) -> RunSummary {
    if profile.email.trim().is_empty() {
        return RunSummary {
            success: false,
            message: "No email address resolvable for the new user".to_string(),
        };
    }

    let intro = summarizer.welcome_intro(&details.profile_block()).await;

    match mailer
        .send_welcome(&profile.email, &profile.name, &intro)
        .await
    {
        Ok(()) => RunSummary {
            success: true,
            message: "Welcome email sent successfully!".to_string(),
        },
        Err(e) => {
            error!("Failed to send welcome email to {}: {}", profile.email, e);
            RunSummary {
                success: false,
                message: "Failed to send welcome email".to_string(),
            }
        }
    }
}
