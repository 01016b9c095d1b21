use crate::types::{RecipientProfile, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Trait for the external user store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All recipients eligible for the daily briefing. Profiles without a
    /// resolvable email or name are excluded here, before any dispatch.
    async fn eligible_recipients(&self) -> Result<Vec<RecipientProfile>>;
}

/// Trait for the external watchlist store.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Watchlist symbols owned by one recipient.
    async fn symbols_for(&self, recipient_id: &str) -> Result<Vec<String>>;
}

/// In-memory directory deserialized from a JSON document.
///
/// Stands in for the external user/watchlist persistence so the binary and
/// the tests can run without a database.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StaticDirectory {
    #[serde(default)]
    pub recipients: Vec<RecipientProfile>,
    /// Recipient id -> watchlist symbols.
    #[serde(default)]
    pub watchlists: HashMap<String, Vec<String>>,
}

impl StaticDirectory {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn eligible_recipients(&self) -> Result<Vec<RecipientProfile>> {
        let eligible: Vec<RecipientProfile> = self
            .recipients
            .iter()
            .filter(|r| !r.email.trim().is_empty() && !r.name.trim().is_empty())
            .cloned()
            .collect();
        debug!(
            "{} of {} recipients eligible for the briefing",
            eligible.len(),
            self.recipients.len()
        );
        Ok(eligible)
    }
}

#[async_trait]
impl WatchlistStore for StaticDirectory {
    async fn symbols_for(&self, recipient_id: &str) -> Result<Vec<String>> {
        Ok(self
            .watchlists
            .get(recipient_id)
            .cloned()
            .unwrap_or_default())
    }
}
