//! Persists the analysis result cache (`AnalysisCache`) and quota usage
//! (`AnalysisQuota`).

use anyhow::{Context, Result};
use log::{debug, warn};
use shared::AnalysisResult;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::analysis::QuotaUsage;
use crate::storage::traits::KeyValueStore;

pub const CACHE_KEY: &str = "AnalysisCache";
pub const QUOTA_KEY: &str = "AnalysisQuota";

#[derive(Clone)]
pub struct AnalysisRepository {
    store: Arc<dyn KeyValueStore>,
}

impl AnalysisRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cached results keyed by media id
    pub async fn load_cache(&self) -> Result<HashMap<Uuid, AnalysisResult>> {
        let Some(bytes) = self.store.get(CACHE_KEY).await? else {
            return Ok(HashMap::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(cache) => Ok(cache),
            Err(e) => {
                warn!("Discarding undecodable analysis cache: {}", e);
                Ok(HashMap::new())
            }
        }
    }

    pub async fn save_cache(&self, cache: &HashMap<Uuid, AnalysisResult>) -> Result<()> {
        let bytes = serde_json::to_vec(cache).context("Failed to encode analysis cache")?;
        self.store.set(CACHE_KEY, &bytes).await?;
        debug!("Saved {} cached analysis results", cache.len());
        Ok(())
    }

    pub async fn load_quota(&self) -> Result<Option<QuotaUsage>> {
        let Some(bytes) = self.store.get(QUOTA_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(usage) => Ok(Some(usage)),
            Err(e) => {
                warn!("Discarding undecodable analysis quota: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn save_quota(&self, usage: &QuotaUsage) -> Result<()> {
        let bytes = serde_json::to_vec(usage).context("Failed to encode analysis quota")?;
        self.store.set(QUOTA_KEY, &bytes).await?;
        debug!("Saved analysis quota: {:?}", usage);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_quota_round_trip() {
        let repo = AnalysisRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load_quota().await.unwrap(), None);

        let mut usage = QuotaUsage::new(NaiveDate::from_ymd_opt(2025, 5, 4).unwrap());
        usage.record_use();
        repo.save_quota(&usage).await.unwrap();

        assert_eq!(repo.load_quota().await.unwrap(), Some(usage));
        assert!(repo.load_cache().await.unwrap().is_empty());
    }
}
