//! Development analysis with quota enforcement and result caching.
//!
//! ## Flow of `analyze`
//!
//! 1. Roll the quota over if a day or month has passed, then refuse when
//!    either the daily or monthly allowance is used up
//! 2. Return a cached result for the same media without consuming quota
//! 3. Otherwise ask the provider; a success is cached and counted, a failure
//!    is returned as-is and never retried

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use shared::{AnalysisReport, AnalysisResult, EmotionState, MediaItem, QuotaStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::analysis_provider::AnalysisProvider;
use crate::domain::models::analysis::{AnalysisError, QuotaUsage};
use crate::storage::{AnalysisRepository, KeyValueStore};

pub const DEFAULT_DAILY_LIMIT: u32 = 10;
pub const DEFAULT_MONTHLY_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisLimits {
    pub daily_limit: u32,
    pub monthly_limit: u32,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_DAILY_LIMIT,
            monthly_limit: DEFAULT_MONTHLY_LIMIT,
        }
    }
}

/// A result together with the quota left after producing it
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub quota: QuotaStatus,
    pub from_cache: bool,
}

#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn AnalysisProvider>,
    repository: AnalysisRepository,
    limits: AnalysisLimits,
    cache: Arc<RwLock<HashMap<Uuid, AnalysisResult>>>,
    quota: Arc<Mutex<QuotaUsage>>,
}

impl AnalysisService {
    pub async fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn AnalysisProvider>,
        limits: AnalysisLimits,
    ) -> Result<Self> {
        let repository = AnalysisRepository::new(store);
        let cache = repository.load_cache().await?;
        let quota = repository
            .load_quota()
            .await?
            .unwrap_or_else(|| QuotaUsage::new(today()));
        info!("Loaded {} cached analysis results", cache.len());

        Ok(Self {
            provider,
            repository,
            limits,
            cache: Arc::new(RwLock::new(cache)),
            quota: Arc::new(Mutex::new(quota)),
        })
    }

    pub async fn analyze(&self, media: &MediaItem) -> Result<AnalysisOutcome> {
        info!("Analysis requested for media {} ({})", media.id, media.filename);

        let quota = self.quota_status().await?;
        if !quota.can_analyze() {
            warn!(
                "Analysis quota exhausted: {}/{} today, {}/{} this month",
                quota.daily_used, quota.daily_limit, quota.monthly_used, quota.monthly_limit
            );
            return Err(AnalysisError::QuotaExceeded.into());
        }

        if let Some(result) = self.cached_result(media.id).await {
            debug!("Serving cached analysis for media {}", media.id);
            return Ok(AnalysisOutcome {
                result,
                quota,
                from_cache: true,
            });
        }

        let result = self.provider.analyze(media).await.map_err(|e| {
            warn!("Analysis of media {} failed: {}", media.id, e);
            e
        })?;

        {
            let mut cache = self.cache.write().await;
            cache.insert(media.id, result.clone());
            self.repository.save_cache(&cache).await?;
        }

        let quota = {
            let mut usage = self.quota.lock().await;
            let today = today();
            usage.roll_over(today);
            usage.record_use();
            self.repository.save_quota(&usage).await?;
            usage.status(self.limits.daily_limit, self.limits.monthly_limit, today)
        };

        info!(
            "Analysis {} complete, development score {:.1}",
            result.id,
            result.overall_development_score()
        );
        Ok(AnalysisOutcome {
            result,
            quota,
            from_cache: false,
        })
    }

    /// Current usage, after rolling over any elapsed day or month
    pub async fn quota_status(&self) -> Result<QuotaStatus> {
        let mut usage = self.quota.lock().await;
        let today = today();
        if usage.roll_over(today) {
            debug!("Analysis quota rolled over for {}", today);
            self.repository.save_quota(&usage).await?;
        }
        Ok(usage.status(self.limits.daily_limit, self.limits.monthly_limit, today))
    }

    pub async fn cached_result(&self, media_id: Uuid) -> Option<AnalysisResult> {
        self.cache.read().await.get(&media_id).cloned()
    }

    /// Summarise the cached results for `media_ids`; ids without a result are skipped
    pub async fn generate_report(
        &self,
        media_ids: &[Uuid],
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> AnalysisReport {
        let results: Vec<AnalysisResult> = {
            let cache = self.cache.read().await;
            media_ids.iter().filter_map(|id| cache.get(id).cloned()).collect()
        };
        build_report(&results, media_ids, period_start, period_end)
    }
}

pub fn build_report(
    results: &[AnalysisResult],
    media_ids: &[Uuid],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> AnalysisReport {
    let average_development_score = if results.is_empty() {
        0.0
    } else {
        results.iter().map(AnalysisResult::overall_development_score).sum::<f64>() / results.len() as f64
    };

    let mut counts: HashMap<EmotionState, usize> = HashMap::new();
    for emotion in results.iter().flat_map(|r| r.primary_emotions.iter()) {
        *counts.entry(*emotion).or_default() += 1;
    }
    let total: usize = counts.values().sum();
    let emotion_distribution = counts
        .into_iter()
        .map(|(emotion, count)| (emotion, count as f64 / total as f64))
        .collect();

    AnalysisReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        period_start,
        period_end,
        media_items: media_ids.to_vec(),
        total_analyses: results.len(),
        average_development_score,
        emotion_distribution,
    }
}

/// Quota periods follow the UTC calendar
fn today() -> NaiveDate {
    Utc::now().date_naive()
}
