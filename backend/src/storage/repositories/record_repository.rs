//! # Record Repository
//!
//! Persists each record kind as a JSON array under its own key:
//!
//! | Kind | Key |
//! |---|---|
//! | feeding | `FeedingRecords` |
//! | diaper | `DiaperRecords` |
//! | sleep | `SleepRecords` |
//! | growth | `GrowthRecords` |
//! | milestone | `MilestoneRecords` |
//! | medication | `MedicationRecords` |
//!
//! A collection that fails to decode is treated as absent and starts empty.

use anyhow::{Context, Result};
use log::{debug, warn};
use shared::RecordType;
use std::sync::Arc;

use crate::domain::models::record::{
    DiaperRecord, FeedingRecord, GrowthRecord, MedicationRecord, MilestoneRecord,
    RecordCollections, SleepRecord, TypedRecord,
};
use crate::storage::traits::KeyValueStore;

#[derive(Clone)]
pub struct RecordRepository {
    store: Arc<dyn KeyValueStore>,
}

impl RecordRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn storage_key(record_type: RecordType) -> &'static str {
        match record_type {
            RecordType::Feeding => "FeedingRecords",
            RecordType::Diaper => "DiaperRecords",
            RecordType::Sleep => "SleepRecords",
            RecordType::Growth => "GrowthRecords",
            RecordType::Milestone => "MilestoneRecords",
            RecordType::Medication => "MedicationRecords",
        }
    }

    /// Load every collection
    pub async fn load_all(&self) -> Result<RecordCollections> {
        Ok(RecordCollections {
            feeding: self.load::<FeedingRecord>().await?,
            diaper: self.load::<DiaperRecord>().await?,
            sleep: self.load::<SleepRecord>().await?,
            growth: self.load::<GrowthRecord>().await?,
            milestone: self.load::<MilestoneRecord>().await?,
            medication: self.load::<MedicationRecord>().await?,
        })
    }

    /// Load one collection; undecodable data yields an empty collection
    pub async fn load<T: TypedRecord>(&self) -> Result<Vec<T>> {
        let key = Self::storage_key(T::RECORD_TYPE);
        let Some(bytes) = self.store.get(key).await? else {
            debug!("No stored data for {}", key);
            return Ok(Vec::new());
        };

        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(records) => {
                debug!("Loaded {} records from {}", records.len(), key);
                Ok(records)
            }
            Err(e) => {
                warn!("Discarding undecodable {} collection: {}", key, e);
                Ok(Vec::new())
            }
        }
    }

    /// Persist the collection for one record kind
    pub async fn save_type(&self, collections: &RecordCollections, record_type: RecordType) -> Result<()> {
        match record_type {
            RecordType::Feeding => self.save(&collections.feeding).await,
            RecordType::Diaper => self.save(&collections.diaper).await,
            RecordType::Sleep => self.save(&collections.sleep).await,
            RecordType::Growth => self.save(&collections.growth).await,
            RecordType::Milestone => self.save(&collections.milestone).await,
            RecordType::Medication => self.save(&collections.medication).await,
        }
    }

    /// Persist every collection
    pub async fn save_all(&self, collections: &RecordCollections) -> Result<()> {
        for record_type in RecordType::ALL {
            self.save_type(collections, record_type).await?;
        }
        Ok(())
    }

    async fn save<T: TypedRecord>(&self, records: &[T]) -> Result<()> {
        let key = Self::storage_key(T::RECORD_TYPE);
        let bytes = serde_json::to_vec(records)
            .with_context(|| format!("Failed to encode {}", key))?;
        self.store.set(key, &bytes).await?;
        debug!("Saved {} records to {}", records.len(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::record::CareRecord;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use shared::{
        AdministrationRoute, FeedingMethod, MilestoneCategory, SleepLocation, SleepQuality,
        WetnessLevel,
    };

    fn setup_test() -> (RecordRepository, MemoryStore) {
        let store = MemoryStore::new();
        (RecordRepository::new(Arc::new(store.clone())), store)
    }

    fn mixed_collections() -> RecordCollections {
        let mut collections = RecordCollections::default();

        let mut feeding = FeedingRecord::new(FeedingMethod::Bottle);
        feeding.amount_ml = Some(90.0);
        feeding.notes = Some("after nap".to_string());
        collections.push(feeding.into());

        collections.push(DiaperRecord::new(WetnessLevel::Heavy, true).into());

        let start = Utc.with_ymd_and_hms(2025, 1, 20, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).unwrap();
        collections.push(SleepRecord::new(start, Some(end), SleepQuality::Good, SleepLocation::CarSeat).into());

        collections.push(GrowthRecord::new(Some(6.2), Some(61.0), None).into());
        collections.push(MilestoneRecord::new(MilestoneCategory::Social, "First smile", 42).into());
        collections.push(MedicationRecord::new("Vitamin D", "400 IU", AdministrationRoute::Drops).into());
        collections.push(FeedingRecord::new(FeedingMethod::Breast).into());
        collections
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let (repo, _store) = setup_test();
        let collections = mixed_collections();

        repo.save_all(&collections).await.unwrap();
        let loaded = repo.load_all().await.unwrap();

        assert_eq!(loaded, collections);
        assert_eq!(loaded.feeding.len(), 2);
    }

    #[tokio::test]
    async fn test_save_type_only_writes_that_key() {
        let (repo, store) = setup_test();
        let collections = mixed_collections();

        repo.save_type(&collections, RecordType::Diaper).await.unwrap();

        assert!(store.get("DiaperRecords").await.unwrap().is_some());
        assert!(store.get("FeedingRecords").await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_undecodable_collection_starts_empty() {
        let (repo, store) = setup_test();
        let collections = mixed_collections();
        repo.save_all(&collections).await.unwrap();

        store.set("SleepRecords", b"{not json").await.unwrap();

        let loaded = repo.load_all().await.unwrap();
        assert!(loaded.sleep.is_empty());
        assert_eq!(loaded.feeding, collections.feeding);
        assert_eq!(
            loaded.of_type(RecordType::Medication).iter().map(CareRecord::id).collect::<Vec<_>>(),
            collections.medication.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }
}
