//! Record store domain logic.
//!
//! Owns the in-memory collections of care records, one per record kind, and
//! writes a collection back through the [`RecordRepository`] whenever it
//! changes. Reads are served from memory.
//!
//! ## Rules
//!
//! - Record ids are unique across every kind
//! - Records are immutable once added, except milestone completion
//! - Listings across kinds are sorted newest first; ties keep kind order
//! - Mutations are applied to a copy, persisted, then swapped in, so a failed
//!   save leaves memory untouched
//! - Every mutation publishes a [`ChangeEvent`] after it has been persisted

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use log::{debug, info, warn};
use shared::RecordType;
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::commands::records::RecordListQuery;
use crate::domain::models::record::{CareRecord, MilestoneRecord, RecordCollections, RecordError, TypedRecord};
use crate::domain::models::statistics::DailyStatistics;
use crate::domain::notifications::{ChangeEvent, ChangeNotifier};
use crate::domain::statistics;
use crate::storage::{KeyValueStore, RecordRepository};

pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Clone)]
pub struct RecordService {
    repository: RecordRepository,
    records: Arc<RwLock<RecordCollections>>,
    notifier: ChangeNotifier,
}

impl RecordService {
    /// Load every collection from `store`
    pub async fn new(store: Arc<dyn KeyValueStore>, notifier: ChangeNotifier) -> Result<Self> {
        let repository = RecordRepository::new(store);
        let records = repository.load_all().await?;
        info!("Loaded {} care records", records.len());

        Ok(Self {
            repository,
            records: Arc::new(RwLock::new(records)),
            notifier,
        })
    }

    /// Append a record to its kind's collection and persist that collection
    pub async fn add(&self, record: CareRecord) -> Result<CareRecord> {
        validate(&record)?;
        let id = record.id();

        let mut records = self.records.write().await;
        if records.contains_id(id) {
            warn!("Rejected record with duplicate id {}", id);
            return Err(RecordError::DuplicateId(id).into());
        }

        let mut updated = records.clone();
        let record_type = updated.push(record.clone());
        self.repository.save_type(&updated, record_type).await?;
        *records = updated;
        drop(records);

        info!("Added {} record {}", record_type, id);
        self.notifier.publish(ChangeEvent::added(record_type, id));
        Ok(record)
    }

    /// One kind's records in insertion order
    pub async fn records_for_type<T: TypedRecord>(&self) -> Vec<T> {
        T::collection(&*self.records.read().await).clone()
    }

    pub async fn records_of_type(&self, record_type: RecordType) -> Vec<CareRecord> {
        self.records.read().await.of_type(record_type)
    }

    /// Every record, newest first
    pub async fn all_records(&self) -> Vec<CareRecord> {
        let mut records = self.records.read().await.all();
        sort_newest_first(&mut records);
        records
    }

    /// Records whose timestamp falls on `date` in `tz`, newest first
    pub async fn records_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Vec<CareRecord> {
        let (start, end) = statistics::day_window(date, tz);
        let all = self.records.read().await.all();
        let mut records: Vec<CareRecord> = statistics::records_in_window(&all, start, end)
            .into_iter()
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        records
    }

    pub async fn records_today(&self) -> Vec<CareRecord> {
        self.records_on(Local::now().date_naive(), &Local).await
    }

    /// Records with `start <= timestamp <= end`, newest first
    pub async fn records_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<CareRecord> {
        let mut records: Vec<CareRecord> = self
            .records
            .read()
            .await
            .all()
            .into_iter()
            .filter(|r| r.timestamp() >= start && r.timestamp() <= end)
            .collect();
        sort_newest_first(&mut records);
        records
    }

    /// At most `limit` records, newest first
    pub async fn recent_records(&self, limit: usize) -> Vec<CareRecord> {
        let mut records = self.all_records().await;
        records.truncate(limit);
        records
    }

    /// Combined filters used by the listing endpoint
    pub async fn list_records(&self, query: RecordListQuery) -> Vec<CareRecord> {
        debug!("Listing records: {:?}", query);
        let mut records: Vec<CareRecord> = match query.record_type {
            Some(record_type) => self.records_of_type(record_type).await,
            None => self.records.read().await.all(),
        };

        records.retain(|r| {
            query.start.map_or(true, |start| r.timestamp() >= start)
                && query.end.map_or(true, |end| r.timestamp() <= end)
        });
        sort_newest_first(&mut records);

        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        records
    }

    /// Remove the record with `id` from whichever collection holds it.
    ///
    /// Returns false, without persisting or notifying, when no record matches.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().await;
        let mut updated = records.clone();
        let affected = updated.remove_id(id);
        if affected.is_empty() {
            debug!("Delete requested for unknown record {}", id);
            return Ok(false);
        }

        for record_type in &affected {
            self.repository.save_type(&updated, *record_type).await?;
        }
        *records = updated;
        drop(records);

        info!("Deleted record {} from {:?}", id, affected);
        self.notifier.publish(ChangeEvent::deleted(affected, id));
        Ok(true)
    }

    /// Flip a milestone's completion flag
    pub async fn toggle_milestone(&self, id: Uuid) -> Result<MilestoneRecord> {
        let mut records = self.records.write().await;

        let Some(index) = records.milestone.iter().position(|m| m.id == id) else {
            let err = if records.contains_id(id) {
                RecordError::Invalid(format!("Record {} is not a milestone", id))
            } else {
                RecordError::NotFound(id)
            };
            return Err(err.into());
        };

        let mut updated = records.clone();
        updated.milestone[index].toggle_completed(Utc::now());
        let milestone = updated.milestone[index].clone();

        self.repository.save_type(&updated, RecordType::Milestone).await?;
        *records = updated;
        drop(records);

        info!("Milestone {} completed: {}", id, milestone.is_completed);
        self.notifier.publish(ChangeEvent::updated(RecordType::Milestone, id));
        Ok(milestone)
    }

    /// Add the default milestones when there are none yet. Returns how many were added.
    pub async fn seed_default_milestones(&self) -> Result<usize> {
        let mut records = self.records.write().await;
        if !records.milestone.is_empty() {
            return Ok(0);
        }

        let mut updated = records.clone();
        updated.milestone = MilestoneRecord::defaults();
        let seeded = updated.milestone.len();
        self.repository.save_type(&updated, RecordType::Milestone).await?;
        *records = updated;
        drop(records);

        info!("Seeded {} default milestones", seeded);
        self.notifier.publish(ChangeEvent::seeded(RecordType::Milestone));
        Ok(seeded)
    }

    pub async fn daily_statistics<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> DailyStatistics {
        let snapshot = self.records.read().await.all();
        statistics::daily_statistics(&snapshot, date, tz)
    }

    pub async fn today_statistics(&self) -> DailyStatistics {
        self.daily_statistics(Local::now().date_naive(), &Local).await
    }

    /// Timestamp of the newest record of `record_type`
    pub async fn last_record_time(&self, record_type: RecordType) -> Option<DateTime<Utc>> {
        self.records
            .read()
            .await
            .of_type(record_type)
            .iter()
            .map(CareRecord::timestamp)
            .max()
    }

    /// Empty every collection
    pub async fn clear_all(&self) -> Result<()> {
        let mut records = self.records.write().await;
        let removed = records.len();
        let cleared = RecordCollections::default();
        self.repository.save_all(&cleared).await?;
        *records = cleared;
        drop(records);

        info!("Cleared {} care records", removed);
        self.notifier.publish(ChangeEvent::cleared());
        Ok(())
    }
}

fn validate(record: &CareRecord) -> Result<(), RecordError> {
    match record {
        CareRecord::Sleep(sleep) => {
            if sleep.timestamp != sleep.start_time {
                return Err(RecordError::Invalid(
                    "Sleep timestamp must equal its start time".to_string(),
                ));
            }
            if matches!(sleep.end_time, Some(end) if end < sleep.start_time) {
                return Err(RecordError::SleepEndsBeforeStart);
            }
        }
        CareRecord::Feeding(feeding) => positive("amount_ml", feeding.amount_ml)?,
        CareRecord::Growth(growth) => {
            positive("weight_kg", growth.weight_kg)?;
            positive("height_cm", growth.height_cm)?;
            positive("head_circumference_cm", growth.head_circumference_cm)?;
        }
        _ => {}
    }
    Ok(())
}

fn positive(field: &str, value: Option<f64>) -> Result<(), RecordError> {
    match value {
        Some(v) if v.is_nan() || v <= 0.0 => Err(RecordError::Invalid(format!("{} must be positive, got {}", field, v))),
        _ => Ok(()),
    }
}

/// Stable sort, newest first
fn sort_newest_first(records: &mut [CareRecord]) {
    records.sort_by_key(|r| Reverse(r.timestamp()));
}
