//! Domain models for care records.
//!
//! Each record kind is its own struct carrying the common fields (`id`,
//! `timestamp`, `notes`). `CareRecord` is the closed sum over the six kinds and
//! every consumer matches on it exhaustively.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{
    AdministrationRoute, BowelConsistency, BreastSide, FeedingMethod, MilestoneCategory,
    RecordType, SleepLocation, SleepQuality, WetnessLevel,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
    pub method: FeedingMethod,
    pub duration_seconds: Option<u32>,
    pub amount_ml: Option<f64>,
    pub side: Option<BreastSide>,
}

impl FeedingRecord {
    pub fn new(method: FeedingMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            notes: None,
            method,
            duration_seconds: None,
            amount_ml: None,
            side: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
    pub wetness: WetnessLevel,
    pub has_bowel_movement: bool,
    pub consistency: Option<BowelConsistency>,
}

impl DiaperRecord {
    pub fn new(wetness: WetnessLevel, has_bowel_movement: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            notes: None,
            wetness,
            has_bowel_movement,
            consistency: None,
        }
    }
}

/// A sleep session. Its `timestamp` is always the start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub quality: SleepQuality,
    pub location: SleepLocation,
}

impl SleepRecord {
    pub fn new(
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        quality: SleepQuality,
        location: SleepLocation,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: start_time,
            notes: None,
            start_time,
            end_time,
            quality,
            location,
        }
    }

    /// `end - start`, or None while the session is still open
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub head_circumference_cm: Option<f64>,
}

impl GrowthRecord {
    pub fn new(weight_kg: Option<f64>, height_cm: Option<f64>, head_circumference_cm: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            notes: None,
            weight_kg,
            height_cm,
            head_circumference_cm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
    pub category: MilestoneCategory,
    pub description: String,
    pub age_in_days: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
}

impl MilestoneRecord {
    pub fn new(category: MilestoneCategory, description: impl Into<String>, age_in_days: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            notes: None,
            category,
            description: description.into(),
            age_in_days,
            is_completed: false,
            completed_date: None,
        }
    }

    /// Common first-year milestones offered to a new tracker, none completed
    pub fn defaults() -> Vec<Self> {
        [
            (MilestoneCategory::Social, "First social smile", 42),
            (MilestoneCategory::Physical, "Holds head up during tummy time", 60),
            (MilestoneCategory::Physical, "Rolls over", 120),
            (MilestoneCategory::Physical, "Sits without support", 180),
            (MilestoneCategory::Physical, "Starts crawling", 210),
            (MilestoneCategory::Language, "Says first word", 300),
        ]
        .into_iter()
        .map(|(category, description, age_in_days)| Self::new(category, description, age_in_days))
        .collect()
    }

    /// Flip completion; `completed_date` follows the flag
    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        self.is_completed = !self.is_completed;
        self.completed_date = if self.is_completed { Some(now) } else { None };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
    pub medication_name: String,
    pub dosage: String,
    pub route: AdministrationRoute,
    pub prescribed_by: Option<String>,
}

impl MedicationRecord {
    pub fn new(medication_name: impl Into<String>, dosage: impl Into<String>, route: AdministrationRoute) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            notes: None,
            medication_name: medication_name.into(),
            dosage: dosage.into(),
            route,
            prescribed_by: None,
        }
    }
}

/// A care record of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CareRecord {
    Feeding(FeedingRecord),
    Diaper(DiaperRecord),
    Sleep(SleepRecord),
    Growth(GrowthRecord),
    Milestone(MilestoneRecord),
    Medication(MedicationRecord),
}

impl CareRecord {
    pub fn id(&self) -> Uuid {
        match self {
            CareRecord::Feeding(r) => r.id,
            CareRecord::Diaper(r) => r.id,
            CareRecord::Sleep(r) => r.id,
            CareRecord::Growth(r) => r.id,
            CareRecord::Milestone(r) => r.id,
            CareRecord::Medication(r) => r.id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CareRecord::Feeding(r) => r.timestamp,
            CareRecord::Diaper(r) => r.timestamp,
            CareRecord::Sleep(r) => r.timestamp,
            CareRecord::Growth(r) => r.timestamp,
            CareRecord::Milestone(r) => r.timestamp,
            CareRecord::Medication(r) => r.timestamp,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            CareRecord::Feeding(r) => r.notes.as_deref(),
            CareRecord::Diaper(r) => r.notes.as_deref(),
            CareRecord::Sleep(r) => r.notes.as_deref(),
            CareRecord::Growth(r) => r.notes.as_deref(),
            CareRecord::Milestone(r) => r.notes.as_deref(),
            CareRecord::Medication(r) => r.notes.as_deref(),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            CareRecord::Feeding(_) => RecordType::Feeding,
            CareRecord::Diaper(_) => RecordType::Diaper,
            CareRecord::Sleep(_) => RecordType::Sleep,
            CareRecord::Growth(_) => RecordType::Growth,
            CareRecord::Milestone(_) => RecordType::Milestone,
            CareRecord::Medication(_) => RecordType::Medication,
        }
    }

    /// Short one-line description used by exports
    pub fn summary(&self) -> String {
        match self {
            CareRecord::Feeding(r) => {
                let mut parts = vec![format!("{:?}", r.method).to_lowercase()];
                if let Some(amount) = r.amount_ml {
                    parts.push(format!("{}ml", amount));
                }
                if let Some(seconds) = r.duration_seconds {
                    parts.push(format!("{}min", seconds / 60));
                }
                if let Some(side) = r.side {
                    parts.push(format!("{:?}", side).to_lowercase());
                }
                parts.join(" ")
            }
            CareRecord::Diaper(r) => {
                let mut summary = format!("{:?}", r.wetness).to_lowercase();
                if r.has_bowel_movement {
                    summary.push_str(" + bowel movement");
                    if let Some(consistency) = r.consistency {
                        summary.push_str(&format!(" ({:?})", consistency).to_lowercase());
                    }
                }
                summary
            }
            CareRecord::Sleep(r) => match r.duration() {
                Some(d) => format!("{}h {}m {:?}", d.num_hours(), d.num_minutes() % 60, r.quality).to_lowercase(),
                None => format!("ongoing {:?}", r.quality).to_lowercase(),
            },
            CareRecord::Growth(r) => {
                let mut parts = Vec::new();
                if let Some(w) = r.weight_kg {
                    parts.push(format!("{}kg", w));
                }
                if let Some(h) = r.height_cm {
                    parts.push(format!("{}cm", h));
                }
                if let Some(c) = r.head_circumference_cm {
                    parts.push(format!("head {}cm", c));
                }
                parts.join(" ")
            }
            CareRecord::Milestone(r) => r.description.clone(),
            CareRecord::Medication(r) => format!("{} {}", r.medication_name, r.dosage),
        }
    }
}

/// Record validation and lookup failures
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),
    #[error("A record with id {0} already exists")]
    DuplicateId(Uuid),
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Sleep end time is before its start time")]
    SleepEndsBeforeStart,
    #[error("Invalid record: {0}")]
    Invalid(String),
}

/// In-memory collections, one per record kind, each in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollections {
    pub feeding: Vec<FeedingRecord>,
    pub diaper: Vec<DiaperRecord>,
    pub sleep: Vec<SleepRecord>,
    pub growth: Vec<GrowthRecord>,
    pub milestone: Vec<MilestoneRecord>,
    pub medication: Vec<MedicationRecord>,
}

impl RecordCollections {
    /// Append to the collection matching the record's kind
    pub fn push(&mut self, record: CareRecord) -> RecordType {
        let record_type = record.record_type();
        match record {
            CareRecord::Feeding(r) => self.feeding.push(r),
            CareRecord::Diaper(r) => self.diaper.push(r),
            CareRecord::Sleep(r) => self.sleep.push(r),
            CareRecord::Growth(r) => self.growth.push(r),
            CareRecord::Milestone(r) => self.milestone.push(r),
            CareRecord::Medication(r) => self.medication.push(r),
        }
        record_type
    }

    pub fn contains_id(&self, id: Uuid) -> bool {
        self.feeding.iter().any(|r| r.id == id)
            || self.diaper.iter().any(|r| r.id == id)
            || self.sleep.iter().any(|r| r.id == id)
            || self.growth.iter().any(|r| r.id == id)
            || self.milestone.iter().any(|r| r.id == id)
            || self.medication.iter().any(|r| r.id == id)
    }

    /// Remove the id from every collection, returning the kinds that held it
    pub fn remove_id(&mut self, id: Uuid) -> Vec<RecordType> {
        fn remove<T: TypedRecord>(records: &mut Vec<T>, id: Uuid) -> bool {
            let before = records.len();
            records.retain(|r| r.id() != id);
            records.len() != before
        }

        let mut affected = Vec::new();
        if remove(&mut self.feeding, id) {
            affected.push(RecordType::Feeding);
        }
        if remove(&mut self.diaper, id) {
            affected.push(RecordType::Diaper);
        }
        if remove(&mut self.sleep, id) {
            affected.push(RecordType::Sleep);
        }
        if remove(&mut self.growth, id) {
            affected.push(RecordType::Growth);
        }
        if remove(&mut self.milestone, id) {
            affected.push(RecordType::Milestone);
        }
        if remove(&mut self.medication, id) {
            affected.push(RecordType::Medication);
        }
        affected
    }

    /// One kind's records wrapped as `CareRecord`, insertion order
    pub fn of_type(&self, record_type: RecordType) -> Vec<CareRecord> {
        match record_type {
            RecordType::Feeding => self.feeding.iter().cloned().map(CareRecord::Feeding).collect(),
            RecordType::Diaper => self.diaper.iter().cloned().map(CareRecord::Diaper).collect(),
            RecordType::Sleep => self.sleep.iter().cloned().map(CareRecord::Sleep).collect(),
            RecordType::Growth => self.growth.iter().cloned().map(CareRecord::Growth).collect(),
            RecordType::Milestone => self.milestone.iter().cloned().map(CareRecord::Milestone).collect(),
            RecordType::Medication => self.medication.iter().cloned().map(CareRecord::Medication).collect(),
        }
    }

    /// Every record, concatenated kind by kind
    pub fn all(&self) -> Vec<CareRecord> {
        RecordType::ALL.iter().flat_map(|t| self.of_type(*t)).collect()
    }

    pub fn len(&self) -> usize {
        self.feeding.len()
            + self.diaper.len()
            + self.sleep.len()
            + self.growth.len()
            + self.milestone.len()
            + self.medication.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Implemented by each concrete record kind so collections can be queried
/// and persisted generically.
pub trait TypedRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const RECORD_TYPE: RecordType;

    fn id(&self) -> Uuid;
    fn timestamp(&self) -> DateTime<Utc>;
    fn collection(collections: &RecordCollections) -> &Vec<Self>;
}

macro_rules! typed_record {
    ($ty:ty, $variant:ident, $field:ident) => {
        impl TypedRecord for $ty {
            const RECORD_TYPE: RecordType = RecordType::$variant;

            fn id(&self) -> Uuid {
                self.id
            }

            fn timestamp(&self) -> DateTime<Utc> {
                self.timestamp
            }

            fn collection(collections: &RecordCollections) -> &Vec<Self> {
                &collections.$field
            }
        }

        impl From<$ty> for CareRecord {
            fn from(record: $ty) -> Self {
                CareRecord::$variant(record)
            }
        }
    };
}

typed_record!(FeedingRecord, Feeding, feeding);
typed_record!(DiaperRecord, Diaper, diaper);
typed_record!(SleepRecord, Sleep, sleep);
typed_record!(GrowthRecord, Growth, growth);
typed_record!(MilestoneRecord, Milestone, milestone);
typed_record!(MedicationRecord, Medication, medication);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sleep_duration() {
        let start = Utc.with_ymd_and_hms(2025, 1, 20, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).unwrap();

        let closed = SleepRecord::new(start, Some(end), SleepQuality::Good, SleepLocation::Crib);
        assert_eq!(closed.duration(), Some(Duration::hours(2)));
        assert_eq!(closed.timestamp, start);

        let open = SleepRecord::new(start, None, SleepQuality::Good, SleepLocation::Crib);
        assert_eq!(open.duration(), None);
    }

    #[test]
    fn test_milestone_toggle_sets_and_clears_date() {
        let mut milestone = MilestoneRecord::new(MilestoneCategory::Physical, "Rolls over", 120);
        let now = Utc::now();

        milestone.toggle_completed(now);
        assert!(milestone.is_completed);
        assert_eq!(milestone.completed_date, Some(now));

        milestone.toggle_completed(now);
        assert!(!milestone.is_completed);
        assert_eq!(milestone.completed_date, None);
    }

    #[test]
    fn test_collections_remove_id_across_kinds() {
        let mut collections = RecordCollections::default();
        let feeding = FeedingRecord::new(FeedingMethod::Breast);
        let diaper = DiaperRecord::new(WetnessLevel::Light, false);
        let feeding_id = feeding.id;

        collections.push(feeding.into());
        collections.push(diaper.into());
        assert_eq!(collections.len(), 2);

        assert_eq!(collections.remove_id(feeding_id), vec![RecordType::Feeding]);
        assert_eq!(collections.len(), 1);
        assert!(collections.remove_id(feeding_id).is_empty());
    }

    #[test]
    fn test_summary_mentions_key_fields() {
        let mut feeding = FeedingRecord::new(FeedingMethod::Bottle);
        feeding.amount_ml = Some(120.0);
        assert_eq!(CareRecord::Feeding(feeding).summary(), "bottle 120ml");

        let medication = MedicationRecord::new("Vitamin D", "400 IU", AdministrationRoute::Drops);
        assert_eq!(CareRecord::Medication(medication).summary(), "Vitamin D 400 IU");
    }
}
