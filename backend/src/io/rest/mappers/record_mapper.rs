use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shared::{
    CareRecord as SharedRecord, CreateRecordRequest, RecordDetails, RecordListResponse,
};
use uuid::Uuid;

use crate::domain::models::record::{
    CareRecord, DiaperRecord, FeedingRecord, GrowthRecord, MedicationRecord, MilestoneRecord,
    SleepRecord,
};

/// Mapper between the wire record DTOs and domain records.
pub struct RecordMapper;

impl RecordMapper {
    /// Build a new domain record from a create request.
    ///
    /// A fresh id is generated. The timestamp defaults to `now`; sleep records
    /// always take their start time as timestamp.
    pub fn to_domain(request: CreateRecordRequest, now: DateTime<Utc>) -> Result<CareRecord> {
        let id = Uuid::new_v4();
        let timestamp = match request.timestamp.as_deref() {
            Some(ts) => parse_timestamp(ts).context("Invalid record timestamp")?,
            None => now,
        };
        let notes = request.notes.filter(|n| !n.trim().is_empty());

        let record = match request.details {
            RecordDetails::Feeding {
                method,
                duration_seconds,
                amount_ml,
                side,
            } => CareRecord::Feeding(FeedingRecord {
                id,
                timestamp,
                notes,
                method,
                duration_seconds,
                amount_ml,
                side,
            }),
            RecordDetails::Diaper {
                wetness,
                has_bowel_movement,
                consistency,
            } => CareRecord::Diaper(DiaperRecord {
                id,
                timestamp,
                notes,
                wetness,
                has_bowel_movement,
                consistency,
            }),
            RecordDetails::Sleep {
                start_time,
                end_time,
                quality,
                location,
            } => {
                let start_time = parse_timestamp(&start_time).context("Invalid sleep start time")?;
                let end_time = end_time
                    .as_deref()
                    .map(parse_timestamp)
                    .transpose()
                    .context("Invalid sleep end time")?;
                CareRecord::Sleep(SleepRecord {
                    id,
                    timestamp: start_time,
                    notes,
                    start_time,
                    end_time,
                    quality,
                    location,
                })
            }
            RecordDetails::Growth {
                weight_kg,
                height_cm,
                head_circumference_cm,
            } => CareRecord::Growth(GrowthRecord {
                id,
                timestamp,
                notes,
                weight_kg,
                height_cm,
                head_circumference_cm,
            }),
            RecordDetails::Milestone {
                category,
                description,
                age_in_days,
                is_completed,
                completed_date,
            } => {
                let completed_date = match completed_date.as_deref() {
                    Some(date) => Some(parse_timestamp(date).context("Invalid milestone completion date")?),
                    None if is_completed => Some(now),
                    None => None,
                };
                CareRecord::Milestone(MilestoneRecord {
                    id,
                    timestamp,
                    notes,
                    category,
                    description,
                    age_in_days,
                    is_completed,
                    completed_date: completed_date.filter(|_| is_completed),
                })
            }
            RecordDetails::Medication {
                medication_name,
                dosage,
                route,
                prescribed_by,
            } => CareRecord::Medication(MedicationRecord {
                id,
                timestamp,
                notes,
                medication_name,
                dosage,
                route,
                prescribed_by,
            }),
        };
        Ok(record)
    }

    pub fn to_dto(record: CareRecord) -> SharedRecord {
        let id = record.id().to_string();
        let timestamp = record.timestamp().to_rfc3339();
        let notes = record.notes().map(str::to_string);

        let details = match record {
            CareRecord::Feeding(r) => RecordDetails::Feeding {
                method: r.method,
                duration_seconds: r.duration_seconds,
                amount_ml: r.amount_ml,
                side: r.side,
            },
            CareRecord::Diaper(r) => RecordDetails::Diaper {
                wetness: r.wetness,
                has_bowel_movement: r.has_bowel_movement,
                consistency: r.consistency,
            },
            CareRecord::Sleep(r) => RecordDetails::Sleep {
                start_time: r.start_time.to_rfc3339(),
                end_time: r.end_time.map(|t| t.to_rfc3339()),
                quality: r.quality,
                location: r.location,
            },
            CareRecord::Growth(r) => RecordDetails::Growth {
                weight_kg: r.weight_kg,
                height_cm: r.height_cm,
                head_circumference_cm: r.head_circumference_cm,
            },
            CareRecord::Milestone(r) => RecordDetails::Milestone {
                category: r.category,
                description: r.description,
                age_in_days: r.age_in_days,
                is_completed: r.is_completed,
                completed_date: r.completed_date.map(|t| t.to_rfc3339()),
            },
            CareRecord::Medication(r) => RecordDetails::Medication {
                medication_name: r.medication_name,
                dosage: r.dosage,
                route: r.route,
                prescribed_by: r.prescribed_by,
            },
        };

        SharedRecord {
            id,
            timestamp,
            notes,
            details,
        }
    }

    pub fn to_list_response(records: Vec<CareRecord>) -> RecordListResponse {
        RecordListResponse {
            records: records.into_iter().map(Self::to_dto).collect(),
        }
    }
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value.trim())
        .with_context(|| format!("'{}' is not an RFC 3339 timestamp", value))?
        .with_timezone(&Utc))
}
