//! Daily statistics over care records.
//!
//! Everything here is a pure function of a record slice, a calendar day and a
//! time zone. A day is the half-open window `[start_of_day, start_of_next_day)`
//! in that zone.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use shared::RecordType;

use crate::domain::models::record::CareRecord;
use crate::domain::models::statistics::DailyStatistics;

pub const FEEDING_TARGET: f64 = 8.0;
pub const SLEEP_TARGET_HOURS: f64 = 14.0;
pub const DIAPER_TARGET: f64 = 6.0;

/// UTC instant at which `date` begins in `tz`
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // midnight skipped by a DST jump
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// `[start, end)` bounds of `date` in `tz`
pub fn day_window<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_day(date, tz), start_of_day(next, tz))
}

/// Records with `start <= timestamp < end`, in slice order
pub fn records_in_window(records: &[CareRecord], start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&CareRecord> {
    records
        .iter()
        .filter(|r| r.timestamp() >= start && r.timestamp() < end)
        .collect()
}

/// Latest timestamp of the given kind strictly before `before`
pub fn last_occurrence(records: &[CareRecord], record_type: RecordType, before: DateTime<Utc>) -> Option<DateTime<Utc>> {
    records
        .iter()
        .filter(|r| r.record_type() == record_type && r.timestamp() < before)
        .map(CareRecord::timestamp)
        .max()
}

/// Mean of the three capped ratios against the daily targets
pub fn habit_completion(feeding_count: usize, sleep_hours: f64, diaper_count: usize) -> f64 {
    let feeding = (feeding_count as f64 / FEEDING_TARGET).min(1.0);
    let sleep = (sleep_hours / SLEEP_TARGET_HOURS).clamp(0.0, 1.0);
    let diaper = (diaper_count as f64 / DIAPER_TARGET).min(1.0);
    (feeding + sleep + diaper) / 3.0
}

pub fn daily_statistics<Tz: TimeZone>(records: &[CareRecord], date: NaiveDate, tz: &Tz) -> DailyStatistics {
    let (start, end) = day_window(date, tz);
    let mut stats = DailyStatistics::empty(date);

    for record in records_in_window(records, start, end) {
        match record {
            CareRecord::Feeding(_) => stats.feeding_count += 1,
            CareRecord::Diaper(_) => stats.diaper_count += 1,
            CareRecord::Sleep(sleep) => {
                if let Some(duration) = sleep.duration() {
                    stats.sleep_duration = stats.sleep_duration + duration.max(Duration::zero());
                }
            }
            CareRecord::Growth(_) | CareRecord::Milestone(_) | CareRecord::Medication(_) => {}
        }
    }

    stats.last_feeding_time = last_occurrence(records, RecordType::Feeding, end);
    stats.last_diaper_time = last_occurrence(records, RecordType::Diaper, end);
    stats.last_sleep_time = last_occurrence(records, RecordType::Sleep, end);
    stats.habit_completion = habit_completion(stats.feeding_count, stats.sleep_hours(), stats.diaper_count);
    stats
}
