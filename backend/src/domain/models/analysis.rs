//! Analysis quota bookkeeping and the error type shared by providers and the
//! analysis service.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::QuotaStatus;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("The media file is invalid or unreadable")]
    InvalidMedia,
    #[error("Network connection failed, please try again")]
    NetworkError,
    #[error("Analysis quota exceeded, try again after the quota resets")]
    QuotaExceeded,
    #[error("Analysis timed out")]
    Timeout,
    #[error("Analysis server error: {0}")]
    ServerError(String),
    #[error("Unsupported media format")]
    UnsupportedFormat,
}

/// Persisted usage counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaUsage {
    pub daily_used: u32,
    pub monthly_used: u32,
    /// Day the daily counter was last reset
    pub last_reset_date: NaiveDate,
    /// First day of the month the monthly counter belongs to
    pub month_start: NaiveDate,
}

impl QuotaUsage {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            daily_used: 0,
            monthly_used: 0,
            last_reset_date: today,
            month_start: first_of_month(today),
        }
    }

    /// Zero the counters whose period has ended. Returns true if anything changed.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let mut changed = false;
        if self.last_reset_date != today {
            self.daily_used = 0;
            self.last_reset_date = today;
            changed = true;
        }
        let month_start = first_of_month(today);
        if self.month_start != month_start {
            self.monthly_used = 0;
            self.month_start = month_start;
            changed = true;
        }
        changed
    }

    pub fn record_use(&mut self) {
        self.daily_used += 1;
        self.monthly_used += 1;
    }

    pub fn status(&self, daily_limit: u32, monthly_limit: u32, today: NaiveDate) -> QuotaStatus {
        QuotaStatus {
            daily_limit,
            daily_used: self.daily_used,
            monthly_limit,
            monthly_used: self.monthly_used,
            reset_time: next_midnight_utc(today),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_midnight_utc(today: NaiveDate) -> DateTime<Utc> {
    let tomorrow = today + Duration::days(1);
    Utc.from_utc_datetime(&tomorrow.and_hms_opt(0, 0, 0).unwrap_or_default())
}
