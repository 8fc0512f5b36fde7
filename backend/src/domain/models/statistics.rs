use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Aggregated care activity for one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatistics {
    pub date: NaiveDate,
    pub feeding_count: usize,
    pub diaper_count: usize,
    /// Sum of completed sleep sessions that started on `date`
    pub sleep_duration: Duration,
    pub last_feeding_time: Option<DateTime<Utc>>,
    pub last_diaper_time: Option<DateTime<Utc>>,
    pub last_sleep_time: Option<DateTime<Utc>>,
    /// In `[0, 1]`
    pub habit_completion: f64,
}

impl DailyStatistics {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            feeding_count: 0,
            diaper_count: 0,
            sleep_duration: Duration::zero(),
            last_feeding_time: None,
            last_diaper_time: None,
            last_sleep_time: None,
            habit_completion: 0.0,
        }
    }

    pub fn sleep_hours(&self) -> f64 {
        self.sleep_duration.num_seconds() as f64 / 3600.0
    }

    /// "2h 15m", or "45m" under an hour
    pub fn formatted_sleep_duration(&self) -> String {
        let hours = self.sleep_duration.num_hours();
        let minutes = self.sleep_duration.num_minutes() % 60;
        if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}m", minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_formatting() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let mut stats = DailyStatistics::empty(date);
        assert_eq!(stats.formatted_sleep_duration(), "0m");

        stats.sleep_duration = Duration::minutes(135);
        assert_eq!(stats.formatted_sleep_duration(), "2h 15m");
        assert_eq!(stats.sleep_hours(), 2.25);
    }
}
