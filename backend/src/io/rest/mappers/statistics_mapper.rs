use shared::DailyStatistics as SharedStatistics;

use crate::domain::models::statistics::DailyStatistics;

pub struct StatisticsMapper;

impl StatisticsMapper {
    pub fn to_dto(stats: DailyStatistics) -> SharedStatistics {
        SharedStatistics {
            date: stats.date.format("%Y-%m-%d").to_string(),
            feeding_count: stats.feeding_count,
            diaper_count: stats.diaper_count,
            sleep_duration_seconds: stats.sleep_duration.num_seconds(),
            sleep_hours: stats.sleep_hours(),
            last_feeding_time: stats.last_feeding_time.map(|t| t.to_rfc3339()),
            last_diaper_time: stats.last_diaper_time.map(|t| t.to_rfc3339()),
            last_sleep_time: stats.last_sleep_time.map(|t| t.to_rfc3339()),
            habit_completion: stats.habit_completion,
            formatted_sleep_duration: stats.formatted_sleep_duration(),
        }
    }
}
