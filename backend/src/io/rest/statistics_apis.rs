//! # REST API for Daily Statistics

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use serde::Deserialize;

use crate::io::rest::mappers::StatisticsMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/daily", get(get_daily_statistics))
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyStatisticsParams {
    /// YYYY-MM-DD, local today when absent
    pub date: Option<String>,
}

/// Statistics for one local calendar day
pub async fn get_daily_statistics(
    State(state): State<AppState>,
    Query(params): Query<DailyStatisticsParams>,
) -> Response {
    info!("GET /api/statistics/daily - date: {:?}", params.date);

    let date = match params.date.as_deref() {
        Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                warn!("Invalid statistics date '{}': {}", value, e);
                return (StatusCode::BAD_REQUEST, format!("Invalid date '{}', expected YYYY-MM-DD", value))
                    .into_response();
            }
        },
        None => Local::now().date_naive(),
    };

    let stats = state.record_service.daily_statistics(date, &Local).await;
    (StatusCode::OK, Json(StatisticsMapper::to_dto(stats))).into_response()
}
