//! # REST API for Development Analysis

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{AnalyzeMediaResponse, GenerateReportRequest, MediaItem};

use crate::io::rest::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(analyze_media))
        .route("/quota", get(get_quota))
        .route("/report", post(generate_report))
}

/// Analyse one media item, or return its cached result
pub async fn analyze_media(State(state): State<AppState>, Json(media): Json<MediaItem>) -> Response {
    info!("POST /api/analysis - media: {:?}", media);

    match state.analysis_service.analyze(&media).await {
        Ok(outcome) => {
            let response = AnalyzeMediaResponse {
                result: outcome.result,
                quota: outcome.quota,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("analyze media", e),
    }
}

pub async fn get_quota(State(state): State<AppState>) -> Response {
    info!("GET /api/analysis/quota");

    match state.analysis_service.quota_status().await {
        Ok(quota) => (StatusCode::OK, Json(quota)).into_response(),
        Err(e) => error_response("get analysis quota", e),
    }
}

/// Summarise previously analysed media
pub async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Response {
    info!("POST /api/analysis/report - {} media items", request.media_ids.len());

    if request.period_end < request.period_start {
        return (StatusCode::BAD_REQUEST, "Report period ends before it starts").into_response();
    }

    let report = state
        .analysis_service
        .generate_report(&request.media_ids, request.period_start, request.period_end)
        .await;
    (StatusCode::OK, Json(report)).into_response()
}
