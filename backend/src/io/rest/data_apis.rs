//! # REST API for Data Management

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use log::{info, warn};
use shared::ClearDataResponse;

use crate::io::rest::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/clear", post(clear_data))
}

/// Delete every care record and the baby profile. Settings are kept.
pub async fn clear_data(State(state): State<AppState>) -> Response {
    warn!("POST /api/data/clear - clearing all records and the baby profile");

    if let Err(e) = state.record_service.clear_all().await {
        return error_response("clear records", e);
    }
    if let Err(e) = state.profile_service.clear().await {
        return error_response("clear profile", e);
    }

    info!("All data cleared");
    let response = ClearDataResponse {
        success_message: "All data has been cleared".to_string(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
