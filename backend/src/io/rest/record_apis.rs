//! # REST API for Care Records
//!
//! Endpoints for adding, listing, deleting and toggling care records.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;
use shared::{
    CreateRecordRequest, CreateRecordResponse, DeleteRecordResponse, RecordType,
    ToggleMilestoneResponse,
};
use uuid::Uuid;

use crate::domain::commands::records::RecordListQuery;
use crate::domain::models::record::{CareRecord, RecordError};
use crate::domain::record_service::DEFAULT_RECENT_LIMIT;
use crate::io::rest::mappers::record_mapper::{parse_timestamp, RecordMapper};
use crate::io::rest::{bad_request, error_response};
use crate::AppState;

/// Create a router for record related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/today", get(get_today_records))
        .route("/recent", get(get_recent_records))
        .route("/:id", delete(delete_record))
        .route("/:id/toggle", post(toggle_milestone))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordListParams {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

/// List records, optionally filtered by type and inclusive time range
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordListParams>,
) -> Response {
    info!("GET /api/records - params: {:?}", params);

    let query = match to_list_query(params) {
        Ok(query) => query,
        Err(e) => return error_response("list records", e),
    };

    let records = state.record_service.list_records(query).await;
    (StatusCode::OK, Json(RecordMapper::to_list_response(records))).into_response()
}

fn to_list_query(params: RecordListParams) -> anyhow::Result<RecordListQuery> {
    let record_type = params
        .record_type
        .map(|t| t.parse::<RecordType>().map_err(|_| RecordError::UnknownRecordType(t)))
        .transpose()?;
    let invalid = |e: anyhow::Error| RecordError::Invalid(format!("{:#}", e));
    let start = params.start.as_deref().map(parse_timestamp).transpose().map_err(invalid)?;
    let end = params.end.as_deref().map(parse_timestamp).transpose().map_err(invalid)?;

    Ok(RecordListQuery {
        record_type,
        start,
        end,
        limit: params.limit,
    })
}

/// Add a record. An unknown `type` tag is rejected with 400.
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("POST /api/records - rejected body: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };
    info!("POST /api/records - request: {:?}", request);

    let record = match RecordMapper::to_domain(request, Utc::now()) {
        Ok(record) => record,
        Err(e) => return bad_request("create record", e),
    };

    match state.record_service.add(record).await {
        Ok(record) => {
            let message = format!("{} record added", capitalize(record.record_type().as_str()));
            let response = CreateRecordResponse {
                record: RecordMapper::to_dto(record),
                success_message: message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create record", e),
    }
}

/// Records from today in local time, newest first
pub async fn get_today_records(State(state): State<AppState>) -> Response {
    info!("GET /api/records/today");
    let records = state.record_service.records_today().await;
    (StatusCode::OK, Json(RecordMapper::to_list_response(records))).into_response()
}

/// The most recent records across all types
pub async fn get_recent_records(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Response {
    info!("GET /api/records/recent - limit: {:?}", params.limit);
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let records = state.record_service.recent_records(limit).await;
    (StatusCode::OK, Json(RecordMapper::to_list_response(records))).into_response()
}

pub async fn delete_record(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/records/{}", id);

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.record_service.delete_by_id(id).await {
        Ok(true) => {
            let response = DeleteRecordResponse {
                deleted: true,
                success_message: "Record deleted".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(false) => {
            let response = DeleteRecordResponse {
                deleted: false,
                success_message: format!("No record with id {}", id),
            };
            (StatusCode::NOT_FOUND, Json(response)).into_response()
        }
        Err(e) => error_response("delete record", e),
    }
}

/// Flip a milestone's completion state
pub async fn toggle_milestone(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("POST /api/records/{}/toggle", id);

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.record_service.toggle_milestone(id).await {
        Ok(milestone) => {
            let message = if milestone.is_completed {
                "Milestone completed"
            } else {
                "Milestone marked as not completed"
            };
            let response = ToggleMilestoneResponse {
                record: RecordMapper::to_dto(CareRecord::Milestone(milestone)),
                success_message: message.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("toggle milestone", e),
    }
}

fn parse_id(id: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(id).map_err(|e| {
        warn!("Invalid record id '{}': {}", id, e);
        (StatusCode::BAD_REQUEST, format!("Invalid record id: {}", id)).into_response()
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
