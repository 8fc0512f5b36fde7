//! # REST API for Family Members
//!
//! Caregivers sharing the baby's records: list, add, remove, and presence.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, put},
    Router,
};
use log::{info, warn};
use shared::{AddFamilyMemberRequest, RemoveFamilyMemberResponse, UpdatePresenceRequest};
use uuid::Uuid;

use crate::io::rest::error_response;
use crate::io::rest::mappers::FamilyMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(add_member))
        .route("/:id", delete(remove_member))
        .route("/:id/presence", put(update_presence))
}

pub async fn list_members(State(state): State<AppState>) -> Response {
    info!("GET /api/family");
    let members = state.family_service.list().await;
    (StatusCode::OK, Json(FamilyMapper::to_list_response(members))).into_response()
}

pub async fn add_member(
    State(state): State<AppState>,
    Json(request): Json<AddFamilyMemberRequest>,
) -> Response {
    info!("POST /api/family - request: {:?}", request);

    match state.family_service.add(FamilyMapper::to_command(request)).await {
        Ok(member) => (StatusCode::CREATED, Json(FamilyMapper::to_dto(member))).into_response(),
        Err(e) => error_response("add family member", e),
    }
}

pub async fn remove_member(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/family/{}", id);
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.family_service.remove(id).await {
        Ok(true) => {
            let response = RemoveFamilyMemberResponse {
                removed: true,
                success_message: "Family member removed".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(false) => {
            let response = RemoveFamilyMemberResponse {
                removed: false,
                success_message: format!("No family member with id {}", id),
            };
            (StatusCode::NOT_FOUND, Json(response)).into_response()
        }
        Err(e) => error_response("remove family member", e),
    }
}

pub async fn update_presence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePresenceRequest>,
) -> Response {
    info!("PUT /api/family/{}/presence - online: {}", id, request.is_online);
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.family_service.update_presence(id, request.is_online).await {
        Ok(member) => (StatusCode::OK, Json(FamilyMapper::to_dto(member))).into_response(),
        Err(e) => error_response("update family member presence", e),
    }
}

fn parse_id(id: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(id).map_err(|e| {
        warn!("Invalid family member id '{}': {}", id, e);
        (StatusCode::BAD_REQUEST, format!("Invalid family member id: {}", id)).into_response()
    })
}
