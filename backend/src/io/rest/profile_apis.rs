//! # REST API for the Baby Profile
//!
//! Endpoints for reading, creating, updating and clearing the profile.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Local;
use log::info;
use shared::{CreateProfileRequest, UpdateProfileRequest};

use crate::io::rest::mappers::ProfileMapper;
use crate::io::rest::{bad_request, error_response};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_profile)
            .post(create_profile)
            .put(update_profile)
            .delete(clear_profile),
    )
}

/// The current profile; `profile` is null when none exists
pub async fn get_profile(State(state): State<AppState>) -> Response {
    info!("GET /api/profile");
    let profile = state.profile_service.get().await;
    let message = if profile.is_some() { "Profile found" } else { "No profile" };
    let response = ProfileMapper::to_response(profile, Local::now().date_naive(), message);
    (StatusCode::OK, Json(response)).into_response()
}

pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Response {
    info!("POST /api/profile - request: {:?}", request);

    let command = match ProfileMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request("create profile", e),
    };

    match state.profile_service.create(command).await {
        Ok(profile) => {
            let response = ProfileMapper::to_response(
                Some(profile),
                Local::now().date_naive(),
                "Profile created successfully",
            );
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create profile", e),
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Response {
    info!("PUT /api/profile - request: {:?}", request);

    let command = match ProfileMapper::to_update_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request("update profile", e),
    };

    match state.profile_service.update(command).await {
        Ok(profile) => {
            let response = ProfileMapper::to_response(
                Some(profile),
                Local::now().date_naive(),
                "Profile updated successfully",
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("update profile", e),
    }
}

pub async fn clear_profile(State(state): State<AppState>) -> Response {
    info!("DELETE /api/profile");

    match state.profile_service.clear().await {
        Ok(true) => (StatusCode::NO_CONTENT, "").into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "No baby profile exists").into_response(),
        Err(e) => error_response("clear profile", e),
    }
}
