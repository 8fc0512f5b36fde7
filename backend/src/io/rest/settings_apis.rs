//! # REST API for Settings

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::info;
use shared::{NextFeedingReminderResponse, RecordType, UpdateSettingsRequest};

use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::io::rest::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).put(update_settings))
        .route("/next-feeding", get(get_next_feeding_reminder))
}

pub async fn get_settings(State(state): State<AppState>) -> Response {
    info!("GET /api/settings");
    (StatusCode::OK, Json(state.settings_service.get().await)).into_response()
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Response {
    info!("PUT /api/settings - request: {:?}", request);

    let command = UpdateSettingsCommand {
        notifications_enabled: request.notifications_enabled,
        feeding_reminders: request.feeding_reminders,
        sleep_reminders: request.sleep_reminders,
        diaper_reminders: request.diaper_reminders,
        milestone_alerts: request.milestone_alerts,
        medication_reminders: request.medication_reminders,
        feeding_reminder_interval_hours: request.feeding_reminder_interval_hours,
    };

    match state.settings_service.update(command).await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => error_response("update settings", e),
    }
}

/// Last feeding plus the reminder interval, when feeding reminders are on
pub async fn get_next_feeding_reminder(State(state): State<AppState>) -> Response {
    info!("GET /api/settings/next-feeding");

    let last_feeding = state.record_service.last_record_time(RecordType::Feeding).await;
    let next_reminder = state.settings_service.next_feeding_reminder(last_feeding).await;
    let settings = state.settings_service.get().await;

    let response = NextFeedingReminderResponse {
        next_reminder: next_reminder.map(|t| t.to_rfc3339()),
        interval_hours: settings.feeding_reminder_interval_hours,
    };
    (StatusCode::OK, Json(response)).into_response()
}
