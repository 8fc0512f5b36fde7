//! # Baby Tracker Backend
//!
//! Local backend for the baby tracker application. It keeps care records,
//! the baby profile, family members and settings on disk and serves them to
//! a frontend over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! Frontend
//!     ↓
//! IO Layer (REST API, SSE change stream)
//!     ↓
//! Domain Layer (services, statistics, notifications)
//!     ↓
//! Storage Layer (repositories over a key-value store)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::domain::{
    AnalysisLimits, AnalysisProvider, AnalysisService, ChangeNotifier, ExportService,
    FamilyService, ProfileService, RecordService, SettingsService,
};
use crate::io::rest::{
    analysis_apis, data_apis, events_apis, export_apis, family_apis, logging_apis, profile_apis,
    record_apis, settings_apis, statistics_apis,
};
use crate::storage::{JsonFileStore, KeyValueStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub record_service: RecordService,
    pub profile_service: ProfileService,
    pub settings_service: SettingsService,
    pub family_service: FamilyService,
    pub analysis_service: AnalysisService,
    pub export_service: ExportService,
    pub notifier: ChangeNotifier,
}

impl AppState {
    /// Build every service over one store
    pub async fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn AnalysisProvider>,
        limits: AnalysisLimits,
    ) -> Result<Self> {
        let notifier = ChangeNotifier::new();

        let record_service = RecordService::new(store.clone(), notifier.clone()).await?;
        let profile_service = ProfileService::new(store.clone(), notifier.clone()).await?;
        let settings_service = SettingsService::new(store.clone(), notifier.clone()).await?;
        let family_service = FamilyService::new(store.clone(), notifier.clone()).await?;
        let analysis_service = AnalysisService::new(store, provider, limits).await?;
        let export_service = ExportService::new(record_service.clone());

        Ok(Self {
            record_service,
            profile_service,
            settings_service,
            family_service,
            analysis_service,
            export_service,
            notifier,
        })
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let data_directory = config.data_directory()?;
    info!("Setting up storage in {}", data_directory.display());
    let store = JsonFileStore::new(&data_directory)?;

    info!("Setting up domain services");
    let provider = Arc::new(config.analysis.simulated_provider());
    let state = AppState::new(Arc::new(store), provider, config.analysis.limits()).await?;

    if config.seed_default_milestones {
        state.record_service.seed_default_milestones().await?;
    }
    Ok(state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    // CORS setup to allow the frontend to make requests
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/records", record_apis::router())
        .nest("/statistics", statistics_apis::router())
        .nest("/profile", profile_apis::router())
        .nest("/settings", settings_apis::router())
        .nest("/family", family_apis::router())
        .nest("/analysis", analysis_apis::router())
        .nest("/export", export_apis::router())
        .nest("/data", data_apis::router())
        .nest("/events", events_apis::router())
        .nest("/logs", logging_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis_provider::SimulatedAnalysisProvider;
    use crate::storage::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    const TEST_ORIGIN: &str = "http://localhost:8080";

    async fn setup_test() -> (Router, AppState) {
        let provider = Arc::new(SimulatedAnalysisProvider::new(Duration::ZERO, Duration::ZERO, 0.0));
        let limits = AnalysisLimits {
            daily_limit: 1,
            monthly_limit: 100,
        };
        let state = AppState::new(Arc::new(MemoryStore::new()), provider, limits)
            .await
            .expect("Failed to create app state");
        let router = create_router(state.clone(), TEST_ORIGIN).expect("Failed to create router");
        (router, state)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).expect("response is JSON")
    }

    #[tokio::test]
    async fn test_create_and_list_records() {
        let (router, _state) = setup_test().await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/records",
            Some(json!({
                "timestamp": "2025-01-20T08:00:00Z",
                "type": "feeding",
                "method": "bottle",
                "amount_ml": 120.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = json_body(&body);
        assert_eq!(created["record"]["type"], "feeding");
        assert_eq!(created["record"]["amount_ml"], 120.0);

        let (status, body) = send(&router, "GET", "/api/records?type=feeding", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = json_body(&body);
        assert_eq!(listed["records"].as_array().unwrap().len(), 1);
        assert_eq!(listed["records"][0]["id"], created["record"]["id"]);

        let (status, body) = send(&router, "GET", "/api/records?type=diaper", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json_body(&body)["records"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_record_type_is_bad_request() {
        let (router, state) = setup_test().await;

        let (status, _) = send(
            &router,
            "POST",
            "/api/records",
            Some(json!({ "type": "playing", "duration_seconds": 600 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.record_service.all_records().await.is_empty());

        let (status, _) = send(&router, "GET", "/api/records?type=playing", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_record_endpoint() {
        let (router, _state) = setup_test().await;

        let (_, body) = send(
            &router,
            "POST",
            "/api/records",
            Some(json!({ "type": "diaper", "wetness": "light", "has_bowel_movement": false })),
        )
        .await;
        let id = json_body(&body)["record"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&router, "DELETE", &format!("/api/records/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["deleted"], true);

        let (status, _) = send(&router, "DELETE", &format!("/api/records/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "DELETE", "/api/records/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_toggle_milestone_endpoint() {
        let (router, _state) = setup_test().await;

        let (_, body) = send(
            &router,
            "POST",
            "/api/records",
            Some(json!({
                "type": "milestone",
                "category": "physical",
                "description": "Holds head up",
                "age_in_days": 60
            })),
        )
        .await;
        let id = json_body(&body)["record"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&router, "POST", &format!("/api/records/{}/toggle", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let toggled = json_body(&body);
        assert_eq!(toggled["record"]["is_completed"], true);
        assert!(toggled["record"]["completed_date"].is_string());
    }

    #[tokio::test]
    async fn test_daily_statistics_endpoint() {
        let (router, _state) = setup_test().await;

        let (status, body) = send(&router, "GET", "/api/statistics/daily?date=2025-01-20", None).await;
        assert_eq!(status, StatusCode::OK);
        let stats = json_body(&body);
        assert_eq!(stats["date"], "2025-01-20");
        assert_eq!(stats["feeding_count"], 0);
        assert_eq!(stats["habit_completion"], 0.0);

        let (status, _) = send(&router, "GET", "/api/statistics/daily?date=20-01-2025", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let (router, _state) = setup_test().await;

        let (status, body) = send(&router, "GET", "/api/profile", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json_body(&body)["profile"].is_null());

        let (status, _) = send(
            &router,
            "PUT",
            "/api/profile",
            Some(json!({ "name": "Mia" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &router,
            "POST",
            "/api/profile",
            Some(json!({ "name": "Mia", "birth_date": "2024-11-02", "gender": "female" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_body(&body)["profile"]["name"], "Mia");

        let (status, _) = send(
            &router,
            "POST",
            "/api/profile",
            Some(json!({ "name": "", "birth_date": "2024-11-02", "gender": "female" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "DELETE", "/api/profile", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_settings_validation_endpoint() {
        let (router, _state) = setup_test().await;

        let (status, _) = send(
            &router,
            "PUT",
            "/api/settings",
            Some(json!({ "feeding_reminder_interval_hours": 24 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            "PUT",
            "/api/settings",
            Some(json!({ "notifications_enabled": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["feeding_reminders"], false);

        let (status, body) = send(&router, "GET", "/api/settings/next-feeding", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json_body(&body)["next_reminder"].is_null());
    }

    #[tokio::test]
    async fn test_analysis_quota_endpoint() {
        let (router, _state) = setup_test().await;

        let media = |filename: &str| {
            json!({
                "id": uuid::Uuid::new_v4(),
                "filename": filename,
                "media_type": "photo",
                "baby_age_months": 5
            })
        };

        let (status, body) = send(&router, "POST", "/api/analysis", Some(media("smile.jpg"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["quota"]["daily_used"], 1);

        let (status, _) = send(&router, "POST", "/api/analysis", Some(media("laugh.jpg"))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, body) = send(&router, "GET", "/api/analysis/quota", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["daily_limit"], 1);
    }

    #[tokio::test]
    async fn test_export_and_clear() {
        let (router, state) = setup_test().await;

        send(
            &router,
            "POST",
            "/api/records",
            Some(json!({ "type": "growth", "weight_kg": 6.4 })),
        )
        .await;

        let (status, body) = send(&router, "POST", "/api/export/csv", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let export = json_body(&body);
        assert_eq!(export["record_count"], 1);
        assert!(export["csv_content"].as_str().unwrap().starts_with("id,type,timestamp,summary,notes"));

        let (status, _) = send(&router, "POST", "/api/data/clear", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.record_service.all_records().await.is_empty());
    }

    #[tokio::test]
    async fn test_family_endpoints() {
        let (router, _state) = setup_test().await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/family",
            Some(json!({ "name": "Grandma", "role": "Occasional carer" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let member = json_body(&body);
        assert_eq!(member["avatar"], "G");
        let id = member["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &router,
            "POST",
            "/api/family",
            Some(json!({ "name": "", "role": "Parent" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            "PUT",
            &format!("/api/family/{}/presence", id),
            Some(json!({ "is_online": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["is_online"], true);

        let (status, body) = send(&router, "GET", "/api/family", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["members"].as_array().unwrap().len(), 1);

        let (status, _) = send(&router, "DELETE", &format!("/api/family/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, "DELETE", &format!("/api/family/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &router,
            "PUT",
            &format!("/api/family/{}/presence", id),
            Some(json!({ "is_online": false })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_backend_seeds_milestones_once() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            data_directory: Some(temp_dir.path().to_path_buf()),
            ..AppConfig::default()
        };

        let state = initialize_backend(&config).await.unwrap();
        let seeded = state.record_service.all_records().await;
        assert!(!seeded.is_empty());

        let reopened = initialize_backend(&config).await.unwrap();
        assert_eq!(reopened.record_service.all_records().await.len(), seeded.len());
    }

    #[tokio::test]
    async fn test_event_stream_headers() {
        let (router, _state) = setup_test().await;

        let request = Request::builder().uri("/api/events").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").map(|v| v.to_str().unwrap()),
            Some("text/event-stream"),
        );
    }

    #[tokio::test]
    async fn test_log_relay() {
        let (router, _state) = setup_test().await;
        let (status, body) = send(
            &router,
            "POST",
            "/api/logs",
            Some(json!({ "level": "warn", "message": "slow render", "component": "timeline" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["success"], true);
    }

    #[tokio::test]
    async fn test_invalid_cors_origin() {
        let (_router, state) = setup_test().await;
        assert!(create_router(state, "not a\norigin").is_err());
    }
}
