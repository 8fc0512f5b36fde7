//! Relays frontend log lines into the backend log under the `frontend`
//! target, tagged with the view and record they concern.

use axum::{extract::Json, routing::post, Router};
use log::Level;
use serde::{Deserialize, Serialize};
use shared::RecordType;
use uuid::Uuid;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(log_message))
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
    /// Frontend view that produced the line
    pub component: Option<String>,
    pub record_type: Option<RecordType>,
    pub record_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub success: bool,
    /// Level the line was written at after normalisation
    pub level: String,
}

pub async fn log_message(Json(request): Json<LogRequest>) -> Json<LogResponse> {
    let level = parse_level(&request.level);
    log::log!(target: "frontend", level, "{}", format_line(&request));

    Json(LogResponse {
        success: true,
        level: level.as_str().to_lowercase(),
    })
}

/// Unknown levels are logged at info
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "warning" => Level::Warn,
        other => other.parse().unwrap_or(Level::Info),
    }
}

fn format_line(request: &LogRequest) -> String {
    let mut line = format!("[{}]", request.component.as_deref().unwrap_or("app"));
    match (request.record_type, request.record_id) {
        (Some(record_type), Some(id)) => line.push_str(&format!(" {} {}:", record_type, id)),
        (Some(record_type), None) => line.push_str(&format!(" {}:", record_type)),
        (None, Some(id)) => line.push_str(&format!(" record {}:", id)),
        (None, None) => {}
    }
    line.push(' ');
    line.push_str(&request.message);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(component: Option<&str>, record_type: Option<RecordType>, record_id: Option<Uuid>) -> LogRequest {
        LogRequest {
            level: "info".to_string(),
            message: "save failed".to_string(),
            component: component.map(str::to_string),
            record_type,
            record_id,
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("WARNING"), Level::Warn);
        assert_eq!(parse_level("error"), Level::Error);
        assert_eq!(parse_level("trace"), Level::Trace);
        assert_eq!(parse_level("loud"), Level::Info);
    }

    #[test]
    fn test_line_carries_record_context() {
        let id = Uuid::nil();
        assert_eq!(
            format_line(&request(Some("timeline"), Some(RecordType::Feeding), Some(id))),
            format!("[timeline] feeding {}: save failed", id)
        );
        assert_eq!(
            format_line(&request(None, Some(RecordType::Sleep), None)),
            "[app] sleep: save failed"
        );
        assert_eq!(format_line(&request(Some("settings"), None, None)), "[settings] save failed");
    }
}
