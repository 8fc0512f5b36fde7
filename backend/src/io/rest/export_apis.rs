//! # REST API for Data Export
//!
//! Endpoints for exporting care records as CSV.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use log::info;
use shared::{ExportRecordsRequest, ExportRecordsResponse};

use crate::domain::commands::export::ExportRecordsCommand;
use crate::io::rest::mappers::record_mapper::parse_timestamp;
use crate::io::rest::{bad_request, error_response};
use crate::AppState;

/// Create a router for export related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/csv", post(export_records_csv))
}

/// Export records in an optional time range as CSV data
pub async fn export_records_csv(
    State(state): State<AppState>,
    Json(request): Json<ExportRecordsRequest>,
) -> Response {
    info!("POST /api/export/csv - request: {:?}", request);

    let command = match to_command(request) {
        Ok(command) => command,
        Err(e) => return bad_request("export records", e),
    };

    match state.export_service.export_csv(command).await {
        Ok(result) => {
            let response = ExportRecordsResponse {
                csv_content: result.csv_content,
                filename: result.filename,
                record_count: result.record_count,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("export records", e),
    }
}

fn to_command(request: ExportRecordsRequest) -> anyhow::Result<ExportRecordsCommand> {
    Ok(ExportRecordsCommand {
        start: request.start.as_deref().map(parse_timestamp).transpose()?,
        end: request.end.as_deref().map(parse_timestamp).transpose()?,
        record_types: request.record_types,
    })
}
