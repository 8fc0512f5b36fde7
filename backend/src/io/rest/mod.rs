//! # REST API Interface Layer
//!
//! HTTP endpoints over the domain services. Handlers translate DTOs from the
//! `shared` crate into domain commands, call a service, and translate the
//! result back. Domain errors become status codes here:
//!
//! | Error | Status |
//! |---|---|
//! | validation, malformed input, unknown record type | 400 |
//! | missing record, profile or family member | 404 |
//! | analysis quota exhausted | 429 |
//! | analysis provider failure | 502 |
//! | anything else | 500 |

pub mod analysis_apis;
pub mod data_apis;
pub mod events_apis;
pub mod export_apis;
pub mod family_apis;
pub mod logging_apis;
pub mod mappers;
pub mod profile_apis;
pub mod record_apis;
pub mod settings_apis;
pub mod statistics_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

use crate::domain::models::analysis::AnalysisError;
use crate::domain::models::family::{FamilyMemberNotFound, FamilyValidationError};
use crate::domain::models::profile::{ProfileNotFound, ProfileValidationError};
use crate::domain::models::record::RecordError;
use crate::domain::settings_service::SettingsValidationError;

/// Status code for a service error
pub fn status_for(err: &anyhow::Error) -> StatusCode {
    if let Some(record_error) = err.downcast_ref::<RecordError>() {
        return match record_error {
            RecordError::NotFound(_) => StatusCode::NOT_FOUND,
            RecordError::DuplicateId(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
    }
    if err.downcast_ref::<ProfileValidationError>().is_some()
        || err.downcast_ref::<SettingsValidationError>().is_some()
        || err.downcast_ref::<FamilyValidationError>().is_some()
    {
        return StatusCode::BAD_REQUEST;
    }
    if err.downcast_ref::<ProfileNotFound>().is_some() || err.downcast_ref::<FamilyMemberNotFound>().is_some() {
        return StatusCode::NOT_FOUND;
    }
    if let Some(analysis_error) = err.downcast_ref::<AnalysisError>() {
        return match analysis_error {
            AnalysisError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            AnalysisError::InvalidMedia | AnalysisError::UnsupportedFormat => StatusCode::BAD_REQUEST,
            AnalysisError::NetworkError | AnalysisError::Timeout | AnalysisError::ServerError(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Log a failed operation and turn it into a plain-text error response
pub fn error_response(operation: &str, err: anyhow::Error) -> Response {
    let status = status_for(&err);
    error!("Failed to {}: {:#}", operation, err);
    (status, err.to_string()).into_response()
}

/// Malformed client input detected in the REST layer itself
pub fn bad_request(operation: &str, err: anyhow::Error) -> Response {
    error!("Rejected request to {}: {:#}", operation, err);
    (StatusCode::BAD_REQUEST, format!("{:#}", err)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&RecordError::NotFound(Uuid::new_v4()).into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&RecordError::UnknownRecordType("play".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&ProfileNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&FamilyMemberNotFound(Uuid::new_v4()).into()), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&FamilyValidationError::EmptyRole.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AnalysisError::QuotaExceeded.into()), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_for(&AnalysisError::NetworkError.into()), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&anyhow::anyhow!("disk full")), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
