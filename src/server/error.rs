//! HTTP mapping of relay errors.
//!
//! Clients only ever see `{code, message}`. Invalid requests explain which
//! parameters are wrong; every other failure gets the same generic message
//! while the full error is logged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::RelayError;

/// Message returned for any failure that is not the client's fault.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to receive data from Azure DevOps";

/// JSON error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code, repeated in the body.
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    /// Pairs the body with its status.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RelayError::InvalidRequest {
                parameters,
                message,
            } => {
                warn!(?parameters, "rejected request: {}", message);
                (StatusCode::BAD_REQUEST, message.clone())
            }
            RelayError::Api(api_error) => {
                error!(
                    error = %api_error,
                    timeout = api_error.is_timeout(),
                    "upstream request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_FAILURE_MESSAGE.to_string(),
                )
            }
            RelayError::Config(config_error) => {
                error!(error = %config_error, "configuration error while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        ErrorBody::new(status, message).into_response_with(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    /// # Invalid Request Mapping
    ///
    /// ## Test Scenario
    /// - Converts a missing-parameter error into a response
    ///
    /// ## Expected Outcome
    /// - 400 status
    #[test]
    fn test_invalid_request_is_bad_request() {
        let response = RelayError::missing_parameters(["teamId"]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// # Upstream Error Mapping
    ///
    /// ## Test Scenario
    /// - Converts upstream failures of different kinds into responses
    ///
    /// ## Expected Outcome
    /// - All become 500, regardless of the upstream status
    #[test]
    fn test_upstream_errors_are_internal() {
        for err in [
            ApiError::Unauthorized,
            ApiError::NotFound {
                resource: "teams".to_string(),
            },
            ApiError::RequestFailed {
                status: 503,
                message: "down".to_string(),
            },
        ] {
            let response = RelayError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::new(StatusCode::BAD_REQUEST, "projectId must be provided");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "code": 400, "message": "projectId must be provided" })
        );
    }
}
