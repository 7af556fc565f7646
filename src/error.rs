//! Unified error handling for the relay.
//!
//! Errors fall into two classes that matter to callers of the HTTP surface:
//!
//! - [`RelayError::InvalidRequest`]: the client sent a missing or malformed
//!   parameter. Surfaced as `400` with the parameter names.
//! - [`RelayError::Api`]: anything that went wrong talking to Azure DevOps
//!   (transport, auth, non-2xx, malformed body). Surfaced as a generic `500`;
//!   the upstream detail is logged, never returned.
//!
//! [`ConfigError`] only occurs during startup.
//!
//! ## Example
//!
//! ```rust
//! use devops_relay::error::{ApiError, RelayError};
//!
//! let err: RelayError = ApiError::Unauthorized.into();
//! assert!(err.is_upstream());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// One or more required request parameters were missing or malformed.
    #[error("{message}")]
    InvalidRequest {
        /// Names of the offending parameters, in request order.
        parameters: Vec<String>,
        /// Human readable description returned to the client.
        message: String,
    },

    /// An error occurred while talking to the Azure DevOps API.
    #[error("Upstream error: {0}")]
    Api(#[from] ApiError),

    /// An error occurred while loading or validating configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RelayError {
    /// Builds an `InvalidRequest` for parameters that were absent or empty.
    pub fn missing_parameters<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parameters: Vec<String> = parameters.into_iter().map(Into::into).collect();
        let message = format!("{} must be provided", parameters.join(", "));
        Self::InvalidRequest {
            parameters,
            message,
        }
    }

    /// Builds an `InvalidRequest` for a single parameter with an unusable value.
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl AsRef<str>) -> Self {
        let parameter = parameter.into();
        let message = format!("{} is invalid: {}", parameter, reason.as_ref());
        Self::InvalidRequest {
            parameters: vec![parameter],
            message,
        }
    }

    /// Returns true when the error originated upstream in Azure DevOps.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}

/// Errors that can occur when interacting with the Azure DevOps API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API request was rejected as unauthorized (401/403).
    #[error("Unauthorized: invalid or expired Personal Access Token")]
    Unauthorized,

    /// The requested resource was not found (404).
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the resource that was not found.
        resource: String,
    },

    /// The API returned a non-success response.
    #[error("API request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body returned by the API.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to parse API response: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// A transport-level error (connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A request URL could not be built from the configured base URL.
    #[error("Invalid request URL: {message}")]
    InvalidUrl {
        /// Description of the URL problem.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to set up API client: {message}")]
    ClientSetup {
        /// Description of the setup failure.
        message: String,
    },
}

impl ApiError {
    /// Maps an unsuccessful HTTP status and its body onto an error variant.
    pub fn from_status(status: u16, resource: &str, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound {
                resource: resource.to_string(),
            },
            _ => Self::RequestFailed {
                status,
                message: body,
            },
        }
    }

    /// Returns true when the error is a timeout of the upstream request.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }
}

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration field is missing.
    #[error("{field} is required (use --{field}, {env_var} env var, or config file)")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
        /// Environment variable name for this field.
        env_var: String,
    },

    /// Failed to read the configuration file.
    #[error("Failed to read config file at {path}: {message}")]
    FileReadError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError {
        /// Path to the config file.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// An invalid value was provided for a configuration field.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the field with invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

/// Type alias for Results using RelayError.
///
/// Not re-exported from the crate root to avoid shadowing `anyhow::Result`.
pub type RelayResult<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// # API Error Display
    ///
    /// Tests that API errors display correctly formatted messages.
    ///
    /// ## Test Scenario
    /// - Creates various ApiError variants
    /// - Tests their Display implementation
    ///
    /// ## Expected Outcome
    /// - Each error variant produces a clear, informative message
    #[test]
    fn test_api_error_display() {
        let unauthorized = ApiError::Unauthorized;
        assert!(unauthorized.to_string().contains("Unauthorized"));

        let not_found = ApiError::NotFound {
            resource: "project 'alpha'".to_string(),
        };
        assert!(not_found.to_string().contains("project 'alpha'"));

        let request_failed = ApiError::RequestFailed {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(request_failed.to_string().contains("503"));
        assert!(request_failed.to_string().contains("Service Unavailable"));
    }

    /// # Status Classification
    ///
    /// Tests that upstream HTTP statuses map onto the right ApiError variant.
    ///
    /// ## Test Scenario
    /// - Maps 401, 403, 404 and 503 responses
    ///
    /// ## Expected Outcome
    /// - Auth failures become Unauthorized, 404 becomes NotFound
    /// - Everything else keeps its status and body
    #[test]
    fn test_api_error_from_status() {
        assert!(matches!(
            ApiError::from_status(401, "projects", String::new()),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(403, "projects", String::new()),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(404, "teams of project 'p'", String::new()),
            ApiError::NotFound { resource } if resource == "teams of project 'p'"
        ));
        assert!(matches!(
            ApiError::from_status(503, "wiql", "down".to_string()),
            ApiError::RequestFailed { status: 503, message } if message == "down"
        ));
    }

    /// # Missing Parameters
    ///
    /// Tests the InvalidRequest constructor for absent parameters.
    ///
    /// ## Test Scenario
    /// - Builds an error for two missing parameters
    ///
    /// ## Expected Outcome
    /// - Both names are kept in order and appear in the message
    #[test]
    fn test_missing_parameters() {
        let err = RelayError::missing_parameters(["projectId", "teamId"]);
        match &err {
            RelayError::InvalidRequest { parameters, message } => {
                assert_eq!(parameters, &vec!["projectId", "teamId"]);
                assert_eq!(message, "projectId, teamId must be provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_upstream());
    }

    /// # Invalid Parameter
    ///
    /// Tests the InvalidRequest constructor for a malformed value.
    ///
    /// ## Test Scenario
    /// - Builds an error for a value containing control characters
    ///
    /// ## Expected Outcome
    /// - The message names the parameter and the reason
    #[test]
    fn test_invalid_parameter() {
        let err = RelayError::invalid_parameter("iteration", "contains control characters");
        assert_eq!(
            err.to_string(),
            "iteration is invalid: contains control characters"
        );
    }

    /// # Config Error Display
    ///
    /// Tests that Config errors display correctly formatted messages.
    ///
    /// ## Test Scenario
    /// - Creates a MissingRequired error
    ///
    /// ## Expected Outcome
    /// - The message names the field, the flag and the env var
    #[test]
    fn test_config_error_display() {
        let missing = ConfigError::MissingRequired {
            field: "organization".to_string(),
            env_var: "DEVOPS_RELAY_ORGANIZATION".to_string(),
        };
        let msg = missing.to_string();
        assert!(msg.contains("organization"));
        assert!(msg.contains("DEVOPS_RELAY_ORGANIZATION"));
        assert!(msg.contains("--organization"));
    }

    /// # Error Conversion
    ///
    /// Tests that errors convert correctly through the From trait.
    ///
    /// ## Test Scenario
    /// - Converts ApiError and ConfigError into RelayError
    ///
    /// ## Expected Outcome
    /// - Each lands in its own variant; only ApiError is upstream
    #[test]
    fn test_error_conversion() {
        let relay_error: RelayError = ApiError::Unauthorized.into();
        assert!(matches!(relay_error, RelayError::Api(_)));
        assert!(relay_error.is_upstream());

        let relay_error: RelayError = ConfigError::MissingRequired {
            field: "pat".to_string(),
            env_var: "DEVOPS_RELAY_PAT".to_string(),
        }
        .into();
        assert!(matches!(relay_error, RelayError::Config(_)));
        assert!(!relay_error.is_upstream());
    }
}
