//! PAT-based credential for the Azure DevOps REST API.
//!
//! Azure DevOps accepts a Personal Access Token as the password of an HTTP
//! Basic credential with an empty user name.

use base64::Engine;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ApiError;

/// PAT-based credential for Azure DevOps authentication.
///
/// The PAT is stored in a `SecretString` and only exposed while the
/// `Authorization` header value is built.
///
/// # Example
///
/// ```rust
/// use devops_relay::api::PatCredential;
///
/// let credential = PatCredential::from_string("your-pat-token".to_string());
/// assert!(format!("{:?}", credential).contains("[REDACTED]"));
/// ```
#[derive(Clone)]
pub struct PatCredential {
    pat: SecretString,
}

impl PatCredential {
    /// Creates a new PAT credential from a SecretString.
    pub fn new(pat: SecretString) -> Self {
        Self { pat }
    }

    /// Creates a new PAT credential from a plain string.
    pub fn from_string(pat: String) -> Self {
        Self {
            pat: SecretString::from(pat),
        }
    }

    /// Builds the `Authorization` header value (`Basic base64(":" + pat)`).
    ///
    /// The returned value is flagged sensitive so that it is omitted from
    /// reqwest's debug output.
    pub fn authorization_header(&self) -> Result<HeaderValue, ApiError> {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!(":{}", self.pat.expose_secret()));
        let mut value = HeaderValue::from_str(&format!("Basic {}", encoded)).map_err(|e| {
            ApiError::ClientSetup {
                message: format!("PAT cannot be used in an Authorization header: {}", e),
            }
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl std::fmt::Debug for PatCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatCredential")
            .field("pat", &"[REDACTED]")
            .finish()
    }
}
