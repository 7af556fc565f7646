//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{AzureDevOpsClient, DevOpsOperations};

/// Application state shared across all handlers.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    api: Arc<dyn DevOpsOperations>,
}

impl AppState {
    /// Creates state around any implementation of the upstream operations.
    pub fn new(api: Arc<dyn DevOpsOperations>) -> Self {
        Self { api }
    }

    /// Creates state around a real Azure DevOps client.
    pub fn from_client(client: AzureDevOpsClient) -> Self {
        Self::new(Arc::new(client))
    }

    /// Upstream operations.
    pub fn api(&self) -> &dyn DevOpsOperations {
        self.api.as_ref()
    }
}
