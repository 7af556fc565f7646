//! Azure DevOps API client module.
//!
//! This module provides a client for the subset of the Azure DevOps REST API
//! the relay forwards:
//!
//! - Project and team listing
//! - Team members and team iterations
//! - WIQL queries and batch work item lookups
//!
//! Upstream payloads are decoded into private wire types and mapped onto the
//! client-facing models in [`crate::models`].

mod client;
mod credential;
mod mappers;
pub mod traits;
pub mod wiql;
mod wire;

// Re-export the client and its public items
pub use client::{
    AzureDevOpsClient, ClientOptions, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, ProjectsClient,
    TeamsClient, WorkItemsClient,
};
pub use credential::PatCredential;
pub use traits::{DevOpsOperations, ProjectOperations, TeamOperations, WorkItemOperations};

#[cfg(test)]
pub use traits::mocks;
