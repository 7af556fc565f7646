//! # DevOps Relay Library
//!
//! A small REST relay in front of the Azure DevOps API. It exposes a
//! simplified, stable surface for clients that should not talk to Azure
//! DevOps directly:
//!
//! - Projects, teams, team members and team iterations
//! - The work items assigned to a member in a given iteration, resolved in
//!   two upstream calls (WIQL query, then a batch detail lookup)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devops_relay::{AzureDevOpsClient, core::{MemberWorkItemsRequest, WorkItemInteractor}};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AzureDevOpsClient::new("my-org".to_string(), "my-pat".to_string())?;
//!
//! let request = MemberWorkItemsRequest::new(
//!     "my-project",
//!     "my-team",
//!     "dana@example.com",
//!     "my-project\\Sprint 4",
//! );
//! let items = WorkItemInteractor::new(&client)
//!     .resolve_member_work_items(&request)
//!     .await?;
//! println!("Found {} work items", items.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsed_property;
pub mod server;

// Re-export commonly used types for convenience
pub use api::AzureDevOpsClient;
pub use config::{Config, RelayConfig};
pub use error::{ApiError, ConfigError, RelayError};
pub use models::Args;

/// Core result type used by the binary and bootstrap code
pub type Result<T> = anyhow::Result<T>;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git hash of the build, suffixed with `-dirty` for uncommitted trees
pub const BUILD_HASH: &str = env!("GIT_HASH");
