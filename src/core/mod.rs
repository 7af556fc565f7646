//! Relay logic that sits between the HTTP surface and the Azure DevOps
//! client: request validation and the member work-item resolution.

pub mod validation;
pub mod work_items;

pub use validation::{ensure_wiql_literal, require_params};
pub use work_items::{MemberWorkItemsRequest, ResolutionStage, WorkItemInteractor};
