//! Resolution of a team member's work items for one iteration.
//!
//! Azure DevOps cannot return full work items from a WIQL query, so the
//! resolution runs in two strictly sequential stages:
//!
//! 1. **AwaitingIds**: a WIQL query scoped to team, iteration path and
//!    assignee returns bare work item IDs.
//! 2. **AwaitingDetails**: one batch lookup fetches exactly those IDs.
//!
//! An empty ID list ends the resolution successfully without a second call.
//! A failure in either stage aborts the whole operation; IDs gathered by the
//! first stage are never returned on their own.
//!
//! The batch lookup does not promise to return items in WIQL order, and the
//! result is passed through in whatever order Azure DevOps produced it.

use tracing::{debug, info, instrument, warn};

use crate::api::WorkItemOperations;
use crate::core::validation::{ensure_wiql_literal, require_params};
use crate::error::RelayResult;
use crate::models::WorkItem;

/// Parameters of a member work-item resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberWorkItemsRequest {
    pub project_id: String,
    pub team_id: String,
    /// Assignee login, usually an email address.
    pub member_email: String,
    /// Full iteration path, e.g. `Relay\Sprint 4`.
    pub iteration: String,
}

impl MemberWorkItemsRequest {
    pub fn new(
        project_id: impl Into<String>,
        team_id: impl Into<String>,
        member_email: impl Into<String>,
        iteration: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            team_id: team_id.into(),
            member_email: member_email.into(),
            iteration: iteration.into(),
        }
    }

    /// Checks presence of every parameter and that the values interpolated
    /// into WIQL are safe literals. Parameter names are the ones clients use
    /// on the HTTP surface.
    pub fn validate(&self) -> RelayResult<()> {
        require_params(&[
            ("projectId", Some(self.project_id.as_str())),
            ("teamId", Some(self.team_id.as_str())),
            ("memberId", Some(self.member_email.as_str())),
            ("iteration", Some(self.iteration.as_str())),
        ])?;
        ensure_wiql_literal("memberId", &self.member_email)?;
        ensure_wiql_literal("iteration", &self.iteration)?;
        Ok(())
    }
}

/// Stage of a resolution, recorded on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    AwaitingIds,
    AwaitingDetails,
}

impl ResolutionStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionStage::AwaitingIds => "awaiting-ids",
            ResolutionStage::AwaitingDetails => "awaiting-details",
        }
    }
}

/// Orchestrates the WIQL query and the detail fetch against any
/// [`WorkItemOperations`] implementation.
pub struct WorkItemInteractor<'a, W: WorkItemOperations + ?Sized> {
    api: &'a W,
}

impl<'a, W: WorkItemOperations + ?Sized> WorkItemInteractor<'a, W> {
    pub fn new(api: &'a W) -> Self {
        Self { api }
    }

    /// Resolves the work items assigned to `request.member_email` in the
    /// given team iteration.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when a parameter is missing or unusable; no
    ///   upstream call is made in that case.
    /// - `Api` when either upstream call fails. No retry is attempted.
    #[instrument(
        skip(self, request),
        fields(
            project_id = %request.project_id,
            team_id = %request.team_id,
            iteration = %request.iteration
        )
    )]
    pub async fn resolve_member_work_items(
        &self,
        request: &MemberWorkItemsRequest,
    ) -> RelayResult<Vec<WorkItem>> {
        request.validate()?;

        let mut stage = ResolutionStage::AwaitingIds;
        let wiql = self
            .api
            .query_work_items_by_wiql(
                &request.project_id,
                &request.team_id,
                &request.member_email,
                &request.iteration,
            )
            .await
            .inspect_err(|e| warn!(stage = stage.as_str(), error = %e, "work item query failed"))?;

        let ids = wiql.ids();
        if ids.is_empty() {
            debug!("query matched no work items, skipping detail fetch");
            return Ok(Vec::new());
        }

        stage = ResolutionStage::AwaitingDetails;
        let items = self
            .api
            .fetch_work_item_details(&request.project_id, &ids)
            .await
            .inspect_err(|e| {
                warn!(
                    stage = stage.as_str(),
                    requested = ids.len(),
                    error = %e,
                    "work item detail fetch failed"
                );
            })?;

        if items.len() != ids.len() {
            warn!(
                requested = ids.len(),
                returned = items.len(),
                "detail fetch returned a different number of work items than requested"
            );
        }
        info!(count = items.len(), "resolved member work items");
        Ok(items)
    }
}
