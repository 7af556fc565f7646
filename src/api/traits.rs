//! Traits for Azure DevOps API operations.
//!
//! These traits abstract the upstream calls the relay makes so that the
//! work-item interactor and the HTTP handlers can run against mocks in tests.

use async_trait::async_trait;

use super::client::AzureDevOpsClient;
use crate::error::RelayResult;
use crate::models::{Iteration, Member, Project, Team, WiqlQueryResult, WorkItem};

/// Trait for project-level operations.
#[async_trait]
pub trait ProjectOperations: Send + Sync {
    /// Lists the projects of the organization.
    async fn projects(&self) -> RelayResult<Vec<Project>>;

    /// Lists the teams of a project.
    async fn project_teams(&self, project_id: &str) -> RelayResult<Vec<Team>>;
}

/// Trait for team-scoped operations.
#[async_trait]
pub trait TeamOperations: Send + Sync {
    /// Lists the members of a team.
    async fn team_members(&self, project_id: &str, team_id: &str)
    -> RelayResult<Vec<Member>>;

    /// Lists the iterations configured for a team.
    async fn team_iterations(
        &self,
        project_id: &str,
        team_id: &str,
    ) -> RelayResult<Vec<Iteration>>;
}

/// Trait for the two work item calls behind member work-item resolution.
#[async_trait]
pub trait WorkItemOperations: Send + Sync {
    /// Runs the WIQL query for the work items assigned to `member_email`
    /// in `iteration`, scoped to the given team.
    ///
    /// # Arguments
    ///
    /// * `project_id` - Project id or name
    /// * `team_id` - Team id or name
    /// * `member_email` - Assignee login
    /// * `iteration` - Full iteration path
    async fn query_work_items_by_wiql(
        &self,
        project_id: &str,
        team_id: &str,
        member_email: &str,
        iteration: &str,
    ) -> RelayResult<WiqlQueryResult>;

    /// Fetches full work items for exactly `ids`.
    async fn fetch_work_item_details(
        &self,
        project_id: &str,
        ids: &[i32],
    ) -> RelayResult<Vec<WorkItem>>;
}

/// Combined trait for every operation the relay forwards.
pub trait DevOpsOperations: ProjectOperations + TeamOperations + WorkItemOperations {}

impl<T> DevOpsOperations for T where T: ProjectOperations + TeamOperations + WorkItemOperations {}

#[async_trait]
impl ProjectOperations for AzureDevOpsClient {
    async fn projects(&self) -> RelayResult<Vec<Project>> {
        Ok(self.projects_client().list().await?)
    }

    async fn project_teams(&self, project_id: &str) -> RelayResult<Vec<Team>> {
        Ok(self.projects_client().teams(project_id).await?)
    }
}

#[async_trait]
impl TeamOperations for AzureDevOpsClient {
    async fn team_members(
        &self,
        project_id: &str,
        team_id: &str,
    ) -> RelayResult<Vec<Member>> {
        Ok(self.teams_client().members(project_id, team_id).await?)
    }

    async fn team_iterations(
        &self,
        project_id: &str,
        team_id: &str,
    ) -> RelayResult<Vec<Iteration>> {
        Ok(self.teams_client().iterations(project_id, team_id).await?)
    }
}

#[async_trait]
impl WorkItemOperations for AzureDevOpsClient {
    async fn query_work_items_by_wiql(
        &self,
        project_id: &str,
        team_id: &str,
        member_email: &str,
        iteration: &str,
    ) -> RelayResult<WiqlQueryResult> {
        self.work_items_client()
            .query_by_wiql(project_id, team_id, member_email, iteration)
            .await
    }

    async fn fetch_work_item_details(
        &self,
        project_id: &str,
        ids: &[i32],
    ) -> RelayResult<Vec<WorkItem>> {
        Ok(self.work_items_client().list(project_id, ids).await?)
    }
}

#[cfg(test)]
pub mod mocks {
    //! Recording mock of the Azure DevOps operations.

    use super::*;
    use crate::error::ApiError;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Canned result of a mocked call. Responses are cloned on every call,
    /// so one setting serves repeated requests.
    #[derive(Debug, Clone)]
    pub enum MockResponse<T> {
        Ok(T),
        /// Upstream answered with this non-success HTTP status.
        UpstreamStatus(u16),
    }

    impl<T: Clone> MockResponse<T> {
        fn to_result(&self, resource: &str) -> RelayResult<T> {
            match self {
                MockResponse::Ok(value) => Ok(value.clone()),
                MockResponse::UpstreamStatus(status) => Err(ApiError::from_status(
                    *status,
                    resource,
                    format!("mock upstream status {}", status),
                )
                .into()),
            }
        }
    }

    /// Arguments of one `query_work_items_by_wiql` call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct WiqlCall {
        pub project_id: String,
        pub team_id: String,
        pub member_email: String,
        pub iteration: String,
    }

    /// Arguments of one `fetch_work_item_details` call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DetailsCall {
        pub project_id: String,
        pub ids: Vec<i32>,
    }

    type Slot<T> = Arc<Mutex<Option<MockResponse<T>>>>;

    /// Mock implementation of every relay operation.
    ///
    /// Unset responses default to empty successful results.
    #[derive(Default, Clone)]
    pub struct MockDevOps {
        pub projects_response: Slot<Vec<Project>>,
        pub teams_response: Slot<Vec<Team>>,
        pub members_response: Slot<Vec<Member>>,
        pub iterations_response: Slot<Vec<Iteration>>,
        pub wiql_response: Slot<WiqlQueryResult>,
        pub details_response: Slot<Vec<WorkItem>>,
        /// Track WIQL calls.
        pub wiql_calls: Arc<Mutex<Vec<WiqlCall>>>,
        /// Track detail fetch calls.
        pub details_calls: Arc<Mutex<Vec<DetailsCall>>>,
        /// Track how many list calls were made, WIQL and detail calls excluded.
        pub list_calls: Arc<Mutex<usize>>,
    }

    async fn respond<T: Clone + Default>(slot: &Slot<T>, resource: &str) -> RelayResult<T> {
        match slot.lock().await.as_ref() {
            Some(response) => response.to_result(resource),
            None => Ok(T::default()),
        }
    }

    impl MockDevOps {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn set_projects_response(&self, response: MockResponse<Vec<Project>>) {
            *self.projects_response.lock().await = Some(response);
        }

        pub async fn set_teams_response(&self, response: MockResponse<Vec<Team>>) {
            *self.teams_response.lock().await = Some(response);
        }

        pub async fn set_members_response(&self, response: MockResponse<Vec<Member>>) {
            *self.members_response.lock().await = Some(response);
        }

        pub async fn set_iterations_response(&self, response: MockResponse<Vec<Iteration>>) {
            *self.iterations_response.lock().await = Some(response);
        }

        pub async fn set_wiql_response(&self, response: MockResponse<WiqlQueryResult>) {
            *self.wiql_response.lock().await = Some(response);
        }

        pub async fn set_details_response(&self, response: MockResponse<Vec<WorkItem>>) {
            *self.details_response.lock().await = Some(response);
        }

        pub async fn wiql_calls(&self) -> Vec<WiqlCall> {
            self.wiql_calls.lock().await.clone()
        }

        pub async fn details_calls(&self) -> Vec<DetailsCall> {
            self.details_calls.lock().await.clone()
        }

        pub async fn list_calls(&self) -> usize {
            *self.list_calls.lock().await
        }

        async fn record_list_call(&self) {
            *self.list_calls.lock().await += 1;
        }
    }

    #[async_trait]
    impl ProjectOperations for MockDevOps {
        async fn projects(&self) -> RelayResult<Vec<Project>> {
            self.record_list_call().await;
            respond(&self.projects_response, "projects").await
        }

        async fn project_teams(&self, _project_id: &str) -> RelayResult<Vec<Team>> {
            self.record_list_call().await;
            respond(&self.teams_response, "teams").await
        }
    }

    #[async_trait]
    impl TeamOperations for MockDevOps {
        async fn team_members(
            &self,
            _project_id: &str,
            _team_id: &str,
        ) -> RelayResult<Vec<Member>> {
            self.record_list_call().await;
            respond(&self.members_response, "members").await
        }

        async fn team_iterations(
            &self,
            _project_id: &str,
            _team_id: &str,
        ) -> RelayResult<Vec<Iteration>> {
            self.record_list_call().await;
            respond(&self.iterations_response, "iterations").await
        }
    }

    #[async_trait]
    impl WorkItemOperations for MockDevOps {
        async fn query_work_items_by_wiql(
            &self,
            project_id: &str,
            team_id: &str,
            member_email: &str,
            iteration: &str,
        ) -> RelayResult<WiqlQueryResult> {
            self.wiql_calls.lock().await.push(WiqlCall {
                project_id: project_id.to_string(),
                team_id: team_id.to_string(),
                member_email: member_email.to_string(),
                iteration: iteration.to_string(),
            });
            respond(&self.wiql_response, "wiql query").await
        }

        async fn fetch_work_item_details(
            &self,
            project_id: &str,
            ids: &[i32],
        ) -> RelayResult<Vec<WorkItem>> {
            self.details_calls.lock().await.push(DetailsCall {
                project_id: project_id.to_string(),
                ids: ids.to_vec(),
            });
            respond(&self.details_response, "work items").await
        }
    }
}
