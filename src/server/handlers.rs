//! Request handlers for the `/v1/azure` surface and the health check.
//!
//! Query parameters are all optional at the extractor level so that missing
//! ones are reported by name with a `{code, message}` body, rather than by
//! axum's plain-text query rejection.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::ErrorBody;
use super::state::AppState;
use crate::core::{MemberWorkItemsRequest, WorkItemInteractor, require_params};
use crate::error::RelayResult;
use crate::models::{Iteration, Member, Project, Team, WorkItem};

/// `?projectId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    pub project_id: Option<String>,
}

/// `?projectId=&teamId=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamQuery {
    pub project_id: Option<String>,
    pub team_id: Option<String>,
}

/// `?projectId=&teamId=&iteration=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemsQuery {
    pub project_id: Option<String>,
    pub team_id: Option<String>,
    /// Full iteration path, as listed by `/teams/iterations/list`.
    pub iteration: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        build: crate::BUILD_HASH.to_string(),
    })
}

/// GET /v1/azure/projects/list
#[instrument(skip_all)]
pub async fn list_projects(State(state): State<AppState>) -> RelayResult<Json<Vec<Project>>> {
    Ok(Json(state.api().projects().await?))
}

/// GET /v1/azure/teams/list?projectId=
#[instrument(skip_all, fields(project_id = query.project_id.as_deref()))]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> RelayResult<Json<Vec<Team>>> {
    require_params(&[("projectId", query.project_id.as_deref())])?;
    let project_id = query.project_id.unwrap_or_default();

    Ok(Json(state.api().project_teams(&project_id).await?))
}

/// GET /v1/azure/teams/members/list?projectId=&teamId=
#[instrument(
    skip_all,
    fields(project_id = query.project_id.as_deref(), team_id = query.team_id.as_deref())
)]
pub async fn list_team_members(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> RelayResult<Json<Vec<Member>>> {
    let (project_id, team_id) = team_params(query)?;
    Ok(Json(state.api().team_members(&project_id, &team_id).await?))
}

/// GET /v1/azure/teams/iterations/list?projectId=&teamId=
#[instrument(
    skip_all,
    fields(project_id = query.project_id.as_deref(), team_id = query.team_id.as_deref())
)]
pub async fn list_team_iterations(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> RelayResult<Json<Vec<Iteration>>> {
    let (project_id, team_id) = team_params(query)?;
    Ok(Json(
        state.api().team_iterations(&project_id, &team_id).await?,
    ))
}

/// GET /v1/azure/members/{memberId}/workItems?projectId=&teamId=&iteration=
///
/// Also served at `.../workItems/list`.
pub async fn member_work_items(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Query(query): Query<WorkItemsQuery>,
) -> RelayResult<Json<Vec<WorkItem>>> {
    let request = MemberWorkItemsRequest::new(
        query.project_id.unwrap_or_default(),
        query.team_id.unwrap_or_default(),
        member_id,
        query.iteration.unwrap_or_default(),
    );

    let items = WorkItemInteractor::new(state.api())
        .resolve_member_work_items(&request)
        .await?;
    Ok(Json(items))
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    ErrorBody::new(StatusCode::NOT_FOUND, "Not found").into_response_with(StatusCode::NOT_FOUND)
}

fn team_params(query: TeamQuery) -> RelayResult<(String, String)> {
    require_params(&[
        ("projectId", query.project_id.as_deref()),
        ("teamId", query.team_id.as_deref()),
    ])?;
    Ok((
        query.project_id.unwrap_or_default(),
        query.team_id.unwrap_or_default(),
    ))
}
