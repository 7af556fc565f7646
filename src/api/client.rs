//! Azure DevOps REST client.
//!
//! One `reqwest::Client` is built at startup with the PAT credential and the
//! upstream timeout baked into it. Resource groups are reached through
//! lightweight borrowing sub-clients, in the manner of the official SDK:
//!
//! ```rust,no_run
//! use devops_relay::AzureDevOpsClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AzureDevOpsClient::new("my-org".to_string(), "my-pat".to_string())?;
//! let projects = client.projects_client().list().await?;
//! let teams = client.projects_client().teams(&projects[0].id).await?;
//! println!("{} has {} teams", projects[0].name, teams.len());
//! # Ok(())
//! # }
//! ```

use reqwest::{
    Client, RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::credential::PatCredential;
use super::mappers::map_list;
use super::wiql::member_iteration_query;
use super::wire::{self, ListResponse, WORK_ITEM_FIELDS};
use crate::config::{ApiVersions, RelayConfig};
use crate::error::{ApiError, RelayResult};
use crate::models::{Iteration, Member, Project, Team, WiqlQueryResult, WorkItem};

/// Public Azure DevOps Services endpoint.
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com/";

/// Upstream timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings for [`AzureDevOpsClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub api_versions: ApiVersions,
}

impl ClientOptions {
    /// Options for `base_url` with the default timeout and api-versions.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            api_versions: ApiVersions::default(),
        }
    }
}

/// Azure DevOps API client scoped to one organization.
#[derive(Clone)]
pub struct AzureDevOpsClient {
    http: Client,
    base_url: Url,
    organization: String,
    api_versions: ApiVersions,
}

impl AzureDevOpsClient {
    /// Creates a client for the public Azure DevOps endpoint.
    ///
    /// # Security
    ///
    /// The PAT is wrapped in a SecretString internally and only exposed
    /// when the Authorization header is built.
    pub fn new(organization: String, pat: String) -> Result<Self, ApiError> {
        let base_url = Url::parse(DEFAULT_BASE_URL).map_err(|e| ApiError::InvalidUrl {
            message: e.to_string(),
        })?;
        Self::new_with_secret(organization, SecretString::from(pat), ClientOptions::new(base_url))
    }

    /// Creates a client from resolved relay configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ApiError> {
        Self::new_with_secret(
            config.organization.clone(),
            config.pat.clone(),
            ClientOptions {
                base_url: config.base_url.clone(),
                request_timeout: config.request_timeout,
                api_versions: config.api_versions.clone(),
            },
        )
    }

    /// Creates a client with a SecretString PAT and explicit transport options.
    pub fn new_with_secret(
        organization: String,
        pat: SecretString,
        options: ClientOptions,
    ) -> Result<Self, ApiError> {
        let credential = PatCredential::new(pat);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credential.authorization_header()?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: options.base_url,
            organization,
            api_versions: options.api_versions,
        })
    }

    /// Returns the organization name.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the REST endpoint requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Project-level resources.
    pub fn projects_client(&self) -> ProjectsClient<'_> {
        ProjectsClient { client: self }
    }

    /// Team-level resources.
    pub fn teams_client(&self) -> TeamsClient<'_> {
        TeamsClient { client: self }
    }

    /// Work item tracking resources.
    pub fn work_items_client(&self) -> WorkItemsClient<'_> {
        WorkItemsClient { client: self }
    }

    /// Builds `{base}/{organization}/{segments...}?api-version=...`.
    ///
    /// Segments are percent-encoded individually, so identifiers supplied by
    /// clients can never introduce extra path components.
    fn endpoint(&self, segments: &[&str], api_version: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .push(&self.organization)
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    /// Sends a request and decodes a successful JSON body.
    ///
    /// Upstream status and body are logged here and carried in the error,
    /// which callers must not forward to clients.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .inspect_err(|e| {
                warn!(resource, error = %e, "Azure DevOps request failed to complete");
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                resource,
                status = status.as_u16(),
                body = %body,
                "Azure DevOps returned an error"
            );
            return Err(ApiError::from_status(status.as_u16(), resource, body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(resource, error = %e, "unexpected Azure DevOps response shape");
            ApiError::ParseError {
                message: format!("{}: {}", resource, e),
            }
        })
    }
}

/// `_apis/projects` resources.
pub struct ProjectsClient<'a> {
    client: &'a AzureDevOpsClient,
}

impl ProjectsClient<'_> {
    /// Lists the projects of the organization.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        let c = self.client;
        let url = c.endpoint(&["_apis", "projects"], &c.api_versions.projects)?;
        let list: ListResponse<wire::TeamProjectReference> =
            c.send(c.http.get(url), "projects").await?;
        Ok(map_list(list))
    }

    /// Lists the teams of a project.
    #[instrument(skip(self))]
    pub async fn teams(&self, project_id: &str) -> Result<Vec<Team>, ApiError> {
        let c = self.client;
        let url = c.endpoint(
            &["_apis", "projects", project_id, "teams"],
            &c.api_versions.teams,
        )?;
        let resource = format!("teams of project '{}'", project_id);
        let list: ListResponse<wire::WebApiTeam> = c.send(c.http.get(url), &resource).await?;
        Ok(map_list(list))
    }
}

/// Team-scoped resources.
pub struct TeamsClient<'a> {
    client: &'a AzureDevOpsClient,
}

impl TeamsClient<'_> {
    /// Lists the members of a team.
    #[instrument(skip(self))]
    pub async fn members(&self, project_id: &str, team_id: &str) -> Result<Vec<Member>, ApiError> {
        let c = self.client;
        let url = c.endpoint(
            &["_apis", "projects", project_id, "teams", team_id, "members"],
            &c.api_versions.members,
        )?;
        let resource = format!("members of team '{}'", team_id);
        let list: ListResponse<wire::TeamMember> = c.send(c.http.get(url), &resource).await?;
        Ok(map_list(list))
    }

    /// Lists the iterations configured for a team.
    #[instrument(skip(self))]
    pub async fn iterations(
        &self,
        project_id: &str,
        team_id: &str,
    ) -> Result<Vec<Iteration>, ApiError> {
        let c = self.client;
        let url = c.endpoint(
            &[project_id, team_id, "_apis", "work", "teamsettings", "iterations"],
            &c.api_versions.iterations,
        )?;
        let resource = format!("iterations of team '{}'", team_id);
        let list: ListResponse<wire::TeamSettingsIteration> =
            c.send(c.http.get(url), &resource).await?;
        Ok(map_list(list))
    }
}

/// Work item tracking resources.
pub struct WorkItemsClient<'a> {
    client: &'a AzureDevOpsClient,
}

impl WorkItemsClient<'_> {
    /// Runs the member/iteration WIQL query on the team-scoped WIQL route
    /// and returns the matching IDs.
    #[instrument(skip(self, member_email))]
    pub async fn query_by_wiql(
        &self,
        project_id: &str,
        team_id: &str,
        member_email: &str,
        iteration: &str,
    ) -> RelayResult<WiqlQueryResult> {
        let query = member_iteration_query(member_email, iteration)?;
        let c = self.client;
        let url = c.endpoint(
            &[project_id, team_id, "_apis", "wit", "wiql"],
            &c.api_versions.wiql,
        )?;

        let raw: wire::WorkItemQueryResult = c
            .send(
                c.http.post(url).json(&wire::Wiql { query: &query }),
                "wiql query",
            )
            .await?;
        let result = WiqlQueryResult::from(raw);
        debug!(matched = result.work_items.len(), "wiql query completed");
        Ok(result)
    }

    /// Fetches full work items for `ids` in a single batch request.
    ///
    /// An empty `ids` slice returns immediately without contacting Azure
    /// DevOps, which rejects an empty `ids` parameter. Azure DevOps also
    /// rejects more than 200 IDs per call; the IDs are not split into
    /// several requests, so such a call fails as [`ApiError::RequestFailed`].
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn list(&self, project_id: &str, ids: &[i32]) -> Result<Vec<WorkItem>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let c = self.client;
        let mut url = c.endpoint(
            &[project_id, "_apis", "wit", "workitems"],
            &c.api_versions.work_items,
        )?;
        let ids_param = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut()
            .append_pair("ids", &ids_param)
            .append_pair("fields", &WORK_ITEM_FIELDS.join(","));

        let list: ListResponse<wire::WorkItem> = c.send(c.http.get(url), "work items").await?;
        Ok(map_list(list))
    }
}
