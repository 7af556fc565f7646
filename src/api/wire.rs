//! Raw Azure DevOps payloads.
//!
//! Only the fields the relay uses are declared. Fields that are always
//! present upstream are non-optional so a response missing them fails to
//! deserialize instead of being silently defaulted. Additional upstream
//! fields are ignored because Azure DevOps adds fields across api-versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope used by every Azure DevOps list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub(crate) value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeamProjectReference {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WebApiTeam {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdentityRef {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) unique_name: String,
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeamMember {
    pub(crate) identity: IdentityRef,
    /// Azure DevOps only emits this flag for administrators.
    #[serde(default)]
    pub(crate) is_team_admin: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeamSettingsIteration {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) attributes: TeamIterationAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeamIterationAttributes {
    pub(crate) start_date: Option<DateTime<Utc>>,
    pub(crate) finish_date: Option<DateTime<Utc>>,
    pub(crate) time_frame: Option<String>,
}

/// Body of a WIQL request.
#[derive(Debug, Serialize)]
pub(crate) struct Wiql<'a> {
    pub(crate) query: &'a str,
}

/// Flat WIQL query result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkItemQueryResult {
    pub(crate) work_items: Vec<WorkItemReference>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemReference {
    pub(crate) id: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkItem {
    pub(crate) id: i32,
    pub(crate) rev: i32,
    pub(crate) fields: WorkItemFields,
    pub(crate) url: String,
}

/// Work item fields requested from the batch endpoint. Azure DevOps omits
/// fields that have no value, hence the options.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemFields {
    #[serde(rename = "System.Title")]
    pub(crate) title: String,
    #[serde(rename = "System.State")]
    pub(crate) state: String,
    #[serde(rename = "System.WorkItemType")]
    pub(crate) work_item_type: String,
    #[serde(rename = "System.AssignedTo")]
    pub(crate) assigned_to: Option<IdentityRef>,
    #[serde(rename = "System.IterationPath")]
    pub(crate) iteration_path: Option<String>,
    #[serde(rename = "System.AreaPath")]
    pub(crate) area_path: Option<String>,
    #[serde(rename = "System.Description")]
    pub(crate) description: Option<String>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.OriginalEstimate")]
    pub(crate) original_estimate: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.RemainingWork")]
    pub(crate) remaining_work: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.CompletedWork")]
    pub(crate) completed_work: Option<f64>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.StoryPoints")]
    pub(crate) story_points: Option<f64>,
}

/// Field list sent with the batch request; must stay in sync with
/// [`WorkItemFields`].
pub(crate) const WORK_ITEM_FIELDS: &[&str] = &[
    "System.Title",
    "System.State",
    "System.WorkItemType",
    "System.AssignedTo",
    "System.IterationPath",
    "System.AreaPath",
    "System.Description",
    "Microsoft.VSTS.Scheduling.OriginalEstimate",
    "Microsoft.VSTS.Scheduling.RemainingWork",
    "Microsoft.VSTS.Scheduling.CompletedWork",
    "Microsoft.VSTS.Scheduling.StoryPoints",
];
