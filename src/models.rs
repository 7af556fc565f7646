use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for the relay server
#[derive(Parser, Clone, Debug, Default)]
#[command(
    name = "devops-relay",
    version,
    about = "Simplified REST relay in front of the Azure DevOps API"
)]
pub struct Args {
    // Azure DevOps Connection
    /// Azure DevOps organization name
    #[arg(short, long, help_heading = "Azure DevOps Connection")]
    pub organization: Option<String>,

    /// Personal Access Token for Azure DevOps API authentication
    #[arg(short = 't', long, help_heading = "Azure DevOps Connection")]
    pub pat: Option<String>,

    /// Azure DevOps REST endpoint [default: https://dev.azure.com/]
    #[arg(long, help_heading = "Azure DevOps Connection")]
    pub base_url: Option<String>,

    /// Timeout applied to every upstream request, in seconds [default: 30]
    #[arg(long, help_heading = "Azure DevOps Connection")]
    pub request_timeout_secs: Option<u64>,

    // Server
    /// Address to bind the HTTP server to [default: 0.0.0.0]
    #[arg(long, help_heading = "Server")]
    pub host: Option<String>,

    /// Port to bind the HTTP server to [default: 8080]
    #[arg(short, long, help_heading = "Server")]
    pub port: Option<u16>,

    // Configuration
    /// Path to a TOML configuration file
    #[arg(short, long, help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Write a sample configuration file and exit
    #[arg(long, help_heading = "Configuration")]
    pub create_config: bool,

    // Logging
    /// Log level: trace, debug, info, warn, error [default: info]
    #[arg(long, help_heading = "Logging")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, help_heading = "Logging")]
    pub log_file: Option<PathBuf>,

    /// Log format: text or json [default: text]
    #[arg(long, help_heading = "Logging")]
    pub log_format: Option<String>,
}

// ============================================================================
// Client-facing schema
// ============================================================================

/// A project of the configured organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub state: Option<String>,
}

/// A team inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
}

/// A member of a team. `unique_name` is the login, usually an email address,
/// and is what the work-item endpoint expects as `memberId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub unique_name: String,
    pub image_url: Option<String>,
    pub is_team_admin: bool,
}

/// A sprint configured for a team. `path` is the value the work-item
/// endpoint expects as `iteration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    pub id: String,
    pub name: String,
    pub path: String,
    pub start_date: Option<DateTime<Utc>>,
    pub finish_date: Option<DateTime<Utc>>,
    pub time_frame: Option<String>,
}

/// The person a work item is assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub display_name: String,
    pub unique_name: String,
}

/// Full work item record as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: i32,
    pub rev: i32,
    pub title: String,
    pub state: String,
    pub work_item_type: String,
    pub assigned_to: Option<Assignee>,
    pub iteration_path: Option<String>,
    pub area_path: Option<String>,
    pub description: Option<String>,
    pub original_estimate: Option<f64>,
    pub remaining_work: Option<f64>,
    pub completed_work: Option<f64>,
    pub story_points: Option<f64>,
    pub url: String,
}

// ============================================================================
// WIQL results
// ============================================================================

/// Minimal handle produced by a WIQL query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkItemReference {
    pub id: i32,
}

/// Result of the first resolution stage. Order is whatever the WIQL engine
/// produced and is not stable across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WiqlQueryResult {
    pub work_items: Vec<WorkItemReference>,
}

impl WiqlQueryResult {
    /// IDs in the order the query returned them.
    pub fn ids(&self) -> Vec<i32> {
        self.work_items.iter().map(|r| r.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.work_items.is_empty()
    }
}

impl FromIterator<i32> for WiqlQueryResult {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self {
            work_items: iter.into_iter().map(|id| WorkItemReference { id }).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// # Work Item Client Shape
    ///
    /// Tests the JSON shape of a work item as clients see it.
    ///
    /// ## Test Scenario
    /// - Serializes a work item with and without an assignee
    ///
    /// ## Expected Outcome
    /// - Keys are camelCase
    /// - Missing optional values serialize as null
    #[test]
    fn test_work_item_serializes_camel_case() {
        let item = WorkItem {
            id: 101,
            rev: 3,
            title: "Fix login".to_string(),
            state: "Active".to_string(),
            work_item_type: "Bug".to_string(),
            assigned_to: Some(Assignee {
                display_name: "Dana Dev".to_string(),
                unique_name: "dana@example.com".to_string(),
            }),
            iteration_path: Some("Relay\\Sprint 4".to_string()),
            area_path: None,
            description: None,
            original_estimate: None,
            remaining_work: Some(2.5),
            completed_work: None,
            story_points: None,
            url: "https://dev.azure.com/org/_apis/wit/workItems/101".to_string(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["workItemType"], json!("Bug"));
        assert_eq!(value["assignedTo"]["uniqueName"], json!("dana@example.com"));
        assert_eq!(value["iterationPath"], json!("Relay\\Sprint 4"));
        assert_eq!(value["remainingWork"], json!(2.5));
        assert_eq!(value["areaPath"], json!(null));
    }

    /// # WIQL Result IDs
    ///
    /// Tests extraction of IDs from a WIQL result.
    ///
    /// ## Test Scenario
    /// - Builds a result from IDs in a non-sorted order
    ///
    /// ## Expected Outcome
    /// - ids() returns them in the same order
    #[test]
    fn test_wiql_result_ids_keep_order() {
        let result: WiqlQueryResult = [205, 101, 7].into_iter().collect();
        assert_eq!(result.ids(), vec![205, 101, 7]);
        assert!(!result.is_empty());
        assert!(WiqlQueryResult::default().is_empty());
    }
}
