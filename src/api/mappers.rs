//! Conversions from raw Azure DevOps payloads to the client-facing models.
//!
//! Every mapping is total: whatever passed deserialization maps without
//! further failure.

use super::wire;
use crate::models::{
    Assignee, Iteration, Member, Project, Team, WiqlQueryResult, WorkItem, WorkItemReference,
};

impl From<wire::TeamProjectReference> for Project {
    fn from(p: wire::TeamProjectReference) -> Self {
        Project {
            id: p.id,
            name: p.name,
            description: p.description,
            state: p.state,
        }
    }
}

impl From<wire::WebApiTeam> for Team {
    fn from(t: wire::WebApiTeam) -> Self {
        Team {
            id: t.id,
            name: t.name,
            description: t.description,
            project_id: t.project_id,
        }
    }
}

impl From<wire::TeamMember> for Member {
    fn from(m: wire::TeamMember) -> Self {
        Member {
            id: m.identity.id,
            display_name: m.identity.display_name,
            unique_name: m.identity.unique_name,
            image_url: m.identity.image_url,
            is_team_admin: m.is_team_admin,
        }
    }
}

impl From<wire::TeamSettingsIteration> for Iteration {
    fn from(i: wire::TeamSettingsIteration) -> Self {
        Iteration {
            id: i.id,
            name: i.name,
            path: i.path,
            start_date: i.attributes.start_date,
            finish_date: i.attributes.finish_date,
            time_frame: i.attributes.time_frame,
        }
    }
}

impl From<wire::WorkItemQueryResult> for WiqlQueryResult {
    fn from(r: wire::WorkItemQueryResult) -> Self {
        WiqlQueryResult {
            work_items: r
                .work_items
                .into_iter()
                .map(|w| WorkItemReference { id: w.id })
                .collect(),
        }
    }
}

impl From<wire::WorkItem> for WorkItem {
    fn from(wi: wire::WorkItem) -> Self {
        let fields = wi.fields;
        WorkItem {
            id: wi.id,
            rev: wi.rev,
            title: fields.title,
            state: fields.state,
            work_item_type: fields.work_item_type,
            assigned_to: fields.assigned_to.map(|identity| Assignee {
                display_name: identity.display_name,
                unique_name: identity.unique_name,
            }),
            iteration_path: fields.iteration_path,
            area_path: fields.area_path,
            description: fields.description,
            original_estimate: fields.original_estimate,
            remaining_work: fields.remaining_work,
            completed_work: fields.completed_work,
            story_points: fields.story_points,
            url: wi.url,
        }
    }
}

/// Maps every element of an Azure DevOps list envelope.
pub(crate) fn map_list<T, U: From<T>>(list: wire::ListResponse<T>) -> Vec<U> {
    list.value.into_iter().map(U::from).collect()
}
