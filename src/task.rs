//! Task data structure and the request bodies that create or modify it.
//!
//! This module defines the `Task` record as the backend returns it, together
//! with the partial-update shapes the board sends back.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::*;

pub type TaskId = u64;
pub type UserId = u64;
pub type ProjectId = u64;

/// A reference to a user as embedded in task and project records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A unit of work tracked within a project.
///
/// A task belongs to exactly one project for its lifetime; nothing in this
/// crate ever changes `project_id` on an existing task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: ProjectId,
    pub created_by_id: UserId,
    #[serde(default)]
    pub assignees: Vec<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Ids of the assigned users.
    pub fn assignee_ids(&self) -> BTreeSet<UserId> {
        self.assignees.iter().map(|u| u.id).collect()
    }
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: Status,
    pub tags: BTreeSet<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: ProjectId,
    pub assignee_ids: BTreeSet<UserId>,
}

/// Body of a partial update. Absent fields are left untouched by the backend.
///
/// `due_date` distinguishes "leave alone" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<BTreeSet<UserId>>,
}

impl TaskPatch {
    /// A patch carrying only a new status, as sent by a board move.
    pub fn status_only(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_patch_serializes_only_status() {
        let body = serde_json::to_value(TaskPatch::status_only(Status::OnHold)).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ON_HOLD" }));
    }

    #[test]
    fn test_patch_can_clear_due_date() {
        let patch = TaskPatch {
            due_date: Some(None),
            ..Default::default()
        };
        let body = serde_json::to_value(patch).unwrap();
        assert_eq!(body, serde_json::json!({ "dueDate": null }));
    }

    #[test]
    fn test_task_decodes_camel_case() {
        let raw = serde_json::json!({
            "id": 7,
            "title": "Fix parish report totals",
            "status": "IN_PROGRESS",
            "tags": ["BACKEND", "QA", "BACKEND"],
            "dueDate": null,
            "projectId": 2,
            "createdById": 11,
            "assignees": [{ "id": 11, "name": "Ama" }],
            "createdAt": "2026-01-05T10:00:00Z",
            "updatedAt": "2026-01-06T10:00:00Z"
        });
        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.tags.len(), 2);
        assert_eq!(task.description, None);
        assert_eq!(task.assignee_ids().into_iter().collect::<Vec<_>>(), vec![11]);
    }
}
