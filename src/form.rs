//! Task form data, validation and field-level edit rights.
//!
//! The same form backs the TUI modal and the `add`/`update` commands, so
//! both refuse an empty title or a past due date before any request is made.

use std::collections::BTreeSet;

use chrono::{DateTime, Local, Utc};

use crate::config::Session;
use crate::error::FormError;
use crate::fields::{Status, Tag};
use crate::task::{NewTask, ProjectId, Task, TaskId, TaskPatch, UserId};
use crate::util::{format_due_input, parse_due_input};

/// Which fields the current user may change.
///
/// Status is always editable. Title, description, due date, tags and
/// assignees require authorship or a privileged role. The backend remains
/// the authority; this only decides what the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRights {
    pub details: bool,
}

impl EditRights {
    pub const FULL: EditRights = EditRights { details: true };
    pub const STATUS_ONLY: EditRights = EditRights { details: false };

    /// Rights of `session` over `task`; `None` means a task being created.
    pub fn for_task(session: Option<&Session>, task: Option<&Task>) -> Self {
        let task = match task {
            None => return Self::FULL,
            Some(t) => t,
        };
        match session {
            Some(s) if s.is_privileged() || s.user_id == task.created_by_id => Self::FULL,
            _ => Self::STATUS_ONLY,
        }
    }
}

/// Raw form contents, as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFormData {
    /// Task being edited, or `None` when creating.
    pub task_id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub tags: BTreeSet<Tag>,
    /// Due date as typed; empty means no due date.
    pub due: String,
    pub assignees: BTreeSet<UserId>,
}

impl TaskFormData {
    /// An empty form for a new task with the given initial status.
    pub fn new(status: Status) -> Self {
        TaskFormData {
            task_id: None,
            title: String::new(),
            description: String::new(),
            status,
            tags: BTreeSet::new(),
            due: String::new(),
            assignees: BTreeSet::new(),
        }
    }

    /// A form pre-filled from an existing task.
    pub fn from_task(task: &Task) -> Self {
        TaskFormData {
            task_id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            tags: task.tags.clone(),
            due: format_due_input(task.due_date),
            assignees: task.assignee_ids(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.task_id.is_some()
    }

    fn checked_title(&self) -> Result<String, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::TitleRequired);
        }
        Ok(title.to_string())
    }

    fn description(&self) -> Option<String> {
        let d = self.description.trim();
        if d.is_empty() {
            None
        } else {
            Some(d.to_string())
        }
    }

    /// Parse the due field and refuse instants before `now`.
    pub fn checked_due(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, FormError> {
        if self.due.trim().is_empty() {
            return Ok(None);
        }
        let today = now.with_timezone(&Local).date_naive();
        let due = parse_due_input(&self.due, today)
            .ok_or_else(|| FormError::InvalidDue(self.due.trim().to_string()))?;
        if due < now {
            return Err(FormError::DueInPast);
        }
        Ok(Some(due))
    }

    /// Build the create request body.
    pub fn to_new_task(&self, project_id: ProjectId, now: DateTime<Utc>) -> Result<NewTask, FormError> {
        let title = self.checked_title()?;
        let due_date = self.checked_due(now)?;
        Ok(NewTask {
            title,
            description: self.description(),
            status: self.status,
            tags: self.tags.clone(),
            due_date,
            project_id,
            assignee_ids: self.assignees.clone(),
        })
    }

    /// Build the update request body against the task as it was loaded.
    ///
    /// Locked fields are left out. An unchanged due date is not re-checked,
    /// so an overdue task can still have its other fields edited.
    pub fn to_patch(&self, original: &Task, rights: EditRights, now: DateTime<Utc>) -> Result<TaskPatch, FormError> {
        let mut patch = TaskPatch::status_only(self.status);
        if !rights.details {
            return Ok(patch);
        }

        patch.title = Some(self.checked_title()?);
        patch.description = Some(self.description());
        patch.tags = Some(self.tags.clone());
        patch.assignee_ids = Some(self.assignees.clone());

        if self.due.trim() != format_due_input(original.due_date) {
            patch.due_date = Some(self.checked_due(now)?);
        }
        Ok(patch)
    }

    /// Toggle a tag in the set.
    pub fn toggle_tag(&mut self, tag: Tag) {
        if !self.tags.remove(&tag) {
            self.tags.insert(tag);
        }
    }

    /// Toggle an assignee in the set.
    pub fn toggle_assignee(&mut self, user: UserId) {
        if !self.assignees.remove(&user) {
            self.assignees.insert(user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn task(created_by: UserId) -> Task {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Task {
            id: 5,
            title: "Contribution export".into(),
            description: Some("CSV for treasurers".into()),
            status: Status::Open,
            tags: [Tag::Backend].into_iter().collect(),
            due_date: Some(at),
            project_id: 1,
            created_by_id: created_by,
            assignees: vec![],
            created_at: at,
            updated_at: at,
        }
    }

    fn session(id: UserId, roles: &[&str]) -> Session {
        Session {
            user_id: id,
            username: "u".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_title_is_refused() {
        let form = TaskFormData::new(Status::Backlog);
        let err = form.to_new_task(1, Utc::now()).unwrap_err();
        assert!(matches!(err, FormError::TitleRequired));
    }

    #[test]
    fn test_yesterday_is_refused() {
        let mut form = TaskFormData::new(Status::Backlog);
        form.title = "Audit log viewer".into();
        form.due = "yesterday".into();
        let err = form.to_new_task(1, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Due date cannot be in the past");
    }

    #[test]
    fn test_past_instant_today_is_refused() {
        let now = Utc::now();
        let mut form = TaskFormData::new(Status::Open);
        form.title = "x".into();
        form.due = (now - Duration::minutes(5)).to_rfc3339();
        assert!(matches!(form.checked_due(now), Err(FormError::DueInPast)));
        form.due = (now + Duration::minutes(5)).to_rfc3339();
        assert!(form.checked_due(now).unwrap().is_some());
    }

    #[test]
    fn test_today_and_garbage() {
        let mut form = TaskFormData::new(Status::Open);
        form.due = "today".into();
        assert!(form.checked_due(Utc::now()).unwrap().is_some());
        form.due = "whenever".into();
        assert!(matches!(form.checked_due(Utc::now()), Err(FormError::InvalidDue(_))));
    }

    #[test]
    fn test_out_of_range_due_is_invalid() {
        let mut form = TaskFormData::new(Status::Open);
        form.title = "Parish census".into();
        form.due = "in 100000000d".into();
        assert!(matches!(form.checked_due(Utc::now()), Err(FormError::InvalidDue(_))));
        let err = form.to_new_task(1, Utc::now()).unwrap_err();
        assert!(err.is_client_side());
    }

    #[test]
    fn test_new_task_body() {
        let mut form = TaskFormData::new(Status::Backlog);
        form.title = "  Event calendar  ".into();
        form.toggle_tag(Tag::Frontend);
        form.toggle_tag(Tag::Design);
        form.toggle_tag(Tag::Design);
        form.toggle_assignee(11);
        let body = form.to_new_task(3, Utc::now()).unwrap();
        assert_eq!(body.title, "Event calendar");
        assert_eq!(body.description, None);
        assert_eq!(body.tags, [Tag::Frontend].into_iter().collect());
        assert_eq!(body.project_id, 3);
        assert_eq!(body.assignee_ids, [11].into_iter().collect());
    }

    #[test]
    fn test_edit_rights() {
        let t = task(10);
        assert_eq!(EditRights::for_task(None, None), EditRights::FULL);
        assert_eq!(EditRights::for_task(Some(&session(10, &[])), Some(&t)), EditRights::FULL);
        assert_eq!(EditRights::for_task(Some(&session(12, &["ADMIN"])), Some(&t)), EditRights::FULL);
        assert_eq!(EditRights::for_task(Some(&session(12, &["DEVELOPER"])), Some(&t)), EditRights::STATUS_ONLY);
        assert_eq!(EditRights::for_task(None, Some(&t)), EditRights::STATUS_ONLY);
    }

    #[test]
    fn test_locked_patch_only_carries_status() {
        let t = task(10);
        let mut form = TaskFormData::from_task(&t);
        form.title = "Renamed".into();
        form.status = Status::OnHold;
        let patch = form.to_patch(&t, EditRights::STATUS_ONLY, Utc::now()).unwrap();
        assert_eq!(patch, TaskPatch::status_only(Status::OnHold));
    }

    #[test]
    fn test_unchanged_overdue_date_is_not_rechecked() {
        let t = task(10);
        let form = TaskFormData::from_task(&t);
        let patch = form.to_patch(&t, EditRights::FULL, Utc::now()).unwrap();
        assert_eq!(patch.due_date, None);
        assert_eq!(patch.title.as_deref(), Some("Contribution export"));
    }

    #[test]
    fn test_clearing_due_date() {
        let t = task(10);
        let mut form = TaskFormData::from_task(&t);
        form.due.clear();
        let patch = form.to_patch(&t, EditRights::FULL, Utc::now()).unwrap();
        assert_eq!(patch.due_date, Some(None));
    }
}
