//! Task form handling for the terminal user interface.
//!
//! This module provides `TaskForm`, the modal's editing state: text inputs,
//! the status selector and the tag and assignee pickers. It converts to and
//! from [`TaskFormData`], which carries validation.

use crate::{
    fields::{Status, Tag},
    form::{EditRights, TaskFormData},
    project::Project,
    task::{Task, TaskId, UserRef},
    tui::{enums::FormField, input::InputField},
};

/// Task form for the create/edit modal.
pub struct TaskForm {
    pub task_id: Option<TaskId>,
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub status: usize,
    /// Highlighted entry in the tag picker.
    pub tag_cursor: usize,
    /// Highlighted entry in the assignee picker.
    pub assignee_cursor: usize,
    pub current_field: FormField,
    pub rights: EditRights,
    /// Developers offered as assignees.
    pub roster: Vec<UserRef>,
    /// Last refusal, shown inside the modal until the next submit.
    pub error: Option<String>,
    data: TaskFormData,
}

impl TaskForm {
    /// Empty form for a new task in the given column.
    pub fn new(status: Status, project: Option<&Project>) -> Self {
        Self::from_data(TaskFormData::new(status), EditRights::FULL, project)
    }

    /// Form pre-filled from an existing task.
    pub fn from_task(task: &Task, rights: EditRights, project: Option<&Project>) -> Self {
        let mut form = Self::from_data(TaskFormData::from_task(task), rights, project);
        // Keep assignees that are no longer on the roster visible.
        for a in &task.assignees {
            if !form.roster.iter().any(|r| r.id == a.id) {
                form.roster.push(a.clone());
            }
        }
        form
    }

    fn from_data(data: TaskFormData, rights: EditRights, project: Option<&Project>) -> Self {
        TaskForm {
            task_id: data.task_id,
            title: InputField::with_value(&data.title),
            description: InputField::with_value(&data.description),
            due: InputField::with_value(&data.due),
            status: data.status.column(),
            tag_cursor: 0,
            assignee_cursor: 0,
            current_field: if rights.details { FormField::Title } else { FormField::Status },
            rights,
            roster: project.map(|p| p.developers.clone()).unwrap_or_default(),
            error: None,
            data,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.task_id.is_some()
    }

    /// Whether the user may change `field`.
    pub fn is_editable(&self, field: FormField) -> bool {
        self.rights.details || !field.is_detail()
    }

    pub fn selected_status(&self) -> Status {
        Status::from_column(self.status).unwrap_or_default()
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.data.tags.contains(&tag)
    }

    pub fn has_assignee(&self, user: &UserRef) -> bool {
        self.data.assignees.contains(&user.id)
    }

    /// Current contents as form data.
    pub fn to_data(&self) -> TaskFormData {
        let mut data = self.data.clone();
        data.title = self.title.value.clone();
        data.description = self.description.value.clone();
        data.due = self.due.value.clone();
        data.status = self.selected_status();
        data
    }

    pub fn next_field(&mut self) {
        self.current_field = self.current_field.next();
    }

    pub fn prev_field(&mut self) {
        self.current_field = self.current_field.prev();
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        if !self.is_editable(self.current_field) {
            return None;
        }
        match self.current_field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Due => Some(&mut self.due),
            _ => None,
        }
    }

    /// Handle character input. Space toggles the highlighted tag or assignee.
    pub fn handle_char(&mut self, c: char) {
        if let Some(input) = self.active_input() {
            input.handle_char(c);
            return;
        }
        if c == ' ' {
            self.toggle_highlighted();
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_delete();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        let step = |i: usize, len: usize| -> usize {
            if len == 0 {
                0
            } else if right {
                (i + 1) % len
            } else {
                (i + len - 1) % len
            }
        };
        match self.current_field {
            FormField::Status => self.status = step(self.status, Status::ALL.len()),
            FormField::Tags => self.tag_cursor = step(self.tag_cursor, Tag::ALL.len()),
            FormField::Assignees => self.assignee_cursor = step(self.assignee_cursor, self.roster.len()),
            _ => {
                if let Some(input) = self.active_input() {
                    if right { input.move_cursor_right() } else { input.move_cursor_left() }
                }
            }
        }
    }

    fn toggle_highlighted(&mut self) {
        if !self.is_editable(self.current_field) {
            return;
        }
        match self.current_field {
            FormField::Tags => {
                if let Some(&tag) = Tag::ALL.get(self.tag_cursor) {
                    self.data.toggle_tag(tag);
                }
            }
            FormField::Assignees => {
                if let Some(user) = self.roster.get(self.assignee_cursor) {
                    self.data.toggle_assignee(user.id);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn project() -> Project {
        Project {
            id: 1,
            name: "Parish Portal".into(),
            description: None,
            developers: vec![
                UserRef { id: 10, name: "Ama".into(), email: None },
                UserRef { id: 11, name: "Kwame".into(), email: None },
            ],
        }
    }

    fn task() -> Task {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Task {
            id: 3,
            title: "Events page".into(),
            description: None,
            status: Status::InProgress,
            tags: Default::default(),
            due_date: None,
            project_id: 1,
            created_by_id: 10,
            assignees: vec![UserRef { id: 42, name: "Former".into(), email: None }],
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_typing_and_pickers() {
        let p = project();
        let mut form = TaskForm::new(Status::Open, Some(&p));
        for c in "Fix toast".chars() {
            form.handle_char(c);
        }
        form.next_field(); // description
        form.next_field(); // status
        form.handle_left_right(true);
        form.next_field(); // tags
        form.handle_left_right(true);
        form.handle_char(' ');
        form.next_field(); // due
        form.next_field(); // assignees
        form.handle_char(' ');

        let data = form.to_data();
        assert_eq!(data.title, "Fix toast");
        assert_eq!(data.status, Status::InProgress);
        assert!(data.tags.contains(&Tag::Frontend));
        assert!(data.assignees.contains(&10));
    }

    #[test]
    fn test_locked_form_ignores_detail_edits() {
        let p = project();
        let mut form = TaskForm::from_task(&task(), EditRights::STATUS_ONLY, Some(&p));
        assert_eq!(form.current_field, FormField::Status);
        form.handle_left_right(true);
        form.prev_field(); // description
        form.handle_char('x');
        form.next_field();
        form.next_field(); // tags
        form.handle_char(' ');

        let data = form.to_data();
        assert_eq!(data.status, Status::OnHold);
        assert_eq!(data.description, "");
        assert!(data.tags.is_empty());
    }

    #[test]
    fn test_off_roster_assignee_stays_listed() {
        let p = project();
        let form = TaskForm::from_task(&task(), EditRights::FULL, Some(&p));
        assert_eq!(form.roster.len(), 3);
        assert!(form.has_assignee(&form.roster[2]));
    }
}
