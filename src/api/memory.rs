//! In-memory [`TaskApi`] used by the board and command tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};

use crate::api::client::TaskApi;
use crate::error::ApiError;
use crate::fields::Status;
use crate::project::Project;
use crate::task::{NewTask, ProjectId, Task, TaskId, TaskPatch, UserRef};

/// Backend fake holding projects and tasks, with switches to make the next
/// call of a given kind fail and a log of every request made.
#[derive(Default)]
pub struct MemoryApi {
    pub projects: RefCell<Vec<Project>>,
    pub tasks: RefCell<Vec<Task>>,
    pub requests: RefCell<Vec<String>>,
    pub fail_list: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub fail_create: Cell<bool>,
    pub fail_delete: Cell<bool>,
    next_id: Cell<TaskId>,
}

impl MemoryApi {
    pub fn new() -> Self {
        let api = MemoryApi::default();
        api.next_id.set(100);
        api.projects.borrow_mut().push(Project {
            id: 1,
            name: "Parish Portal".into(),
            description: None,
            developers: vec![
                UserRef { id: 10, name: "Ama".into(), email: None },
                UserRef { id: 11, name: "Kwame".into(), email: None },
            ],
        });
        api
    }

    /// Seed one task into project 1.
    pub fn with_task(self, id: TaskId, title: &str, status: Status) -> Self {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        self.tasks.borrow_mut().push(Task {
            id,
            title: title.into(),
            description: None,
            status,
            tags: BTreeSet::new(),
            due_date: None,
            project_id: 1,
            created_by_id: 10,
            assignees: vec![],
            created_at: at,
            updated_at: at,
        });
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn stored(&self, id: TaskId) -> Option<Task> {
        self.tasks.borrow().iter().find(|t| t.id == id).cloned()
    }

    fn log(&self, line: String) {
        self.requests.borrow_mut().push(line);
    }

    fn trip(flag: &Cell<bool>) -> Result<(), ApiError> {
        if flag.replace(false) {
            return Err(ApiError::Server { status: 500, messages: vec!["Internal server error".into()] });
        }
        Ok(())
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Server { status: 404, messages: vec![format!("{} not found", what)] }
    }
}

impl TaskApi for MemoryApi {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.log("GET /projects".into());
        Ok(self.projects.borrow().clone())
    }

    fn get_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        self.log(format!("GET /projects/{}", id));
        self.projects
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Project"))
    }

    fn list_tasks(&self, project: ProjectId) -> Result<Vec<Task>, ApiError> {
        self.log(format!("GET /tasks?projectId={}", project));
        Self::trip(&self.fail_list)?;
        Ok(self
            .tasks
            .borrow()
            .iter()
            .filter(|t| t.project_id == project)
            .cloned()
            .collect())
    }

    fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.log(format!("GET /tasks/{}", id));
        self.stored(id).ok_or_else(|| Self::not_found("Task"))
    }

    fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.log("POST /tasks".into());
        Self::trip(&self.fail_create)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let developers = self
            .projects
            .borrow()
            .iter()
            .find(|p| p.id == task.project_id)
            .map(|p| p.developers.clone())
            .unwrap_or_default();
        let now = Utc::now();
        let created = Task {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            tags: task.tags.clone(),
            due_date: task.due_date,
            project_id: task.project_id,
            created_by_id: 10,
            assignees: developers
                .into_iter()
                .filter(|d| task.assignee_ids.contains(&d.id))
                .collect(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.log(format!("PATCH /tasks/{} {}", id, serde_json::to_string(patch).unwrap()));
        Self::trip(&self.fail_update)?;
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("Task"))?;
        apply_patch(patch, task);
        if let Some(ref ids) = patch.assignee_ids {
            task.assignees = ids
                .iter()
                .map(|&uid| UserRef { id: uid, name: format!("user{}", uid), email: None })
                .collect();
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.log(format!("DELETE /tasks/{}", id));
        Self::trip(&self.fail_delete)?;
        let mut tasks = self.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(Self::not_found("Task"));
        }
        Ok(())
    }
}

/// Apply a patch to the stored copy, the way the backend would.
fn apply_patch(patch: &TaskPatch, task: &mut Task) {
    if let Some(ref title) = patch.title {
        task.title = title.clone();
    }
    if let Some(ref description) = patch.description {
        task.description = description.clone();
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(ref tags) = patch.tags {
        task.tags = tags.clone();
    }
    if let Some(due) = patch.due_date {
        task.due_date = due;
    }
}
