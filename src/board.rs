//! Task status board state.
//!
//! The board holds one project's tasks in memory and groups them into the
//! five status columns. Moving a card is a two-phase operation: the status
//! change is applied locally first ([`Board::begin_move`]) and then either
//! confirmed or compensated once the backend answers ([`Board::finish_move`]).
//! Compensation is a full reload, not a field-level rollback.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::client::TaskApi;
use crate::error::FormError;
use crate::fields::{format_status, Status};
use crate::form::{EditRights, TaskFormData};
use crate::notify::Toasts;
use crate::task::{ProjectId, Task, TaskId, TaskPatch};

/// A card position: column status and index within the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub status: Status,
    pub index: usize,
}

/// The end of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub task_id: TaskId,
    pub source: Slot,
    /// `None` when the drag was cancelled.
    pub destination: Option<Slot>,
}

/// Why a drag did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOp {
    Cancelled,
    SamePosition,
    /// Ordering within a column is not persisted by the backend.
    Reorder,
    UnknownTask,
}

/// A status change already applied locally and awaiting the backend.
#[must_use = "a pending move must be finished with Board::finish_move"]
#[derive(Debug, PartialEq, Eq)]
pub struct PendingMove {
    pub task_id: TaskId,
    pub from: Status,
    pub to: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    NoOp(NoOp),
    /// The backend accepted the new status.
    Confirmed,
    /// The backend refused; the collection was reloaded.
    Reverted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
    NothingPending,
}

/// In-memory view of one project's tasks.
pub struct Board {
    project_id: ProjectId,
    tasks: Vec<Task>,
    toasts: Toasts,
    pending_delete: Option<TaskId>,
}

impl Board {
    pub fn new(project_id: ProjectId, toasts: Toasts) -> Self {
        Board {
            project_id,
            tasks: Vec::new(),
            toasts,
            pending_delete: None,
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toasts {
        &mut self.toasts
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in one column, in collection order.
    pub fn column(&self, status: Status) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Current slot of a task.
    pub fn slot_of(&self, id: TaskId) -> Option<Slot> {
        let task = self.get(id)?;
        let index = self
            .column(task.status)
            .iter()
            .position(|t| t.id == id)?;
        Some(Slot { status: task.status, index })
    }

    /// Replace the collection with a full fetch of the current project.
    ///
    /// On failure the previous collection is kept and an error toast raised.
    /// Returns whether the load succeeded.
    pub fn load(&mut self, api: &dyn TaskApi) -> bool {
        match api.list_tasks(self.project_id) {
            Ok(tasks) => {
                info!(project = self.project_id, count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                true
            }
            Err(e) => {
                warn!(project = self.project_id, error = %e, "failed to load tasks");
                self.toasts.error(format!("Failed to load tasks: {}", e.user_message()));
                false
            }
        }
    }

    /// Switch to another project and load its tasks.
    pub fn set_project(&mut self, api: &dyn TaskApi, project_id: ProjectId) -> bool {
        if project_id != self.project_id {
            self.project_id = project_id;
            self.tasks.clear();
            self.pending_delete = None;
        }
        self.load(api)
    }

    /// Phase one of a move: validate the drag and apply the new status locally.
    pub fn begin_move(&mut self, drag: DragEnd) -> Result<PendingMove, NoOp> {
        let destination = drag.destination.ok_or(NoOp::Cancelled)?;
        if destination.status == drag.source.status {
            return Err(if destination.index == drag.source.index {
                NoOp::SamePosition
            } else {
                NoOp::Reorder
            });
        }

        let position = self
            .tasks
            .iter()
            .position(|t| t.id == drag.task_id)
            .ok_or(NoOp::UnknownTask)?;

        let mut updated = self.tasks[position].clone();
        let from = updated.status;
        updated.status = destination.status;
        self.tasks[position] = updated;

        Ok(PendingMove { task_id: drag.task_id, from, to: destination.status })
    }

    /// Phase two of a move: send the status and confirm or compensate.
    pub fn finish_move(&mut self, api: &dyn TaskApi, pending: PendingMove) -> MoveOutcome {
        let patch = TaskPatch::status_only(pending.to);
        match api.update_task(pending.task_id, &patch) {
            Ok(_) => {
                info!(task = pending.task_id, from = ?pending.from, to = ?pending.to, "task moved");
                self.toasts.info(format!("Task moved to {}", format_status(pending.to)));
                MoveOutcome::Confirmed
            }
            Err(e) => {
                warn!(task = pending.task_id, to = ?pending.to, error = %e, "status update failed, reloading");
                self.toasts.error(format!("Failed to update task status: {}", e.user_message()));
                self.load(api);
                MoveOutcome::Reverted
            }
        }
    }

    /// Both phases back to back.
    pub fn move_task(&mut self, api: &dyn TaskApi, drag: DragEnd) -> MoveOutcome {
        match self.begin_move(drag) {
            Ok(pending) => self.finish_move(api, pending),
            Err(reason) => MoveOutcome::NoOp(reason),
        }
    }

    /// Move a task to `status` from wherever it currently is.
    pub fn move_to(&mut self, api: &dyn TaskApi, task_id: TaskId, status: Status) -> MoveOutcome {
        let source = match self.slot_of(task_id) {
            Some(s) => s,
            None => return MoveOutcome::NoOp(NoOp::UnknownTask),
        };
        let index = self.column(status).len();
        self.move_task(api, DragEnd { task_id, source, destination: Some(Slot { status, index }) })
    }

    /// Create or update a task from form data.
    ///
    /// Client-side validation failures send nothing. On success the
    /// collection is reloaded; on any failure the error is toasted and
    /// returned so the form can stay open.
    pub fn submit_form(
        &mut self,
        api: &dyn TaskApi,
        form: &TaskFormData,
        rights: EditRights,
        now: DateTime<Utc>,
    ) -> Result<TaskId, FormError> {
        let result = self.send_form(api, form, rights, now);
        match result {
            Ok(id) => {
                let verb = if form.is_edit() { "updated" } else { "created" };
                info!(task = id, "task {}", verb);
                self.load(api);
                self.toasts.info(format!("Task {}", verb));
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "task form refused");
                self.toasts.error(e.to_string());
                Err(e)
            }
        }
    }

    fn send_form(
        &self,
        api: &dyn TaskApi,
        form: &TaskFormData,
        rights: EditRights,
        now: DateTime<Utc>,
    ) -> Result<TaskId, FormError> {
        match form.task_id {
            None => {
                let body = form.to_new_task(self.project_id, now)?;
                Ok(api.create_task(&body)?.id)
            }
            Some(id) => {
                let original = match self.get(id) {
                    Some(t) => t.clone(),
                    None => api.get_task(id)?,
                };
                let patch = form.to_patch(&original, rights, now)?;
                Ok(api.update_task(id, &patch)?.id)
            }
        }
    }

    /// First step of a delete: ask for confirmation.
    pub fn request_delete(&mut self, id: TaskId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn pending_delete(&self) -> Option<TaskId> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step of a delete. The confirmation closes whatever the outcome.
    pub fn confirm_delete(&mut self, api: &dyn TaskApi) -> DeleteOutcome {
        let id = match self.pending_delete.take() {
            Some(id) => id,
            None => return DeleteOutcome::NothingPending,
        };
        match api.delete_task(id) {
            Ok(()) => {
                info!(task = id, "task deleted");
                self.load(api);
                self.toasts.info("Task deleted");
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!(task = id, error = %e, "delete failed");
                self.toasts.error(format!("Failed to delete task: {}", e.user_message()));
                DeleteOutcome::Failed
            }
        }
    }
}
