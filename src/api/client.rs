//! The remote task API as the board sees it.
//!
//! [`TaskApi`] is the seam between board state and the backend. The HTTP
//! implementation lives in [`crate::api::http`]; tests substitute an
//! in-memory fake.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::project::Project;
use crate::task::{NewTask, ProjectId, Task, TaskId, TaskPatch};

/// Blocking access to the task and project resources.
pub trait TaskApi {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    fn get_project(&self, id: ProjectId) -> Result<Project, ApiError>;

    /// Full task list for one project.
    fn list_tasks(&self, project: ProjectId) -> Result<Vec<Task>, ApiError>;

    fn get_task(&self, id: TaskId) -> Result<Task, ApiError>;

    fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;

    /// Partial update; only the fields present in `patch` are sent.
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError>;

    fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;
}

/// Response body that is either bare or wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(v) => v,
        }
    }
}

/// Credentials posted to the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login endpoint response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub id: u64,
    #[serde(alias = "name")]
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginUser {
    /// All roles, whether the backend sent a single `role` or a `roles` list.
    pub fn all_roles(&self) -> Vec<String> {
        let mut roles = self.roles.clone();
        if let Some(ref role) = self.role {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }
}

/// Turn a failed response body into [`ApiError::Server`].
///
/// Recognises `{"message": "..."}`, `{"message": ["...", ...]}`,
/// `{"errors": ["..." | {"message": "..."}]}` and `{"error": "..."}`;
/// anything else is used verbatim when non-empty.
pub fn parse_error_body(status: u16, body: &str) -> ApiError {
    let mut messages = Vec::new();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        collect_messages(&value["message"], &mut messages);
        collect_messages(&value["errors"], &mut messages);
        if messages.is_empty() {
            collect_messages(&value["error"], &mut messages);
        }
    } else if !body.trim().is_empty() {
        messages.push(body.trim().to_string());
    }

    ApiError::Server { status, messages }
}

fn collect_messages(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => out.push(s.clone()),
        serde_json::Value::Array(items) => {
            for item in items {
                match item {
                    serde_json::Value::Object(_) => collect_messages(&item["message"], out),
                    other => collect_messages(other, out),
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Server { messages, .. } => messages,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_single_message() {
        let err = parse_error_body(404, r#"{"message":"Task not found"}"#);
        assert_eq!(messages(err), vec!["Task not found"]);
    }

    #[test]
    fn test_message_list() {
        let err = parse_error_body(400, r#"{"message":["title should not be empty","dueDate must be a date"]}"#);
        assert_eq!(messages(err).len(), 2);
    }

    #[test]
    fn test_errors_objects() {
        let err = parse_error_body(422, r#"{"errors":[{"field":"title","message":"too long"},"bad tag"]}"#);
        assert_eq!(messages(err), vec!["too long", "bad tag"]);
    }

    #[test]
    fn test_plain_text_and_empty() {
        assert_eq!(messages(parse_error_body(502, "Bad Gateway")), vec!["Bad Gateway"]);
        assert!(messages(parse_error_body(500, "")).is_empty());
        assert_eq!(messages(parse_error_body(401, r#"{"error":"Unauthorized"}"#)), vec!["Unauthorized"]);
    }

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let wrapped: Envelope<Vec<u64>> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        let bare: Envelope<Vec<u64>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);
        assert_eq!(bare.into_inner(), vec![3]);
    }

    #[test]
    fn test_login_response_aliases() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"t0k","user":{"id":4,"name":"Esi","role":"ADMIN"}}"#,
        )
        .unwrap();
        assert_eq!(resp.token, "t0k");
        assert_eq!(resp.user.username, "Esi");
        assert_eq!(resp.user.all_roles(), vec!["ADMIN"]);
    }
}
