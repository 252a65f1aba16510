//! HTTP implementation of [`TaskApi`] over blocking `reqwest`.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::client::{parse_error_body, Envelope, LoginRequest, LoginResponse, TaskApi};
use crate::config::{ApiConfig, Context};
use crate::error::ApiError;
use crate::project::Project;
use crate::task::{NewTask, ProjectId, Task, TaskId, TaskPatch};

/// REST client bound to one server and bearer token.
pub struct HttpApi {
    http: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(server: &str, token: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if !token.is_empty() {
            let val = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::Auth("stored token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, val);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(HttpApi {
            http,
            base_url: server.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client for a configured context.
    pub fn from_context(ctx: &Context, api: &ApiConfig) -> Result<Self, ApiError> {
        if ctx.server.is_empty() {
            return Err(ApiError::NoServer(ctx.name.clone()));
        }
        Self::new(&ctx.server, &ctx.token, Duration::from_secs(api.timeout_seconds))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a (possibly enveloped) JSON body.
    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.execute(req)?;
        let body: Envelope<T> = resp
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.into_inner())
    }

    fn execute(&self, req: RequestBuilder) -> Result<reqwest::blocking::Response, ApiError> {
        let req = req.build()?;
        debug!(method = %req.method(), url = %req.url(), "api request");
        let resp = self.http.execute(req)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().unwrap_or_default();
        let err = parse_error_body(status.as_u16(), &text);
        warn!(status = status.as_u16(), error = %err, "api request failed");
        Err(err)
    }
}

impl TaskApi for HttpApi {
    fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.send(self.http.get(self.url("/projects")))
    }

    fn get_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        self.send(self.http.get(self.url(&format!("/projects/{}", id))))
    }

    fn list_tasks(&self, project: ProjectId) -> Result<Vec<Task>, ApiError> {
        let req = self
            .http
            .get(self.url("/tasks"))
            .query(&[("projectId", project)]);
        self.send(req)
    }

    fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.send(self.http.get(self.url(&format!("/tasks/{}", id))))
    }

    fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.send(self.http.post(self.url("/tasks")).json(task))
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.send(self.http.patch(self.url(&format!("/tasks/{}", id))).json(patch))
    }

    fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&format!("/tasks/{}", id))))?;
        Ok(())
    }
}

/// Exchange credentials for a bearer token and the session user.
pub fn login(
    server: &str,
    username: &str,
    password: &str,
    timeout: Duration,
) -> Result<LoginResponse, ApiError> {
    let api = HttpApi::new(server, "", timeout)?;
    let req = api
        .http
        .post(api.url("/auth/login"))
        .json(&LoginRequest { username, password });
    match api.send::<LoginResponse>(req) {
        Err(ApiError::Server { status: 401, messages }) | Err(ApiError::Server { status: 403, messages }) => {
            Err(ApiError::Auth(if messages.is_empty() {
                "invalid credentials".to_string()
            } else {
                messages.join("; ")
            }))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_strips_trailing_slash() {
        let api = HttpApi::new("http://localhost:3000/api/", "tok", Duration::from_secs(1)).unwrap();
        assert_eq!(api.url("/tasks/3"), "http://localhost:3000/api/tasks/3");
    }

    #[test]
    fn test_context_without_server_is_rejected() {
        let ctx = Context::new("staging");
        let err = HttpApi::from_context(&ctx, &ApiConfig::default()).err().unwrap();
        assert!(matches!(err, ApiError::NoServer(ref name) if name == "staging"));
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let err = HttpApi::new("http://localhost", "bad\ntoken", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, ApiError::Auth(_)));
    }
}
