//! Client configuration and session storage.
//!
//! Reads/writes `~/.taskboard/config.toml`. Each named context holds a
//! server URL, the bearer token obtained by `tb login`, the logged-in user
//! and the project the board opens by default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::task::{ProjectId, UserId};

/// Roles that may edit every field of any task.
pub const PRIVILEGED_ROLES: [&str; 3] = ["ADMIN", "SUPER_ADMIN", "PROJECT_MANAGER"];

/// The logged-in user, as returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Session {
    /// Whether the user holds any role that grants full edit rights.
    pub fn is_privileged(&self) -> bool {
        self.roles
            .iter()
            .any(|r| PRIVILEGED_ROLES.iter().any(|p| r.eq_ignore_ascii_case(p)))
    }
}

/// A single context: one backend and the session held against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Context {
    pub name: String,

    /// Server URL (e.g. "https://admin.example.org/api").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Bearer token (set by `tb login`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    /// Project opened by `tb board` and used by `tb list` when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Session>,
}

impl Context {
    pub fn new(name: &str) -> Self {
        Context {
            name: name.to_string(),
            server: String::new(),
            token: String::new(),
            project: None,
            user: None,
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// Seconds a notification stays visible.
    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig { toast_seconds: default_toast_seconds() }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig { timeout_seconds: default_timeout_seconds() }
    }
}

fn default_toast_seconds() -> u64 {
    4
}

fn default_timeout_seconds() -> u64 {
    15
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.taskboard/config.toml.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk using a temp file and rename.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(tmp, path)?;
        Ok(())
    }

    /// Get the currently active context, if any.
    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    /// Resolve a context by explicit name, or the current one.
    pub fn resolve(&self, name: Option<&str>) -> Option<&Context> {
        match name {
            Some(n) => self.contexts.iter().find(|c| c.name == n),
            None => self.current(),
        }
    }

    /// Get a mutable reference to a context by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }
}

/// Return the taskboard directory (~/.taskboard).
pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".taskboard")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.current_context.is_empty());
        assert!(config.contexts.is_empty());
        assert_eq!(config.ui.toast_seconds, 4);
        assert_eq!(config.api.timeout_seconds, 15);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ClientConfig::default();
        config.current_context = "diocese".to_string();
        config.upsert_context(Context {
            name: "diocese".to_string(),
            server: "http://localhost:3000/api".to_string(),
            token: "abc".to_string(),
            project: Some(2),
            user: Some(Session {
                user_id: 3,
                username: "kofi".to_string(),
                roles: vec!["DEVELOPER".to_string()],
            }),
        });
        config.save(&path).unwrap();

        let back = ClientConfig::load(&path).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.current().map(|c| c.project), Some(Some(2)));
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_remove_current_context_clears_selection() {
        let mut config = ClientConfig::default();
        config.upsert_context(Context::new("a"));
        config.upsert_context(Context::new("b"));
        config.current_context = "a".to_string();
        assert!(config.remove_context("a"));
        assert!(config.current_context.is_empty());
        assert!(!config.remove_context("a"));
        assert_eq!(config.resolve(Some("b")).map(|c| c.name.as_str()), Some("b"));
    }

    #[test]
    fn test_privileged_roles() {
        let mut session = Session { user_id: 1, username: "x".into(), roles: vec![] };
        assert!(!session.is_privileged());
        session.roles.push("project_manager".into());
        assert!(session.is_privileged());
    }
}
