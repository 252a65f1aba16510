//! Projects and their developer rosters.
//!
//! A project owns its tasks. The roster lists the developers a task may be
//! assigned to; it filters what the form offers and is not enforced anywhere
//! else.

use serde::{Deserialize, Serialize};

use crate::task::{ProjectId, UserId, UserRef};

/// A project as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub developers: Vec<UserRef>,
}

impl Project {
    /// Whether the given user is on this project's roster.
    pub fn has_developer(&self, user_id: UserId) -> bool {
        self.developers.iter().any(|d| d.id == user_id)
    }

    /// Keep only the ids that are on the roster, preserving their order.
    pub fn roster_filter(&self, ids: &[UserId]) -> Vec<UserId> {
        ids.iter().copied().filter(|id| self.has_developer(*id)).collect()
    }

    /// Display name of a developer, falling back to `#id`.
    pub fn developer_name(&self, user_id: UserId) -> String {
        self.developers
            .iter()
            .find(|d| d.id == user_id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("#{}", user_id))
    }
}

/// Pick the project that follows `current` in `projects`, wrapping around.
pub fn next_project(projects: &[Project], current: ProjectId) -> Option<&Project> {
    if projects.is_empty() {
        return None;
    }
    let next = match projects.iter().position(|p| p.id == current) {
        Some(i) => (i + 1) % projects.len(),
        None => 0,
    };
    projects.get(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: ProjectId, devs: &[UserId]) -> Project {
        Project {
            id,
            name: format!("Project {}", id),
            description: None,
            developers: devs
                .iter()
                .map(|&d| UserRef { id: d, name: format!("dev{}", d), email: None })
                .collect(),
        }
    }

    #[test]
    fn test_roster_filter() {
        let p = project(1, &[3, 5]);
        assert_eq!(p.roster_filter(&[5, 4, 3]), vec![5, 3]);
        assert_eq!(p.developer_name(5), "dev5");
        assert_eq!(p.developer_name(9), "#9");
    }

    #[test]
    fn test_next_project_wraps() {
        let projects = vec![project(1, &[]), project(4, &[]), project(9, &[])];
        assert_eq!(next_project(&projects, 4).map(|p| p.id), Some(9));
        assert_eq!(next_project(&projects, 9).map(|p| p.id), Some(1));
        assert_eq!(next_project(&projects, 42).map(|p| p.id), Some(1));
        assert!(next_project(&[], 1).is_none());
    }
}
