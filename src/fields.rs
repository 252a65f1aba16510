//! Enumerations and field types for the task board.
//!
//! This module defines the closed enumerations a task is classified by: its
//! status (which doubles as the board column) and its tags.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task status. Each status is one board column.
///
/// Any status may move to any other status in a single step; there is no
/// terminal state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Backlog,
    Open,
    InProgress,
    OnHold,
    Completed,
}

impl Status {
    /// All statuses in board column order.
    pub const ALL: [Status; 5] = [
        Status::Backlog,
        Status::Open,
        Status::InProgress,
        Status::OnHold,
        Status::Completed,
    ];

    /// Column index of this status on the board.
    pub fn column(self) -> usize {
        match self {
            Status::Backlog => 0,
            Status::Open => 1,
            Status::InProgress => 2,
            Status::OnHold => 3,
            Status::Completed => 4,
        }
    }

    /// Status shown in the given board column.
    pub fn from_column(index: usize) -> Option<Status> {
        Self::ALL.get(index).copied()
    }
}

/// Work-area tag. A task carries a set of zero or more tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    Backend,
    Frontend,
    Design,
    Devops,
    Qa,
    Management,
    Other,
}

impl Tag {
    pub const ALL: [Tag; 7] = [
        Tag::Backend,
        Tag::Frontend,
        Tag::Design,
        Tag::Devops,
        Tag::Qa,
        Tag::Management,
        Tag::Other,
    ];
}

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Backlog => "Backlog",
        Status::Open => "Open",
        Status::InProgress => "In Progress",
        Status::OnHold => "On Hold",
        Status::Completed => "Completed",
    }
}

/// Format a tag for display.
pub fn format_tag(t: Tag) -> &'static str {
    match t {
        Tag::Backend => "Backend",
        Tag::Frontend => "Frontend",
        Tag::Design => "Design",
        Tag::Devops => "DevOps",
        Tag::Qa => "QA",
        Tag::Management => "Management",
        Tag::Other => "Other",
    }
}

/// Parse a status from user input. Accepts wire names (`IN_PROGRESS`),
/// kebab-case (`in-progress`) and display names (`In Progress`).
pub fn parse_status(s: &str) -> Option<Status> {
    match normalise_key(s).as_str() {
        "backlog" => Some(Status::Backlog),
        "open" => Some(Status::Open),
        "in-progress" => Some(Status::InProgress),
        "on-hold" => Some(Status::OnHold),
        "completed" | "done" => Some(Status::Completed),
        _ => None,
    }
}

/// Parse a tag from user input, case-insensitive.
pub fn parse_tag(s: &str) -> Option<Tag> {
    match normalise_key(s).as_str() {
        "backend" => Some(Tag::Backend),
        "frontend" => Some(Tag::Frontend),
        "design" => Some(Tag::Design),
        "devops" => Some(Tag::Devops),
        "qa" => Some(Tag::Qa),
        "management" => Some(Tag::Management),
        "other" => Some(Tag::Other),
        _ => None,
    }
}

fn normalise_key(s: &str) -> String {
    s.trim().to_lowercase().replace(['_', ' '], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tasks_start_in_backlog() {
        assert_eq!(Status::default(), Status::Backlog);
        assert_eq!(Status::default().column(), 0);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"IN_PROGRESS\"");
        assert_eq!(serde_json::to_string(&Status::OnHold).unwrap(), "\"ON_HOLD\"");
        let s: Status = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(s, Status::Completed);
    }

    #[test]
    fn test_tag_wire_names() {
        assert_eq!(serde_json::to_string(&Tag::Devops).unwrap(), "\"DEVOPS\"");
        let t: Tag = serde_json::from_str("\"QA\"").unwrap();
        assert_eq!(t, Tag::Qa);
    }

    #[test]
    fn test_columns_follow_declaration_order() {
        for (i, status) in Status::ALL.iter().enumerate() {
            assert_eq!(status.column(), i);
            assert_eq!(Status::from_column(i), Some(*status));
        }
        assert_eq!(Status::from_column(5), None);
    }

    #[test]
    fn test_parse_status_variants() {
        assert_eq!(parse_status("IN_PROGRESS"), Some(Status::InProgress));
        assert_eq!(parse_status("in-progress"), Some(Status::InProgress));
        assert_eq!(parse_status("On Hold"), Some(Status::OnHold));
        assert_eq!(parse_status("done"), Some(Status::Completed));
        assert_eq!(parse_status("archived"), None);
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag("DevOps"), Some(Tag::Devops));
        assert_eq!(parse_tag(" qa "), Some(Tag::Qa));
        assert_eq!(parse_tag("marketing"), None);
    }
}
