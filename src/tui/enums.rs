//! Enumerations for TUI state management.

/// Screen the board application is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Board,
    Detail,
    Form,
    ConfirmDelete,
    Help,
}

/// Fields of the task form, in tab order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FormField {
    Title,
    Description,
    Status,
    Tags,
    Due,
    Assignees,
}

impl FormField {
    pub const ORDER: [FormField; 6] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::Tags,
        FormField::Due,
        FormField::Assignees,
    ];

    pub fn next(self) -> FormField {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> FormField {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title *",
            FormField::Description => "Description",
            FormField::Status => "Status",
            FormField::Tags => "Tags",
            FormField::Due => "Due Date",
            FormField::Assignees => "Assignees",
        }
    }

    /// Whether the field is gated by [`crate::form::EditRights::details`].
    pub fn is_detail(self) -> bool {
        !matches!(self, FormField::Status)
    }
}
