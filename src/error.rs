//! Error types for remote calls and client-side validation.

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {}", .messages.join("; "))]
    Server { status: u16, messages: Vec<String> },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),

    #[error("no server URL set for context \"{0}\"; run `tb context set {0} --server <url>`")]
    NoServer(String),
}

impl ApiError {
    /// The text shown to the user in a toast.
    ///
    /// Backend validation failures surface their own message, or all of them
    /// joined when the backend returned a list.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { messages, status } if messages.is_empty() => {
                format!("Request failed with status {}", status)
            }
            ApiError::Server { messages, .. } => messages.join("; "),
            other => other.to_string(),
        }
    }
}

/// Reasons a task form is refused.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Due date cannot be in the past")]
    DueInPast,

    #[error("Unrecognised due date: {0}")]
    InvalidDue(String),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

impl FormError {
    /// Whether the form was refused before any request was sent.
    pub fn is_client_side(&self) -> bool {
        !matches!(self, FormError::Api(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_joins_validation_errors() {
        let err = ApiError::Server {
            status: 400,
            messages: vec!["title must not be empty".into(), "status is invalid".into()],
        };
        assert_eq!(err.user_message(), "title must not be empty; status is invalid");
        assert_eq!(err.to_string(), "HTTP 400: title must not be empty; status is invalid");
    }

    #[test]
    fn test_user_message_without_body() {
        let err = ApiError::Server { status: 502, messages: vec![] };
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn test_form_error_classes() {
        assert!(FormError::DueInPast.is_client_side());
        assert!(!FormError::Api(ApiError::Auth("expired".into())).is_client_side());
        assert_eq!(FormError::DueInPast.to_string(), "Due date cannot be in the past");
    }
}
