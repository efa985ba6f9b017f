//! Error types for the forms layer
//!
//! Submission failures are downgraded to a [`SubmissionFailure`] before they
//! reach anything that displays text. The raw error is only ever logged.

use serde::Serialize;
use thiserror::Error;

/// Failure raised by a submission action
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl SubmissionError {
    /// Coarse category
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmissionError::Network(_) => FailureKind::Network,
            SubmissionError::Rejected { .. } => FailureKind::Rejected,
            SubmissionError::InvalidResponse(_) | SubmissionError::Unexpected(_) => {
                FailureKind::Unexpected
            }
        }
    }

    /// Text safe to show the end user. Never includes backend text.
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

/// Category of a failed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Network,
    Rejected,
    Unexpected,
}

impl FailureKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::Network => {
                "We couldn't reach our servers. Please check your connection and try again."
            }
            FailureKind::Rejected => {
                "We couldn't process your submission. Please review your details and try again."
            }
            FailureKind::Unexpected => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Sanitized failure kept in the form state for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<FailureKind> for SubmissionFailure {
    fn from(kind: FailureKind) -> Self {
        Self {
            kind,
            message: kind.user_message().to_string(),
        }
    }
}

impl From<&SubmissionError> for SubmissionFailure {
    fn from(err: &SubmissionError) -> Self {
        err.kind().into()
    }
}

/// Form construction and mutation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Change or descriptor names a field outside the active schema
    #[error("field `{field}` is not part of the {schema} form")]
    UnknownField { field: String, schema: String },

    /// Two descriptors share a name
    #[error("duplicate field: {0}")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_never_carries_backend_text() {
        let err = SubmissionError::Rejected {
            status: 500,
            message: "<pre>NullPointerException at db.rs:42</pre>".into(),
        };
        let failure = SubmissionFailure::from(&err);

        assert_eq!(failure.kind, FailureKind::Rejected);
        assert!(!failure.message.contains("NullPointer"));
        assert!(err.to_string().contains("NullPointer"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(SubmissionError::Network("timeout".into()).kind(), FailureKind::Network);
        assert_eq!(
            SubmissionError::InvalidResponse("no id".into()).user_message(),
            "An unexpected error occurred. Please try again."
        );
    }
}
