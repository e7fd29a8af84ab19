//! Error types shared by the stores, the quiz session and the controller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::controller::Notice;
use crate::models::Screen;

/// Coarse classification used by callers that only care about the kind of
/// failure (for instance to decide whether the user can simply retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input. The user can correct it and retry.
    Validation,
    /// A referenced category, question or user does not exist.
    NotFound,
    /// A category or user with that name already exists.
    Duplicate,
    /// A quiz was started on a category without questions.
    EmptyCategory,
    /// Reading or writing a persisted resource failed.
    Io,
}

/// Errors produced by quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A required field was empty or otherwise unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A question failed validation.
    #[error("invalid question: {0}")]
    InvalidQuestion(String),

    /// Submit was requested before an option was selected.
    #[error("select an option or skip the question")]
    NoSelection,

    /// An option index outside `0..4`.
    #[error("option {0} does not exist")]
    InvalidOption(usize),

    /// A question index outside the category.
    #[error("index {index} is out of range (category has {len} questions)")]
    OutOfRange { index: usize, len: usize },

    /// The command is not available on the active screen.
    #[error("{command} is not available on the {screen} screen")]
    NotPermitted {
        command: &'static str,
        screen: Screen,
    },

    /// Username and password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A category, question or user that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    #[error("user already exists: {0}")]
    DuplicateUser(String),

    /// A quiz cannot run on a category without questions.
    #[error("no questions in category {0}")]
    EmptyCategory(String),

    /// The quiz session is not in progress.
    #[error("no quiz in progress")]
    SessionInactive,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Drawing to or reading from the terminal failed.
    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),

    #[error("malformed data in {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The quiz finished but its result could not be appended to the log.
    /// `notice` is what the finishing command reported.
    #[error("quiz finished but the result was not saved: {source}")]
    AttemptNotRecorded {
        notice: Box<Notice>,
        #[source]
        source: Box<QuizError>,
    },
}

impl QuizError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        QuizError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        QuizError::Format {
            path: path.into(),
            source,
        }
    }

    /// Map this error onto the coarse [`ErrorKind`] taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::InvalidInput(_)
            | QuizError::InvalidQuestion(_)
            | QuizError::NoSelection
            | QuizError::InvalidOption(_)
            | QuizError::OutOfRange { .. }
            | QuizError::NotPermitted { .. }
            | QuizError::InvalidCredentials
            | QuizError::SessionInactive => ErrorKind::Validation,
            QuizError::NotFound(_) => ErrorKind::NotFound,
            QuizError::DuplicateCategory(_) | QuizError::DuplicateUser(_) => ErrorKind::Duplicate,
            QuizError::EmptyCategory(_) => ErrorKind::EmptyCategory,
            QuizError::Io { .. } | QuizError::Format { .. } | QuizError::Terminal(_) => {
                ErrorKind::Io
            }
            QuizError::AttemptNotRecorded { source, .. } => source.kind(),
        }
    }

    /// Returns `true` if the user can fix the input and retry in place.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Duplicate | ErrorKind::NotFound
        )
    }
}

/// Result alias for quiz operations.
pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(QuizError::NoSelection.kind(), ErrorKind::Validation);
        assert_eq!(
            QuizError::OutOfRange { index: 4, len: 2 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            QuizError::DuplicateUser("bob".into()).kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(
            QuizError::EmptyCategory("Math".into()).kind(),
            ErrorKind::EmptyCategory
        );
        let io = QuizError::io("x.json", io::Error::other("disk full"));
        assert_eq!(io.kind(), ErrorKind::Io);
        assert!(!io.is_user_correctable());
        assert!(QuizError::NoSelection.is_user_correctable());
    }

    #[test]
    fn test_display_mentions_screen() {
        let err = QuizError::NotPermitted {
            command: "addCategory",
            screen: Screen::Menu,
        };
        assert_eq!(
            err.to_string(),
            "addCategory is not available on the Menu screen"
        );
    }
}
