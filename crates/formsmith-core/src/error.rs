//! Error types.
//!
//! Store implementations return `anyhow::Error`; a `StoreError` inside it can
//! be downcast by the service to tell a link collision apart from any other
//! storage failure without string matching.

use thiserror::Error;

use crate::model::QuestionType;

/// Errors surfaced by [`FormService`](crate::service::FormService).
#[derive(Debug, Error)]
pub enum FormError {
    /// The form does not exist, is not published, or belongs to someone else.
    ///
    /// All three cases share this variant so callers cannot probe for drafts.
    #[error("form not found")]
    NotFound,

    /// The form draft failed validation (e.g. a blank title).
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// A content edit did not fit the question it targeted.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The backing store failed.
    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// Errors from editing question content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// A patch built for one question type was applied to another.
    #[error("cannot apply a {found} patch to a {expected} question")]
    TypeMismatch {
        expected: QuestionType,
        found: QuestionType,
    },

    /// An editor payload could not be read as content of the given type.
    #[error("malformed {question_type} content: {message}")]
    Malformed {
        question_type: QuestionType,
        message: String,
    },

    /// An update tried to give an existing question id another type.
    #[error("question {id} is a {from} question and cannot become {to}")]
    TypeChanged {
        id: String,
        from: QuestionType,
        to: QuestionType,
    },

    /// A multiple-choice `correct` index does not point into its options.
    #[error("correct index {correct} is out of range ({options} options)")]
    CorrectOutOfRange { correct: usize, options: usize },

    /// Same as `CorrectOutOfRange`, for a comprehension item (0-based).
    #[error("item {}: correct index {correct} is out of range ({options} options)", .item + 1)]
    ItemCorrectOutOfRange {
        item: usize,
        correct: usize,
        options: usize,
    },
}

/// Errors from the cloze word bank and the categorize board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("'{0}' is not one of the available words")]
    UnknownWord(String),

    #[error("'{0}' is not a category of this question")]
    UnknownCategory(String),

    #[error("blank {index} is out of range ({len} blanks)")]
    BlankOutOfRange { index: usize, len: usize },

    #[error("token {index} is out of range ({len} tokens)")]
    TokenOutOfRange { index: usize, len: usize },
}

/// Classified store failures, carried inside `anyhow::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Another form already holds this shareable link.
    #[error("shareable link already in use: {0}")]
    DuplicateLink(String),

    /// An update targeted a form the store does not hold.
    #[error("no stored form with id {0}")]
    MissingForm(String),
}

impl StoreError {
    /// Returns `true` if the error is a shareable-link collision worth retrying
    /// with a fresh token.
    pub fn is_link_conflict(&self) -> bool {
        matches!(self, StoreError::DuplicateLink(_))
    }
}

/// Returns `true` if `err` wraps a [`StoreError::DuplicateLink`].
pub fn is_link_conflict(err: &anyhow::Error) -> bool {
    err.downcast_ref::<StoreError>()
        .is_some_and(StoreError::is_link_conflict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_conflict_survives_anyhow_context() {
        let err = anyhow::Error::new(StoreError::DuplicateLink("abc".into()))
            .context("inserting form");
        assert!(is_link_conflict(&err));

        let other = anyhow::anyhow!("disk full");
        assert!(!is_link_conflict(&other));
    }

    #[test]
    fn not_found_message_is_uniform() {
        assert_eq!(FormError::NotFound.to_string(), "form not found");
    }
}
