//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AnswerSheetError, BankError, QuestionIndex};
use storage::StorageError;

/// Errors emitted by quiz sessions.
///
/// Every variant rejects a single call and leaves the session as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("answers are frozen: the session has already been graded")]
    SessionAlreadyGraded,
    #[error("{} question(s) still unanswered", unanswered.len())]
    IncompleteAnswers { unanswered: Vec<QuestionIndex> },
    #[error("answers have already been submitted")]
    AlreadySubmitted,
    #[error("the session has not been graded yet")]
    NotYetGraded,
    #[error("submission handle no longer matches the session")]
    StaleSubmission,
    #[error(transparent)]
    Answer(#[from] AnswerSheetError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
