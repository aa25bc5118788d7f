use super::service::SessionId;

/// First half of the two-phase submission protocol.
///
/// Returned by [`QuizSession::request_submission`](super::QuizSession::request_submission)
/// once the preconditions hold. Hand it back to `confirm` or `cancel`; it is
/// only accepted while the answer sheet is unchanged since it was issued.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending submission does nothing until confirmed or cancelled"]
pub struct PendingSubmission {
    pub(crate) session_id: SessionId,
    pub(crate) revision: u64,
    answered: usize,
    total: usize,
}

impl PendingSubmission {
    pub(crate) fn new(session_id: SessionId, revision: u64, answered: usize, total: usize) -> Self {
        Self {
            session_id,
            revision,
            answered,
            total,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Answered questions at the time of the request.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}
