use quiz_core::model::{ChoiceKey, QuestionIndex};

/// Notifications a session pushes to its subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A selection was accepted; drives the per-question answered indicator.
    SelectionChanged {
        index: QuestionIndex,
        key: ChoiceKey,
    },
    /// A pending submission was declined; the session is still open.
    SubmissionCancelled,
    /// The session moved to its terminal graded state.
    Graded { correct: usize, total: usize },
}

/// Receives [`SessionEvent`]s in the order they happen.
pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionEvent),
{
    fn on_event(&mut self, event: &SessionEvent) {
        self(event);
    }
}
