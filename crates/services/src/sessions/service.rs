use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use quiz_core::Clock;
use quiz_core::model::{AnswerSheet, ChoiceKey, GradingReport, QuestionBank, QuestionIndex, QuestionRecord};

use super::events::{SessionEvent, SessionObserver};
use super::progress::SessionProgress;
use super::submission::PendingSubmission;
use crate::error::SessionError;

//
// ─── IDENTITY & STATE ──────────────────────────────────────────────────────────
//

/// Unique identifier for a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a session. `Open -> Graded` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Open,
    Graded,
}

enum Phase {
    Open,
    Graded(GradingReport),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A single attempt at a question bank.
///
/// Owns the answer sheet; the bank is shared read-only with the presentation
/// layer. Selections are accepted only while the session is open. Submission is
/// a two-step protocol (`request_submission` then `confirm` or `cancel`) so the
/// caller can ask the user without blocking inside the session.
pub struct QuizSession {
    id: SessionId,
    bank: Arc<QuestionBank>,
    answers: AnswerSheet,
    phase: Phase,
    clock: Clock,
    started_at: DateTime<Utc>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl QuizSession {
    /// Start an open session with every question unanswered.
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self::with_clock(bank, Clock::default())
    }

    /// Start a session whose timestamps come from `clock`.
    #[must_use]
    pub fn with_clock(bank: Arc<QuestionBank>, clock: Clock) -> Self {
        let answers = AnswerSheet::for_bank(&bank);
        let session = Self {
            id: SessionId::generate(),
            bank,
            answers,
            phase: Phase::Open,
            clock,
            started_at: clock.now(),
            observers: Vec::new(),
        };
        tracing::debug!(session = %session.id, questions = session.bank.len(), "session opened");
        session
    }

    /// Register an observer for selection and grading notifications.
    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Open => SessionState::Open,
            Phase::Graded(_) => SessionState::Graded,
        }
    }

    #[must_use]
    pub fn is_graded(&self) -> bool {
        matches!(self.phase, Phase::Graded(_))
    }

    /// # Errors
    ///
    /// Returns `SessionError::Bank` if the index is out of range.
    pub fn question(&self, index: QuestionIndex) -> Result<&QuestionRecord, SessionError> {
        Ok(self.bank.get(index)?)
    }

    /// Current selection for `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Answer` if the index is out of range.
    pub fn selection(&self, index: QuestionIndex) -> Result<Option<ChoiceKey>, SessionError> {
        Ok(self.answers.get(index)?)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.answers.len();
        let answered = self.answers.answered_count();
        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            all_answered: self.answers.is_complete(),
            is_graded: self.is_graded(),
        }
    }

    /// Record `key` as the answer to `index`, replacing any earlier choice.
    ///
    /// Emits `SessionEvent::SelectionChanged` on success. Rejected calls change
    /// nothing and emit nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionAlreadyGraded` after submission, and
    /// `SessionError::Answer` for an unknown index or a key the question does not offer.
    pub fn select_answer(&mut self, index: QuestionIndex, key: ChoiceKey) -> Result<(), SessionError> {
        if self.is_graded() {
            tracing::warn!(session = %self.id, %index, %key, "selection rejected: already graded");
            return Err(SessionError::SessionAlreadyGraded);
        }

        self.answers.set(&self.bank, index, key).inspect_err(|err| {
            tracing::debug!(session = %self.id, %index, %key, error = %err, "selection rejected");
        })?;

        tracing::debug!(session = %self.id, %index, %key, "selection recorded");
        self.emit(SessionEvent::SelectionChanged { index, key });
        Ok(())
    }

    /// True iff the session is open and every question has an answer.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_graded() && self.answers.is_complete()
    }

    /// Check the submission preconditions and hand back a confirmation handle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` once graded, and
    /// `SessionError::IncompleteAnswers` listing the unanswered indices otherwise.
    pub fn request_submission(&self) -> Result<PendingSubmission, SessionError> {
        if self.is_graded() {
            tracing::warn!(session = %self.id, "submission rejected: already submitted");
            return Err(SessionError::AlreadySubmitted);
        }

        let unanswered = self.answers.unanswered();
        if !unanswered.is_empty() {
            tracing::warn!(
                session = %self.id,
                unanswered = unanswered.len(),
                "submission rejected: unanswered questions"
            );
            return Err(SessionError::IncompleteAnswers { unanswered });
        }

        Ok(PendingSubmission::new(
            self.id,
            self.answers.revision(),
            self.answers.answered_count(),
            self.answers.len(),
        ))
    }

    /// Commit a pending submission: freeze the answers, grade, and cache the report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` if the session was graded in the
    /// meantime, and `SessionError::StaleSubmission` if the handle belongs to
    /// another session or the answers changed since it was issued.
    pub fn confirm(&mut self, pending: PendingSubmission) -> Result<&GradingReport, SessionError> {
        if self.is_graded() {
            return Err(SessionError::AlreadySubmitted);
        }
        if pending.session_id != self.id || pending.revision != self.answers.revision() {
            tracing::warn!(session = %self.id, "submission rejected: stale confirmation handle");
            return Err(SessionError::StaleSubmission);
        }

        let report = GradingReport::grade(&self.bank, &self.answers, self.clock.now())?;
        let (correct, total) = (report.correct_count(), report.total());
        self.phase = Phase::Graded(report);

        tracing::info!(session = %self.id, correct, total, "session graded");
        self.emit(SessionEvent::Graded { correct, total });
        self.report()
    }

    /// Decline a pending submission. The session stays open.
    pub fn cancel(&mut self, pending: PendingSubmission) {
        if pending.session_id != self.id || self.is_graded() {
            return;
        }
        tracing::debug!(session = %self.id, "submission cancelled");
        self.emit(SessionEvent::SubmissionCancelled);
    }

    /// Run both submission phases, asking `decide` whether to commit.
    ///
    /// Returns `Ok(None)` when `decide` declines.
    ///
    /// # Errors
    ///
    /// Same as [`request_submission`](Self::request_submission) and [`confirm`](Self::confirm).
    pub fn submit_with(
        &mut self,
        decide: impl FnOnce(&PendingSubmission) -> bool,
    ) -> Result<Option<&GradingReport>, SessionError> {
        let pending = self.request_submission()?;
        if decide(&pending) {
            self.confirm(pending).map(Some)
        } else {
            self.cancel(pending);
            Ok(None)
        }
    }

    /// The cached report of a graded session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotYetGraded` while the session is open.
    pub fn report(&self) -> Result<&GradingReport, SessionError> {
        match &self.phase {
            Phase::Graded(report) => Ok(report),
            Phase::Open => Err(SessionError::NotYetGraded),
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("questions", &self.bank.len())
            .field("answered", &self.answers.answered_count())
            .field("state", &self.state())
            .field("started_at", &self.started_at)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerSheetError, ChoiceDraft, IncorrectAnswer, QuestionDraft};
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn bank(answers: &[&str]) -> Arc<QuestionBank> {
        let drafts = answers.iter().enumerate().map(|(i, answer)| QuestionDraft {
            text: format!("Question {i}"),
            passage: None,
            choices: ["A", "B", "C", "D"]
                .iter()
                .map(|k| ChoiceDraft::new(*k, format!("choice {k}")))
                .collect(),
            answer: (*answer).into(),
            image: None,
        });
        Arc::new(QuestionBank::load(drafts).unwrap())
    }

    fn idx(i: usize) -> QuestionIndex {
        QuestionIndex::new(i)
    }

    fn recorder(session: &mut QuizSession) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(*event));
        events
    }

    fn answer_all(session: &mut QuizSession, keys: &[ChoiceKey]) {
        for (i, key) in keys.iter().enumerate() {
            session.select_answer(idx(i), *key).unwrap();
        }
    }

    #[test]
    fn new_session_is_open_and_empty() {
        let session = QuizSession::with_clock(bank(&["A", "B"]), fixed_clock());
        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(session.started_at(), fixed_now());
        assert_eq!(session.selection(idx(0)).unwrap(), None);
        assert!(!session.can_submit());
        assert!(matches!(session.report(), Err(SessionError::NotYetGraded)));
    }

    #[test]
    fn reselection_is_last_write_wins_with_one_event_per_call() {
        let mut session = QuizSession::new(bank(&["A"]));
        let events = recorder(&mut session);

        session.select_answer(idx(0), ChoiceKey::B).unwrap();
        session.select_answer(idx(0), ChoiceKey::A).unwrap();

        assert_eq!(session.selection(idx(0)).unwrap(), Some(ChoiceKey::A));
        assert_eq!(
            *events.borrow(),
            vec![
                SessionEvent::SelectionChanged {
                    index: idx(0),
                    key: ChoiceKey::B
                },
                SessionEvent::SelectionChanged {
                    index: idx(0),
                    key: ChoiceKey::A
                },
            ]
        );
    }

    #[test]
    fn invalid_selections_are_rejected_without_events() {
        let mut session = QuizSession::new(bank(&["A", "B"]));
        let events = recorder(&mut session);
        session.select_answer(idx(0), ChoiceKey::C).unwrap();
        events.borrow_mut().clear();

        let err = session.select_answer(idx(0), ChoiceKey::E).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Answer(AnswerSheetError::InvalidChoiceKey { .. })
        ));
        let err = session.select_answer(idx(9), ChoiceKey::A).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Answer(AnswerSheetError::IndexOutOfRange { .. })
        ));

        assert_eq!(session.selection(idx(0)).unwrap(), Some(ChoiceKey::C));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn confirming_a_second_handle_after_grading_is_rejected() {
        let mut session = QuizSession::new(bank(&["A", "B"]));
        answer_all(&mut session, &[ChoiceKey::A, ChoiceKey::B]);

        let first = session.request_submission().unwrap();
        let second = session.request_submission().unwrap();
        let report = session.confirm(first).unwrap().clone();

        assert!(matches!(
            session.confirm(second),
            Err(SessionError::AlreadySubmitted)
        ));
        assert_eq!(session.report().unwrap(), &report);
    }

    #[test]
    fn can_submit_tracks_completeness() {
        let mut session = QuizSession::new(bank(&["A", "B", "C"]));
        session.select_answer(idx(0), ChoiceKey::A).unwrap();
        session.select_answer(idx(2), ChoiceKey::A).unwrap();
        assert!(!session.can_submit());
        assert_eq!(session.can_submit(), session.answers().is_complete());

        session.select_answer(idx(1), ChoiceKey::D).unwrap();
        assert!(session.can_submit());
    }

    #[test]
    fn incomplete_submission_lists_unanswered_and_stays_open() {
        let mut session = QuizSession::new(bank(&["A", "B", "C"]));
        session.select_answer(idx(1), ChoiceKey::B).unwrap();

        let err = session.request_submission().unwrap_err();
        match err {
            SessionError::IncompleteAnswers { unanswered } => {
                assert_eq!(unanswered, vec![idx(0), idx(2)]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.state(), SessionState::Open);
        assert!(matches!(session.report(), Err(SessionError::NotYetGraded)));
    }

    #[test]
    fn confirmed_submission_grades_in_index_order() {
        let mut session = QuizSession::with_clock(bank(&["A", "B", "A"]), fixed_clock());
        answer_all(&mut session, &[ChoiceKey::A, ChoiceKey::C, ChoiceKey::A]);

        let pending = session.request_submission().unwrap();
        assert_eq!(pending.answered(), 3);
        assert_eq!(pending.total(), 3);

        let report = session.confirm(pending).unwrap();
        assert_eq!(report.correct_count(), 2);
        assert_eq!(
            report.incorrect(),
            &[IncorrectAnswer {
                index: idx(1),
                given: Some(ChoiceKey::C),
                expected: ChoiceKey::B,
            }]
        );
        assert_eq!(report.graded_at(), fixed_now());
        assert_eq!(session.state(), SessionState::Graded);
    }

    #[test]
    fn cancel_keeps_session_open() {
        let mut session = QuizSession::new(bank(&["A"]));
        let events = recorder(&mut session);
        session.select_answer(idx(0), ChoiceKey::A).unwrap();

        let pending = session.request_submission().unwrap();
        session.cancel(pending);

        assert_eq!(session.state(), SessionState::Open);
        assert!(session.can_submit());
        assert!(matches!(session.report(), Err(SessionError::NotYetGraded)));
        assert_eq!(events.borrow().last(), Some(&SessionEvent::SubmissionCancelled));

        session.select_answer(idx(0), ChoiceKey::B).unwrap();
        assert_eq!(session.selection(idx(0)).unwrap(), Some(ChoiceKey::B));
    }

    #[test]
    fn graded_session_freezes_answers() {
        let mut session = QuizSession::new(bank(&["A", "B"]));
        answer_all(&mut session, &[ChoiceKey::A, ChoiceKey::A]);
        session.submit_with(|_| true).unwrap();
        let before = session.answers().clone();

        let err = session.select_answer(idx(0), ChoiceKey::B).unwrap_err();
        assert!(matches!(err, SessionError::SessionAlreadyGraded));
        assert_eq!(session.answers(), &before);
        assert!(!session.can_submit());
    }

    #[test]
    fn second_submission_is_rejected_and_report_is_stable() {
        let mut session = QuizSession::new(bank(&["A", "B"]));
        let events = recorder(&mut session);
        answer_all(&mut session, &[ChoiceKey::A, ChoiceKey::B]);

        let first = session.submit_with(|_| true).unwrap().cloned().unwrap();
        assert!(matches!(
            session.request_submission(),
            Err(SessionError::AlreadySubmitted)
        ));
        assert!(matches!(
            session.submit_with(|_| true),
            Err(SessionError::AlreadySubmitted)
        ));

        assert_eq!(session.report().unwrap(), &first);
        assert_eq!(session.report().unwrap(), &first);
        let graded = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Graded { .. }))
            .count();
        assert_eq!(graded, 1);
    }

    #[test]
    fn confirmation_after_a_change_is_stale() {
        let mut session = QuizSession::new(bank(&["A", "B"]));
        answer_all(&mut session, &[ChoiceKey::A, ChoiceKey::B]);

        let pending = session.request_submission().unwrap();
        session.select_answer(idx(1), ChoiceKey::C).unwrap();

        assert!(matches!(
            session.confirm(pending),
            Err(SessionError::StaleSubmission)
        ));
        assert_eq!(session.state(), SessionState::Open);

        let fresh = session.request_submission().unwrap();
        let report = session.confirm(fresh).unwrap();
        assert_eq!(report.incorrect()[0].given, Some(ChoiceKey::C));
    }

    #[test]
    fn handle_from_another_session_is_stale() {
        let shared = bank(&["A"]);
        let mut first = QuizSession::new(Arc::clone(&shared));
        let mut second = QuizSession::new(shared);
        first.select_answer(idx(0), ChoiceKey::A).unwrap();
        second.select_answer(idx(0), ChoiceKey::A).unwrap();

        let pending = first.request_submission().unwrap();
        assert!(matches!(
            second.confirm(pending),
            Err(SessionError::StaleSubmission)
        ));
        assert!(!second.is_graded());
    }

    #[test]
    fn declined_submit_with_returns_none() {
        let mut session = QuizSession::new(bank(&["A"]));
        session.select_answer(idx(0), ChoiceKey::A).unwrap();
        assert!(session.submit_with(|_| false).unwrap().is_none());
        assert!(!session.is_graded());
    }

    #[test]
    fn empty_bank_can_submit_immediately() {
        let mut session = QuizSession::new(Arc::new(QuestionBank::default()));
        assert!(session.can_submit());
        let report = session.submit_with(|_| true).unwrap().unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.correct_count(), 0);
    }

    #[test]
    fn progress_reflects_answers_and_state() {
        let mut session = QuizSession::new(bank(&["A", "B", "C"]));
        session.select_answer(idx(0), ChoiceKey::A).unwrap();
        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.all_answered);
        assert!(!progress.is_graded);
    }
}
