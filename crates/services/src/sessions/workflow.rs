use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::QuestionBank;
use storage::QuestionSource;

use super::service::QuizSession;
use crate::error::SessionError;

/// Loads a question bank once and opens sessions against it.
#[derive(Debug, Clone)]
pub struct QuizService {
    clock: Clock,
    title: Option<String>,
    bank: Arc<QuestionBank>,
}

impl QuizService {
    /// Read and validate the dataset from `source`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the dataset cannot be read or fails
    /// the integrity check. No service is built in that case.
    pub fn load(source: &dyn QuestionSource) -> Result<Self, SessionError> {
        let dataset = source.load_dataset()?;
        let title = dataset.title.clone();
        let bank = dataset.into_bank()?;
        tracing::info!(questions = bank.len(), title = ?title, "quiz loaded");
        Ok(Self {
            clock: Clock::default(),
            title,
            bank: Arc::new(bank),
        })
    }

    /// Wrap an already validated bank.
    #[must_use]
    pub fn from_bank(bank: QuestionBank) -> Self {
        Self {
            clock: Clock::default(),
            title: None,
            bank: Arc::new(bank),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    /// Open a fresh session; every question starts unanswered.
    #[must_use]
    pub fn start_session(&self) -> QuizSession {
        QuizSession::with_clock(Arc::clone(&self.bank), self.clock)
    }
}
