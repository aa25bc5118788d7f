use thiserror::Error;

use crate::model::ids::QuestionIndex;
use crate::model::question::{QuestionDraft, QuestionError, QuestionRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    /// The dataset cannot be served; fatal at startup.
    #[error("dataset integrity error at question {index}: {reason}")]
    DatasetIntegrity {
        index: QuestionIndex,
        #[source]
        reason: QuestionError,
    },

    #[error("question index {index} out of range (bank has {len} questions)")]
    IndexOutOfRange { index: QuestionIndex, len: usize },
}

/// Ordered, immutable collection of validated questions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    questions: Vec<QuestionRecord>,
}

impl QuestionBank {
    /// Validate every draft and build the bank.
    ///
    /// Indices are assigned in input order. An empty input yields an empty bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DatasetIntegrity` for the first draft that fails
    /// validation; no bank is produced in that case.
    pub fn load(drafts: impl IntoIterator<Item = QuestionDraft>) -> Result<Self, BankError> {
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| {
                let index = QuestionIndex::new(i);
                draft
                    .validate(index)
                    .map_err(|reason| BankError::DatasetIntegrity { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { questions })
    }

    /// # Errors
    ///
    /// Returns `BankError::IndexOutOfRange` if `index` is not in `0..len()`.
    pub fn get(&self, index: QuestionIndex) -> Result<&QuestionRecord, BankError> {
        self.questions
            .get(index.value())
            .ok_or(BankError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.questions.iter()
    }

    pub fn indices(&self) -> impl Iterator<Item = QuestionIndex> + use<> {
        (0..self.questions.len()).map(QuestionIndex::new)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
