use thiserror::Error;

use crate::model::bank::QuestionBank;
use crate::model::choice::ChoiceKey;
use crate::model::ids::QuestionIndex;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerSheetError {
    #[error("question index {index} out of range (sheet has {len} slots)")]
    IndexOutOfRange { index: QuestionIndex, len: usize },

    #[error("choice {key} is not valid for question {index}")]
    InvalidChoiceKey { index: QuestionIndex, key: ChoiceKey },
}

/// Per-question selections for one attempt.
///
/// Each slot is either unanswered (`None`) or holds the chosen key.
/// `revision` increases by one on every accepted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    slots: Vec<Option<ChoiceKey>>,
    revision: u64,
}

impl AnswerSheet {
    /// Sheet with `len` unanswered slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            revision: 0,
        }
    }

    /// Sheet sized for the given bank.
    #[must_use]
    pub fn for_bank(bank: &QuestionBank) -> Self {
        Self::new(bank.len())
    }

    /// # Errors
    ///
    /// Returns `AnswerSheetError::IndexOutOfRange` for indices past the end.
    pub fn get(&self, index: QuestionIndex) -> Result<Option<ChoiceKey>, AnswerSheetError> {
        self.slots
            .get(index.value())
            .copied()
            .ok_or(AnswerSheetError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            })
    }

    /// Record `key` for `index`, replacing any earlier selection.
    ///
    /// Rejected calls leave the sheet untouched.
    ///
    /// # Errors
    ///
    /// Returns `AnswerSheetError::IndexOutOfRange` if the index is not in the
    /// sheet or bank, and `AnswerSheetError::InvalidChoiceKey` if the key is not
    /// one of that question's choices.
    pub fn set(
        &mut self,
        bank: &QuestionBank,
        index: QuestionIndex,
        key: ChoiceKey,
    ) -> Result<(), AnswerSheetError> {
        let len = self.slots.len();
        let question = bank
            .get(index)
            .map_err(|_| AnswerSheetError::IndexOutOfRange { index, len })?;
        if !question.has_choice(key) {
            return Err(AnswerSheetError::InvalidChoiceKey { index, key });
        }
        let slot = self
            .slots
            .get_mut(index.value())
            .ok_or(AnswerSheetError::IndexOutOfRange { index, len })?;

        *slot = Some(key);
        self.revision += 1;
        Ok(())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Unanswered indices in ascending order.
    #[must_use]
    pub fn unanswered(&self) -> Vec<QuestionIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| QuestionIndex::new(i))
            .collect()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionIndex, Option<ChoiceKey>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (QuestionIndex::new(i), *slot))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
