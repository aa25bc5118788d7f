use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::choice::{Choice, ChoiceKey, ChoiceKeyError};
use crate::model::ids::QuestionIndex;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a single question definition cannot be served.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question has no choices")]
    NoChoices,

    #[error("invalid choice key {raw:?}")]
    InvalidKey { raw: String },

    #[error("choice {key} has empty text")]
    EmptyChoiceText { key: ChoiceKey },

    #[error("choice key {key} appears more than once")]
    DuplicateKey { key: ChoiceKey },

    #[error("answer key {answer} is not one of the question's choice keys")]
    AnswerNotAmongChoices { answer: ChoiceKey },
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unvalidated choice as it appears in a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDraft {
    pub key: String,
    pub text: String,
}

impl ChoiceDraft {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// Unvalidated question definition as it appears in a dataset.
///
/// Keys stay raw strings so that a malformed letter surfaces as a dataset
/// integrity failure for this question rather than a parse failure for the
/// whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    pub choices: Vec<ChoiceDraft>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl QuestionDraft {
    /// Validate this draft into a record at the given position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, choices are missing,
    /// malformed or duplicated, or the answer key is not among the choices.
    pub fn validate(self, index: QuestionIndex) -> Result<QuestionRecord, QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.choices.is_empty() {
            return Err(QuestionError::NoChoices);
        }

        let mut choices: Vec<Choice> = Vec::with_capacity(self.choices.len());
        for draft in self.choices {
            let key = parse_key(&draft.key)?;
            if choices.iter().any(|c| c.key() == key) {
                return Err(QuestionError::DuplicateKey { key });
            }
            let choice = Choice::new(key, draft.text).map_err(|err| match err {
                ChoiceKeyError::EmptyText => QuestionError::EmptyChoiceText { key },
                ChoiceKeyError::Invalid { raw } => QuestionError::InvalidKey { raw },
            })?;
            choices.push(choice);
        }

        let answer = parse_key(&self.answer)?;
        if !choices.iter().any(|c| c.key() == answer) {
            return Err(QuestionError::AnswerNotAmongChoices { answer });
        }

        Ok(QuestionRecord {
            index,
            text: self.text,
            passage: self.passage.filter(|p| !p.trim().is_empty()),
            choices,
            answer,
            image: self.image.filter(|i| !i.trim().is_empty()),
        })
    }
}

fn parse_key(raw: &str) -> Result<ChoiceKey, QuestionError> {
    raw.parse::<ChoiceKey>()
        .map_err(|_| QuestionError::InvalidKey {
            raw: raw.to_string(),
        })
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// A validated, immutable question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    index: QuestionIndex,
    text: String,
    passage: Option<String>,
    choices: Vec<Choice>,
    answer: ChoiceKey,
    image: Option<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn index(&self) -> QuestionIndex {
        self.index
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn passage(&self) -> Option<&str> {
        self.passage.as_deref()
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// The correct choice key.
    #[must_use]
    pub fn answer(&self) -> ChoiceKey {
        self.answer
    }

    /// Opaque display asset reference; never interpreted here.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn has_choice(&self, key: ChoiceKey) -> bool {
        self.choices.iter().any(|c| c.key() == key)
    }

    #[must_use]
    pub fn choice(&self, key: ChoiceKey) -> Option<&Choice> {
        self.choices.iter().find(|c| c.key() == key)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
