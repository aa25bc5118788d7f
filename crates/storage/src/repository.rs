use std::path::PathBuf;

use quiz_core::model::{BankError, QuestionBank, QuestionDraft};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("dataset I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode dataset {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Bank(#[from] BankError),
}

/// On-disk shape of a question dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: Vec<QuestionDraft>,
}

impl Dataset {
    #[must_use]
    pub fn new(title: Option<String>, questions: Vec<QuestionDraft>) -> Self {
        Self { title, questions }
    }

    /// Validate the questions into a bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Bank` if any question fails the integrity check.
    pub fn into_bank(self) -> Result<QuestionBank, StorageError> {
        Ok(QuestionBank::load(self.questions)?)
    }
}

/// Read-only provider of question datasets.
pub trait QuestionSource: Send + Sync {
    /// Fetch the raw dataset.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the dataset cannot be read or parsed.
    fn load_dataset(&self) -> Result<Dataset, StorageError>;

    /// Fetch and validate the dataset in one step.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Bank` on integrity failure, or any read error.
    fn load_bank(&self) -> Result<QuestionBank, StorageError> {
        let dataset = self.load_dataset()?;
        let bank = dataset.into_bank()?;
        tracing::debug!(questions = bank.len(), "question bank loaded");
        Ok(bank)
    }
}

/// Source backed by an in-memory dataset, useful for tests and bundled quizzes.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    dataset: Dataset,
}

impl InMemorySource {
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    #[must_use]
    pub fn from_questions(questions: Vec<QuestionDraft>) -> Self {
        Self::new(Dataset::new(None, questions))
    }
}

impl QuestionSource for InMemorySource {
    fn load_dataset(&self) -> Result<Dataset, StorageError> {
        Ok(self.dataset.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ChoiceDraft, QuestionIndex};

    fn draft(answer: &str) -> QuestionDraft {
        QuestionDraft {
            text: "2 + 2 = ?".into(),
            passage: None,
            choices: vec![ChoiceDraft::new("A", "3"), ChoiceDraft::new("B", "4")],
            answer: answer.into(),
            image: None,
        }
    }

    #[test]
    fn in_memory_source_builds_bank() {
        let source = InMemorySource::from_questions(vec![draft("B"), draft("A")]);
        let bank = source.load_bank().unwrap();
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn integrity_failure_yields_no_bank() {
        let source = InMemorySource::from_questions(vec![draft("B"), draft("C")]);
        let err = source.load_bank().unwrap_err();
        match err {
            StorageError::Bank(BankError::DatasetIntegrity { index, .. }) => {
                assert_eq!(index, QuestionIndex::new(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn encode_and_decode_failures_are_reported_distinctly() {
        let path = PathBuf::from("quiz.json");
        let decode = StorageError::Parse {
            path: path.clone(),
            source: serde_json::from_str::<Dataset>("{").unwrap_err(),
        };
        let encode = StorageError::Serialize {
            path,
            source: serde_json::from_str::<Dataset>("{").unwrap_err(),
        };
        assert!(decode.to_string().starts_with("malformed dataset quiz.json"));
        assert!(encode.to_string().starts_with("failed to encode dataset quiz.json"));
    }
}
