//! JSON dataset files.
//!
//! ```json
//! {
//!   "title": "World History",
//!   "questions": [
//!     {
//!       "text": "Which empire built Machu Picchu?",
//!       "passage": "optional context",
//!       "choices": [{ "key": "A", "text": "Inca" }, { "key": "B", "text": "Aztec" }],
//!       "answer": "A",
//!       "image": "/images/q1.png"
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::repository::{Dataset, QuestionSource, StorageError};

/// Dataset stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `dataset` to `path` as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written and
    /// `StorageError::Serialize` if the dataset cannot be encoded.
    pub fn write(path: impl AsRef<Path>, dataset: &Dataset) -> Result<(), StorageError> {
        let path = path.as_ref();
        let io_err = |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(dataset).map_err(|source| StorageError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, body).map_err(io_err)?;
        tracing::info!(path = %path.display(), questions = dataset.questions.len(), "dataset written");
        Ok(())
    }
}

impl QuestionSource for JsonFileSource {
    fn load_dataset(&self) -> Result<Dataset, StorageError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                StorageError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let dataset: Dataset = serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            path = %self.path.display(),
            questions = dataset.questions.len(),
            "dataset read"
        );
        Ok(dataset)
    }
}
