#![forbid(unsafe_code)]

pub mod json;
pub mod repository;
pub mod sample;

pub use json::JsonFileSource;
pub use repository::{Dataset, InMemorySource, QuestionSource, StorageError};
pub use sample::sample_dataset;
