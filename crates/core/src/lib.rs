#![forbid(unsafe_code)]

//! Domain model for a single-attempt multiple-choice quiz.
//!
//! Nothing here performs I/O; question datasets arrive as [`model::QuestionDraft`]s
//! and are validated into an immutable [`model::QuestionBank`].

pub mod model;
pub mod time;

pub use time::Clock;
