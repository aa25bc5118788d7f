mod events;
mod progress;
mod service;
mod submission;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use events::{SessionEvent, SessionObserver};
pub use progress::SessionProgress;
pub use service::{QuizSession, SessionId, SessionState};
pub use submission::PendingSubmission;
pub use workflow::QuizService;
