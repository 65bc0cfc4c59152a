pub mod fallback;
pub mod generator;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod retry;
pub mod store;

pub use generator::{QuestionGenerator, QUESTIONS_PER_BATCH};
pub use models::{ExperienceLevel, InterviewForm, InterviewQuestion, InterviewSession, QuestionCategory};
pub use retry::{with_retry, AttemptError, RetryOutcome};
pub use store::{SessionStore, SESSIONS_KEY};

use thiserror::Error;

use crate::gemini::GenerationError;

#[derive(Error, Debug)]
pub enum InterviewError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] GenerationError),
    #[error("Invalid interview form: {0}")]
    InvalidForm(#[from] validator::ValidationErrors),
    #[error("A generation request is already in progress")]
    GenerationInProgress,
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

pub type Result<T> = std::result::Result<T, InterviewError>;
