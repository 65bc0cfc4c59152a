pub mod app;
pub mod auth;
pub mod config;
pub mod env;
pub mod gemini;
pub mod interview;
pub mod storage;

pub use app::PrepApp;
pub use config::Settings;
pub use gemini::{GeminiClient, GenerationError, GenerationService};
pub use interview::{
    InterviewError, InterviewForm, InterviewQuestion, InterviewSession, QuestionGenerator, RetryOutcome,
    SessionStore,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Builds the Gemini-backed generator from settings and the environment.
///
/// A missing `GEMINI_API_KEY` is reported here, before any request is made.
pub fn gemini_generator(settings: &Settings) -> Result<QuestionGenerator<GeminiClient>, GenerationError> {
    let client = GeminiClient::new(env::get_env_var("GEMINI_API_KEY"))?
        .with_base_url(settings.gemini_base_url.clone())
        .with_model(settings.gemini_model.clone());

    Ok(QuestionGenerator::new(client).with_max_retries(settings.max_retries))
}
