use log::{debug, info};

use crate::gemini::{GenerationError, GenerationService};

use super::fallback::fallback_questions;
use super::models::{InterviewForm, InterviewQuestion, InterviewSession};
use super::parser::parse_question_batch;
use super::prompts::{build_question_prompt, SYSTEM_INSTRUCTION};
use super::retry::{with_retry, AttemptError, RetryOutcome};

pub const QUESTIONS_PER_BATCH: usize = 8;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Turns an interview form into a batch of questions using a generation
/// service, retrying malformed output and falling back to a canned batch.
pub struct QuestionGenerator<G> {
    service: G,
    max_retries: u32,
}

impl<G: GenerationService> QuestionGenerator<G> {
    pub fn new(service: G) -> Self {
        Self {
            service,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn service(&self) -> &G {
        &self.service
    }

    /// Generates one batch. Only a missing credential is returned as an
    /// error; every other failure is retried and then replaced by the
    /// fallback batch.
    pub async fn generate_batch(
        &self,
        form: &InterviewForm,
    ) -> Result<RetryOutcome<Vec<InterviewQuestion>>, GenerationError> {
        info!(
            "🤖 Generating {} questions for {} ({} years)",
            QUESTIONS_PER_BATCH, form.target_role, form.years_of_experience
        );

        let prompt = build_question_prompt(form);
        let service = &self.service;
        let prompt_ref = prompt.as_str();

        with_retry(
            self.max_retries.saturating_add(1),
            move |attempt| {
                info!("Attempt: {}", attempt);
                service.generate(SYSTEM_INSTRUCTION, prompt_ref)
            },
            |response: crate::gemini::Result<String>| match response {
                Ok(text) => {
                    info!("Response length: {}", text.len());
                    debug!("Raw generation response: {}", text);
                    parse_question_batch(&text, QUESTIONS_PER_BATCH).map_err(|e| {
                        AttemptError::Retryable(GenerationError::MalformedResponse(e.to_string()))
                    })
                }
                Err(GenerationError::MissingApiKey) => Err(AttemptError::Fatal(GenerationError::MissingApiKey)),
                Err(e) => Err(AttemptError::Retryable(e)),
            },
            || fallback_questions(form),
        )
        .await
    }

    /// Generates a complete, unpinned session for `form`.
    pub async fn generate(
        &self,
        form: &InterviewForm,
    ) -> Result<RetryOutcome<InterviewSession>, GenerationError> {
        let outcome = self.generate_batch(form).await?;
        let outcome = outcome.map(|questions| InterviewSession::new(form, questions));

        info!(
            "✅ Generated session {} with {} questions{}",
            outcome.value().id,
            outcome.value().questions.len(),
            if outcome.is_fallback() { " (fallback)" } else { "" }
        );

        Ok(outcome)
    }
}
