use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use parking_lot::Mutex;
use validator::Validate;

use crate::gemini::GenerationService;
use crate::interview::{
    InterviewError, InterviewForm, InterviewSession, QuestionGenerator, Result, RetryOutcome, SessionStore,
};
use crate::storage::KeyValueStore;

/// Dashboard-level operations: create sessions and load more questions.
///
/// At most one generation runs at a time; a second request while one is in
/// flight is refused with `GenerationInProgress`.
pub struct PrepApp<G, S> {
    generator: QuestionGenerator<G>,
    store: Mutex<SessionStore<S>>,
    generating: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<G: GenerationService, S: KeyValueStore> PrepApp<G, S> {
    pub fn new(generator: QuestionGenerator<G>, store: SessionStore<S>) -> Self {
        Self {
            generator,
            store: Mutex::new(store),
            generating: AtomicBool::new(false),
        }
    }

    pub fn sessions(&self) -> Vec<InterviewSession> {
        self.store.lock().sessions().to_vec()
    }

    pub fn session(&self, id: &str) -> Option<InterviewSession> {
        self.store.lock().get(id).cloned()
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    pub fn delete_session(&self, id: &str) -> bool {
        self.store.lock().delete(id)
    }

    pub fn toggle_pin(&self, id: &str) -> Option<bool> {
        self.store.lock().toggle_pin(id)
    }

    /// Generates a session for `form` and adds it to the store.
    pub async fn create_session(&self, form: &InterviewForm) -> Result<RetryOutcome<InterviewSession>> {
        form.validate()?;
        let _guard = self.begin_generation()?;

        let outcome = self.generator.generate(form).await?;
        self.store.lock().add(outcome.value().clone());
        Ok(outcome)
    }

    /// Generates another batch with the session's own parameters and
    /// appends it to the session's questions.
    pub async fn load_more(&self, id: &str) -> Result<RetryOutcome<InterviewSession>> {
        let form = self
            .session(id)
            .map(|s| s.form())
            .ok_or_else(|| InterviewError::SessionNotFound(id.to_string()))?;
        let _guard = self.begin_generation()?;

        let batch = self.generator.generate_batch(&form).await?;

        let mut store = self.store.lock();
        // The session may have been deleted while the batch was generating
        let mut session = store
            .get(id)
            .cloned()
            .ok_or_else(|| InterviewError::SessionNotFound(id.to_string()))?;

        let outcome = batch.map(|questions| {
            session.questions.extend(questions);
            session
        });
        store.update(outcome.value().clone());

        info!(
            "✅ More questions loaded, session {} now has {}",
            id,
            outcome.value().questions.len()
        );
        Ok(outcome)
    }

    fn begin_generation(&self) -> Result<InFlight<'_>> {
        if self
            .generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("⚠️ Generation already in progress, ignoring request");
            return Err(InterviewError::GenerationInProgress);
        }
        Ok(InFlight(&self.generating))
    }
}
