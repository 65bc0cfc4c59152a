mod common;

use std::sync::Arc;

use tokio::sync::Notify;

use common::{backend_form, question_array, ScriptedService};
use prepmate_lib::gemini::{GenerationService, Result as GenResult};
use prepmate_lib::interview::fallback::fallback_questions;
use prepmate_lib::interview::{InterviewError, QuestionGenerator, SessionStore, QUESTIONS_PER_BATCH};
use prepmate_lib::{MemoryStore, PrepApp};

#[tokio::test]
async fn test_short_batches_are_retried() {
    let service = ScriptedService::new(vec![question_array(7), question_array(7), question_array(8)]);
    let generator = QuestionGenerator::new(service);

    let outcome = generator.generate(&backend_form()).await.unwrap();

    assert!(!outcome.is_fallback());
    assert_eq!(outcome.attempts(), 3);
    assert_eq!(generator.service().calls(), 3);
    assert_eq!(outcome.value().questions.len(), 8);
}

#[tokio::test]
async fn test_unparsable_responses_fall_back_after_four_calls() {
    let service = ScriptedService::always("Sure! Here are some great interview questions for you.");
    let generator = QuestionGenerator::new(service);
    let form = backend_form();

    let outcome = generator.generate(&form).await.unwrap();

    assert!(outcome.is_fallback());
    assert_eq!(generator.service().calls(), 4);

    let expected: Vec<String> = fallback_questions(&form).into_iter().map(|q| q.question).collect();
    let actual: Vec<String> = outcome.value().questions.iter().map(|q| q.question.clone()).collect();
    assert_eq!(actual.len(), 8);
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_backend_engineer_example() {
    let fenced = format!("```json\n{}\n```", question_array(8));
    let generator = QuestionGenerator::new(ScriptedService::always(&fenced));
    let form = backend_form();

    let session = generator.generate(&form).await.unwrap().into_value();

    assert_eq!(session.questions.len(), QUESTIONS_PER_BATCH);
    assert!(!session.pinned);
    assert_eq!(session.target_role, "Backend Engineer");
    assert_eq!(session.years_of_experience.as_str(), "4-6");
    assert_eq!(session.form(), form);
}

#[tokio::test]
async fn test_max_retries_is_configurable() {
    let generator = QuestionGenerator::new(ScriptedService::always("[]")).with_max_retries(0);
    let outcome = generator.generate(&backend_form()).await.unwrap();

    assert!(outcome.is_fallback());
    assert_eq!(generator.service().calls(), 1);
}

#[tokio::test]
async fn test_create_session_adds_to_store() {
    let storage = MemoryStore::new();
    let generator = QuestionGenerator::new(ScriptedService::always(&question_array(8)));
    let app = PrepApp::new(generator, SessionStore::open(storage.clone()));

    let created = app.create_session(&backend_form()).await.unwrap().into_value();

    let sessions = app.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, created.id);

    let reopened = SessionStore::open(storage);
    assert_eq!(reopened.sessions()[0].id, created.id);
}

#[tokio::test]
async fn test_invalid_form_is_rejected_before_generation() {
    let generator = QuestionGenerator::new(ScriptedService::always(&question_array(8)));
    let app = PrepApp::new(generator, SessionStore::open(MemoryStore::new()));

    let mut form = backend_form();
    form.topics_to_focus = String::new();

    let result = app.create_session(&form).await;
    assert!(matches!(result, Err(InterviewError::InvalidForm(_))));
    assert!(app.sessions().is_empty());
}

#[tokio::test]
async fn test_load_more_appends_a_batch() {
    let storage = MemoryStore::new();
    let generator = QuestionGenerator::new(ScriptedService::always(&question_array(8)));
    let app = PrepApp::new(generator, SessionStore::open(storage.clone()));

    let created = app.create_session(&backend_form()).await.unwrap().into_value();
    let first_ids: Vec<String> = created.questions.iter().map(|q| q.id.clone()).collect();

    let updated = app.load_more(&created.id).await.unwrap().into_value();

    assert_eq!(updated.questions.len(), 16);
    let kept: Vec<String> = updated.questions[..8].iter().map(|q| q.id.clone()).collect();
    assert_eq!(kept, first_ids);
    assert_eq!(updated.created_at, created.created_at);

    let reopened = SessionStore::open(storage);
    assert_eq!(reopened.get(&created.id).unwrap().questions.len(), 16);
}

#[tokio::test]
async fn test_load_more_unknown_session() {
    let generator = QuestionGenerator::new(ScriptedService::always(&question_array(8)));
    let app = PrepApp::new(generator, SessionStore::open(MemoryStore::new()));

    let result = app.load_more("session-missing").await;
    assert!(matches!(result, Err(InterviewError::SessionNotFound(id)) if id == "session-missing"));
    assert_eq!(app.sessions().len(), 0);
}

/// Blocks inside `generate` until released, so a test can observe the
/// in-flight state.
struct GatedService {
    started: Arc<Notify>,
    release: Arc<Notify>,
    response: String,
}

#[async_trait::async_trait]
impl GenerationService for GatedService {
    async fn generate(&self, _system_instruction: &str, _prompt: &str) -> GenResult<String> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.response.clone())
    }
}

#[tokio::test]
async fn test_concurrent_generation_is_refused() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let service = GatedService {
        started: started.clone(),
        release: release.clone(),
        response: question_array(8),
    };
    let app = PrepApp::new(QuestionGenerator::new(service), SessionStore::open(MemoryStore::new()));
    let form = backend_form();

    let (first, second) = tokio::join!(app.create_session(&form), async {
        started.notified().await;
        assert!(app.is_generating());
        let second = app.create_session(&form).await;
        release.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(InterviewError::GenerationInProgress)));
    assert!(!app.is_generating());
    assert_eq!(app.sessions().len(), 1);
}
