#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use prepmate_lib::gemini::{GenerationError, GenerationService, Result};
use prepmate_lib::interview::{ExperienceLevel, InterviewForm};

/// Replays canned responses in order; the last one repeats once the script runs out.
pub struct ScriptedService {
    responses: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn generate(&self, _system_instruction: &str, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().pop_front();
        match next {
            Some(response) => {
                *self.last.lock() = Some(response.clone());
                Ok(response)
            }
            None => self.last.lock().clone().ok_or(GenerationError::EmptyResponse),
        }
    }
}

pub fn question_array(count: usize) -> String {
    let categories = ["Technical", "Behavioral", "Problem-Solving", "Role-Specific"];
    let items: Vec<String> = (0..count)
        .map(|i| {
            serde_json::json!({
                "question": format!("Generated question {}", i + 1),
                "answer": format!("Generated answer {}", i + 1),
                "category": categories[i % categories.len()],
            })
            .to_string()
        })
        .collect();
    format!("[{}]", items.join(","))
}

pub fn backend_form() -> InterviewForm {
    InterviewForm {
        target_role: "Backend Engineer".to_string(),
        years_of_experience: ExperienceLevel::Mid,
        topics_to_focus: "Go, distributed systems".to_string(),
        description: String::new(),
    }
}
