use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::models::{InterviewQuestion, QuestionCategory};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\s*```$").expect("code fence pattern is valid")
});

const MISSING_QUESTION: &str = "Missing question";
const MISSING_ANSWER: &str = "No answer provided";

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Response is not an array")]
    NotAnArray,
    #[error("Insufficient questions ({found}, need {required})")]
    Insufficient { found: usize, required: usize },
}

/// Removes a surrounding markdown code fence (```json ... ``` or ``` ... ```).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => trimmed,
    }
}

/// Parses a model response into questions.
///
/// The batch is rejected when it is not a JSON array or holds fewer than
/// `required` elements. Individual elements missing a field are kept, with a
/// placeholder in place of each missing value.
pub fn parse_question_batch(text: &str, required: usize) -> Result<Vec<InterviewQuestion>, BatchError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;
    let elements = match value {
        Value::Array(elements) => elements,
        _ => return Err(BatchError::NotAnArray),
    };

    if elements.len() < required {
        return Err(BatchError::Insufficient {
            found: elements.len(),
            required,
        });
    }

    Ok(elements
        .iter()
        .enumerate()
        .map(|(index, element)| repair_element(index, element))
        .collect())
}

fn repair_element(index: usize, element: &Value) -> InterviewQuestion {
    let question = non_empty_str(element, "question");
    let answer = non_empty_str(element, "answer");
    let category = non_empty_str(element, "category");

    if question.is_none() || answer.is_none() || category.is_none() {
        log::warn!("⚠️ Invalid question object at index {}: {}", index, element);
    }

    InterviewQuestion::new(
        question.unwrap_or(MISSING_QUESTION),
        answer.unwrap_or(MISSING_ANSWER),
        category
            .map(QuestionCategory::parse_lenient)
            .unwrap_or(QuestionCategory::General),
    )
}

fn non_empty_str<'a>(element: &'a Value, field: &str) -> Option<&'a str> {
    element
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_json(count: usize) -> String {
        let items: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"question":"Q{}","answer":"A{}","category":"Technical"}}"#,
                    i, i
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  ```json [1] ```  "), "[1]");
        assert_eq!(strip_code_fence("[1]"), "[1]");
        assert_eq!(strip_code_fence("Sure! ```json\n[1]\n```"), "Sure! ```json\n[1]\n```");
    }

    #[test]
    fn test_parse_valid_fenced_batch() {
        let text = format!("```json\n{}\n```", batch_json(8));
        let questions = parse_question_batch(&text, 8).unwrap();

        assert_eq!(questions.len(), 8);
        assert_eq!(questions[3].question, "Q3");
        assert_eq!(questions[3].category, QuestionCategory::Technical);

        let mut ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_parse_rejects_short_and_non_array() {
        assert!(matches!(
            parse_question_batch(&batch_json(7), 8),
            Err(BatchError::Insufficient { found: 7, required: 8 })
        ));
        assert!(matches!(
            parse_question_batch(r#"{"questions": []}"#, 8),
            Err(BatchError::NotAnArray)
        ));
        assert!(matches!(
            parse_question_batch("Here are your questions:", 8),
            Err(BatchError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_keeps_extra_elements() {
        assert_eq!(parse_question_batch(&batch_json(10), 8).unwrap().len(), 10);
    }

    #[test]
    fn test_malformed_elements_are_repaired() {
        let mut items: Vec<String> = (0..6)
            .map(|i| format!(r#"{{"question":"Q{}","answer":"A{}","category":"Behavioral"}}"#, i, i))
            .collect();
        items.push(r#"{"question":"Only a question"}"#.to_string());
        items.push(r#""just a string""#.to_string());
        let text = format!("[{}]", items.join(","));

        let questions = parse_question_batch(&text, 8).unwrap();
        assert_eq!(questions.len(), 8);

        assert_eq!(questions[6].question, "Only a question");
        assert_eq!(questions[6].answer, MISSING_ANSWER);
        assert_eq!(questions[6].category, QuestionCategory::General);

        assert_eq!(questions[7].question, MISSING_QUESTION);
        assert_eq!(questions[7].answer, MISSING_ANSWER);
    }

    #[test]
    fn test_null_elements_count_and_are_repaired() {
        let text = format!("[null,{}]", &batch_json(7)[1..]);
        let questions = parse_question_batch(&text, 8).unwrap();

        assert_eq!(questions.len(), 8);
        assert_eq!(questions[0].question, MISSING_QUESTION);
        assert_eq!(questions[0].answer, MISSING_ANSWER);
        assert_eq!(questions[0].category, QuestionCategory::General);
        assert_eq!(questions[1].question, "Q0");
    }
}
