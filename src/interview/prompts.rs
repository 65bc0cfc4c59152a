use super::models::InterviewForm;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert interview coach. Generate exactly 8 realistic, relevant interview questions with comprehensive answers. Respond with a valid JSON array only, containing objects with 'question', 'answer', and 'category' fields. Do not include markdown, backticks, or any text outside the JSON array. Example: [{\"question\": \"Example question\", \"answer\": \"Example answer\", \"category\": \"Technical\"}]";

pub fn build_question_prompt(form: &InterviewForm) -> String {
    let description = if form.description.trim().is_empty() {
        "None"
    } else {
        form.description.trim()
    };

    let mut prompt = String::from("Generate exactly 8 interview questions with detailed answers for the following role:\n\n");
    prompt.push_str(&format!("Role: {}\n", form.target_role));
    prompt.push_str(&format!(
        "Experience Level: {} years ({})\n",
        form.years_of_experience,
        form.years_of_experience.label()
    ));
    prompt.push_str(&format!("Topics to Focus: {}\n", form.topics_to_focus));
    prompt.push_str(&format!("Additional Context: {}\n", description));

    prompt.push_str("\nProvide questions appropriate for the experience level, covering the specified topics. Include a mix of:");
    prompt.push_str(&format!(
        "\n- 3 Technical questions (e.g., coding, tools like {})",
        form.topics_to_focus
    ));
    prompt.push_str("\n- 2 Behavioral questions (e.g., teamwork, conflict resolution)");
    prompt.push_str("\n- 2 Problem-solving scenarios (e.g., system design, debugging)");
    prompt.push_str(&format!(
        "\n- 1 Role-specific question (e.g., specific to {})",
        form.target_role
    ));

    prompt.push_str("\n\nEach question must have:");
    prompt.push_str("\n- question: the interview question (string)");
    prompt.push_str("\n- answer: a comprehensive answer with examples (string, at least 100 words)");
    prompt.push_str("\n- category: one of Technical, Behavioral, Problem-Solving, Role-Specific (string)");
    prompt.push_str("\n\nReturn a JSON array only, e.g., [{\"question\": \"...\", \"answer\": \"...\", \"category\": \"...\"}, ...].");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::ExperienceLevel;

    #[test]
    fn test_prompt_embeds_form_fields() {
        let form = InterviewForm {
            target_role: "Data Scientist".to_string(),
            years_of_experience: ExperienceLevel::Senior,
            topics_to_focus: "Python, SQL".to_string(),
            description: "  ".to_string(),
        };
        let prompt = build_question_prompt(&form);

        assert!(prompt.contains("Role: Data Scientist"));
        assert!(prompt.contains("Experience Level: 7-10 years (Senior)"));
        assert!(prompt.contains("tools like Python, SQL"));
        assert!(prompt.contains("Additional Context: None"));
        assert!(prompt.contains("at least 100 words"));
    }
}
