use super::models::{InterviewForm, InterviewQuestion, QuestionCategory};

/// Hand-written batch used once every generation attempt has failed.
///
/// Always eight questions in the same shape as a generated batch:
/// 3 technical, 2 behavioral, 2 problem-solving, 1 role-specific.
pub fn fallback_questions(form: &InterviewForm) -> Vec<InterviewQuestion> {
    let role = form.target_role.trim();
    let topics = form.topics_to_focus.trim();
    let years = form.years_of_experience.as_str();

    vec![
        InterviewQuestion::new(
            format!("Describe your experience using {} in a {} role.", topics, role),
            format!(
                "Structure the answer with the STAR method (Situation, Task, Action, Result). Pick one concrete project where you relied on {topics}, explain what the team needed, what you personally built or changed, and what measurably improved afterwards. Mention the trade-offs you considered, how your {years} years of experience shaped the decisions, and what you would do differently today. Close with how that project prepared you for the responsibilities of a {role}."
            ),
            QuestionCategory::Technical,
        ),
        InterviewQuestion::new(
            format!("What are the most common pitfalls when working with {}, and how do you avoid them?", topics),
            format!(
                "Name two or three pitfalls you have actually hit with {topics}, such as unclear ownership of shared state, missing error handling at integration points, or performance assumptions that did not hold under real load. For each one, explain how you noticed it, how you fixed it, and which habit, review checklist, or automated test now stops it from coming back. Interviewers for a {role} position want to hear that you learn from incidents rather than just recall documentation."
            ),
            QuestionCategory::Technical,
        ),
        InterviewQuestion::new(
            format!("How do you keep code that uses {} testable and maintainable over time?", topics),
            format!(
                "Talk about module boundaries, dependency injection at the seams that touch external systems, and a test pyramid that keeps fast unit tests close to the logic. Give an example from your {years} years of experience where a refactor toward clearer interfaces made a change to {topics} code cheap instead of risky. Mention code review practices, documentation of invariants, and how you decide when technical debt is worth paying down for a {role} team."
            ),
            QuestionCategory::Technical,
        ),
        InterviewQuestion::new(
            format!("Tell me about a time you worked with a team to solve a problem involving {}.", topics),
            format!(
                "Use the STAR method. Set the scene briefly, state the shared goal, then focus on your own actions: how you split the work, how you kept everyone informed, and how you handled disagreement about the approach to {topics}. Finish with the outcome and one lesson about collaboration you still apply. Keep the spotlight on your contribution while giving credit to teammates, which is what a {role} hiring panel listens for."
            ),
            QuestionCategory::Behavioral,
        ),
        InterviewQuestion::new(
            format!("Describe a conflict you faced on a {} project and how you resolved it.", role),
            format!(
                "Choose a real disagreement, for example about scope, deadlines, or a technical direction. Explain both viewpoints fairly, then describe how you moved the discussion toward data: a prototype, a benchmark, or a written comparison of options. Show that you listened, that you were willing to change your mind, and that the relationship stayed intact. Tie the resolution back to the project result and to what your {years} years of experience taught you about handling conflict early."
            ),
            QuestionCategory::Behavioral,
        ),
        InterviewQuestion::new(
            format!("How would you design a system that relies heavily on {}?", topics),
            format!(
                "Start by clarifying requirements: expected load, latency targets, consistency needs, and failure tolerance. Sketch the main components and the data flow between them, then explain where {topics} fits and why. Discuss scaling strategy, caching, observability, and how the design degrades when a dependency is unavailable. Call out the trade-offs explicitly and say which parts you would build first to validate the riskiest assumptions, as a {role} would in a real design review."
            ),
            QuestionCategory::ProblemSolving,
        ),
        InterviewQuestion::new(
            format!("A production issue involving {} is affecting users. Walk me through how you debug it.", topics),
            format!(
                "Describe a calm, systematic approach: confirm the impact, stabilise first with a rollback or feature flag if one is available, then gather evidence from logs, metrics, and recent changes. Form a hypothesis, reproduce it in a safe environment, and verify the fix before rolling it out. Afterwards, write a blameless post-mortem with concrete follow-ups. Use an example from your {years} years of experience to show how this played out on a {role} team."
            ),
            QuestionCategory::ProblemSolving,
        ),
        InterviewQuestion::new(
            format!("Why are you a strong fit for this {} position?", role),
            format!(
                "Connect your background directly to the role. Summarise the {years} years of experience that matter most, highlight two achievements involving {topics} with measurable results, and explain what you want to learn next. Show that you understand what a {role} is accountable for day to day and how you would contribute in the first few months. End with a genuine reason this particular team or product interests you."
            ),
            QuestionCategory::RoleSpecific,
        ),
    ]
}
