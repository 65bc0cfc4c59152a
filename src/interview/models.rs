use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::warn;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExperienceLevel {
    #[serde(rename = "0-1")]
    Entry,
    #[serde(rename = "2-3")]
    Junior,
    #[serde(rename = "4-6")]
    Mid,
    #[serde(rename = "7-10")]
    Senior,
    #[serde(rename = "10+")]
    Expert,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Junior,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "0-1",
            ExperienceLevel::Junior => "2-3",
            ExperienceLevel::Mid => "4-6",
            ExperienceLevel::Senior => "7-10",
            ExperienceLevel::Expert => "10+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == trimmed)
            .ok_or_else(|| {
                format!(
                    "Unknown experience level '{}', expected one of: 0-1, 2-3, 4-6, 7-10, 10+",
                    s
                )
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuestionCategory {
    Technical,
    Behavioral,
    ProblemSolving,
    RoleSpecific,
    /// Placeholder for model output that named no usable category.
    General,
}

impl QuestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Technical => "Technical",
            QuestionCategory::Behavioral => "Behavioral",
            QuestionCategory::ProblemSolving => "Problem-Solving",
            QuestionCategory::RoleSpecific => "Role-Specific",
            QuestionCategory::General => "General",
        }
    }

    /// Case and separator insensitive; anything unrecognised is `General`.
    pub fn parse_lenient(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "technical" => QuestionCategory::Technical,
            "behavioral" | "behavioural" => QuestionCategory::Behavioral,
            "problemsolving" => QuestionCategory::ProblemSolving,
            "rolespecific" => QuestionCategory::RoleSpecific,
            _ => QuestionCategory::General,
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QuestionCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuestionCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(QuestionCategory::parse_lenient(&raw))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InterviewQuestion {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
}

impl InterviewQuestion {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, category: QuestionCategory) -> Self {
        Self {
            id: format!("q-{}", Uuid::new_v4()),
            question: question.into(),
            answer: answer.into(),
            category,
        }
    }
}

/// What the user fills in to request a session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterviewForm {
    #[validate(custom = "not_blank")]
    pub target_role: String,
    pub years_of_experience: ExperienceLevel,
    #[validate(custom = "not_blank")]
    pub topics_to_focus: String,
    #[serde(default)]
    pub description: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: String,
    pub target_role: String,
    pub years_of_experience: ExperienceLevel,
    pub topics_to_focus: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<InterviewQuestion>,
    #[serde(default = "unix_epoch", deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
}

impl InterviewSession {
    pub fn new(form: &InterviewForm, questions: Vec<InterviewQuestion>) -> Self {
        Self {
            id: format!("session-{}", Uuid::new_v4()),
            target_role: form.target_role.clone(),
            years_of_experience: form.years_of_experience,
            topics_to_focus: form.topics_to_focus.clone(),
            description: form.description.clone(),
            questions,
            created_at: Utc::now(),
            pinned: false,
        }
    }

    /// The form this session was generated from, used to fetch another batch.
    pub fn form(&self) -> InterviewForm {
        InterviewForm {
            target_role: self.target_role.clone(),
            years_of_experience: self.years_of_experience,
            topics_to_focus: self.topics_to_focus.clone(),
            description: self.description.clone(),
        }
    }
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Fractional(f64),
    Other(IgnoredAny),
}

/// Stored timestamps are normally RFC 3339 strings. Epoch milliseconds and
/// naive ISO strings are accepted too; anything else becomes the Unix epoch
/// rather than failing the whole collection.
fn deserialize_created_at<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = RawTimestamp::deserialize(deserializer)?;
    let parsed = match &raw {
        RawTimestamp::Text(text) => parse_timestamp_text(text),
        RawTimestamp::Millis(millis) => Utc.timestamp_millis_opt(*millis).single(),
        RawTimestamp::Fractional(millis) => Utc.timestamp_millis_opt(*millis as i64).single(),
        RawTimestamp::Other(_) => None,
    };

    Ok(parsed.unwrap_or_else(|| {
        warn!("⚠️ Unparsable createdAt in stored session, using Unix epoch");
        unix_epoch()
    }))
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
