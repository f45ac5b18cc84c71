use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use super::error::QuizError;

pub type QuestionSetId = Uuid;

pub const MIN_QUESTION_LEN: usize = 6;
pub const MIN_REASON_LEN: usize = 3;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    pub id: QuestionSetId,
    pub title: String,
    pub subject: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionSet {
    pub fn summary(&self) -> QuestionSetSummary {
        QuestionSetSummary {
            id: self.id,
            title: self.title.clone(),
            subject: self.subject.clone(),
            created_at: self.created_at,
            question_count: self.questions.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSetSummary {
    pub id: QuestionSetId,
    pub title: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
    pub question_count: usize,
}

/// Input for creating a question set. Every field defaults so that a partial
/// JSON document reaches validation instead of failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewQuestionSet {
    pub title: String,
    pub subject: String,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

impl NewQuestion {
    pub fn new(question: &str, answer: &str, difficulty: Difficulty) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            difficulty,
        }
    }
}

impl NewQuestionSet {
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.title.trim().is_empty() {
            return Err(QuizError::validation("title", "Title is required"));
        }
        if self.subject.trim().is_empty() {
            return Err(QuizError::validation("subject", "Subject is required"));
        }
        if self.questions.is_empty() {
            return Err(QuizError::validation(
                "questions",
                "At least one question is required",
            ));
        }
        for (idx, question) in self.questions.iter().enumerate() {
            if question.question.trim().chars().count() < MIN_QUESTION_LEN {
                return Err(QuizError::validation(
                    "question",
                    format!(
                        "Question {}: must be at least {MIN_QUESTION_LEN} characters",
                        idx + 1
                    ),
                ));
            }
            if question.answer.trim().is_empty() {
                return Err(QuizError::validation(
                    "answer",
                    format!("Question {}: answer cannot be empty", idx + 1),
                ));
            }
        }
        Ok(())
    }

    /// Validates and stamps the input into a stored record with trimmed text.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<QuestionSet, QuizError> {
        self.validate()?;
        Ok(QuestionSet {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            subject: self.subject.trim().to_string(),
            questions: self
                .questions
                .into_iter()
                .map(|q| Question {
                    question: q.question.trim().to_string(),
                    answer: q.answer.trim().to_string(),
                    difficulty: q.difficulty,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// One question drawn from a set, with its index for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomQuestion {
    pub question_set_id: QuestionSetId,
    pub question_index: usize,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub question_set_id: QuestionSetId,
    pub question_index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub question_set_id: QuestionSetId,
    pub question_index: usize,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAck {
    pub report_id: Uuid,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_set() -> NewQuestionSet {
        NewQuestionSet {
            title: "Grade 5 Math".to_string(),
            subject: "Mathematics".to_string(),
            questions: vec![NewQuestion::new("What is 5 + 3?", "8", Difficulty::Easy)],
        }
    }

    fn field_of(err: QuizError) -> &'static str {
        match err {
            QuizError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_each_missing_field() {
        let mut set = valid_set();
        set.title = "   ".to_string();
        assert_eq!(field_of(set.validate().unwrap_err()), "title");

        let mut set = valid_set();
        set.subject.clear();
        assert_eq!(field_of(set.validate().unwrap_err()), "subject");

        let mut set = valid_set();
        set.questions.clear();
        assert_eq!(field_of(set.validate().unwrap_err()), "questions");

        let mut set = valid_set();
        set.questions[0].question = " 5+3? ".to_string();
        let err = set.validate().unwrap_err();
        assert_eq!(err.to_string(), "Question 1: must be at least 6 characters");

        let mut set = valid_set();
        set.questions.push(NewQuestion::new("Capital of France?", " ", Difficulty::Medium));
        let err = set.validate().unwrap_err();
        assert_eq!(err.to_string(), "Question 2: answer cannot be empty");
    }

    #[test]
    fn record_trims_text() {
        let mut set = valid_set();
        set.title = "  Grade 5 Math ".to_string();
        set.questions[0].answer = " 8 ".to_string();
        let record = set.into_record(Utc::now()).unwrap();
        assert_eq!(record.title, "Grade 5 Math");
        assert_eq!(record.questions[0].answer, "8");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn difficulty_defaults_to_easy_when_missing() {
        let set: NewQuestionSet = serde_json::from_str(
            r#"{"title":"T","subject":"S","questions":[{"question":"What is 2+2?","answer":"4"}]}"#,
        )
        .unwrap();
        assert_eq!(set.questions[0].difficulty, Difficulty::Easy);
    }
}
