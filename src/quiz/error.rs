use super::model::QuestionSetId;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("question set {0} not found")]
    NotFound(QuestionSetId),
    #[error("question set {0} has no questions")]
    EmptySet(QuestionSetId),
    #[error("question service unavailable: {0}")]
    Unavailable(String),
    #[error("failed to access question bank file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed question bank: {0}")]
    Format(#[from] serde_json::Error),
}

impl QuizError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        QuizError::Validation {
            field,
            message: message.into(),
        }
    }
}
