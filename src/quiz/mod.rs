//! Question sets, random question draws and question reports.
//!
//! The game only ever talks to [`QuestionProvider`]; [`QuestionBank`] is the
//! bundled implementation backed by memory and an optional JSON file.

pub mod bank;
pub mod error;
pub mod model;
pub mod starter;

pub use bank::QuestionBank;
pub use error::QuizError;
pub use model::{
    Difficulty, NewQuestion, NewQuestionSet, NewReport, Question, QuestionSet, QuestionSetId,
    QuestionSetSummary, RandomQuestion, Report, ReportAck,
};

pub trait QuestionProvider {
    fn list_question_sets(&self) -> Result<Vec<QuestionSetSummary>, QuizError>;

    fn create_question_set(&mut self, input: NewQuestionSet) -> Result<QuestionSet, QuizError>;

    fn random_question(&mut self, set_id: QuestionSetId) -> Result<RandomQuestion, QuizError>;

    fn submit_report(&mut self, report: NewReport) -> Result<ReportAck, QuizError>;
}
