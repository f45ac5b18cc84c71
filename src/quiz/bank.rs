use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::error::QuizError;
use super::model::{
    MIN_REASON_LEN, NewQuestionSet, NewReport, QuestionSet, QuestionSetId, QuestionSetSummary,
    RandomQuestion, Report, ReportAck,
};
use super::starter::STARTER_SETS;
use super::QuestionProvider;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankData {
    #[serde(default)]
    question_sets: Vec<QuestionSet>,
    #[serde(default)]
    reports: Vec<Report>,
}

/// In-memory question store, optionally mirrored to a JSON file after every
/// write.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    data: BankData,
    path: Option<PathBuf>,
    rng: StdRng,
}

impl QuestionBank {
    pub fn new(seed: u64) -> Self {
        Self {
            data: BankData::default(),
            path: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_starter_sets(seed: u64) -> Self {
        let mut bank = Self::new(seed);
        let now = Utc::now();
        for input in STARTER_SETS.iter().cloned() {
            // Starter sets are static and known to be valid.
            if let Ok(record) = input.into_record(now) {
                bank.data.question_sets.push(record);
            }
        }
        bank
    }

    /// Opens the bank stored at `path`, or an empty one that will be written
    /// there on the first change.
    #[instrument]
    pub fn open(path: &Path, seed: u64) -> Result<Self, QuizError> {
        let data = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            BankData::default()
        };
        info!(
            sets = data.question_sets.len(),
            reports = data.reports.len(),
            "question bank loaded"
        );
        Ok(Self {
            data,
            path: Some(path.to_path_buf()),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.data.question_sets.is_empty()
    }

    pub fn question_set(&self, id: QuestionSetId) -> Option<&QuestionSet> {
        self.data.question_sets.iter().find(|set| set.id == id)
    }

    pub fn reports(&self) -> &[Report] {
        &self.data.reports
    }

    pub fn save(&self) -> Result<(), QuizError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, raw)?;
        debug!(path = %path.display(), "question bank saved");
        Ok(())
    }
}

impl QuestionProvider for QuestionBank {
    fn list_question_sets(&self) -> Result<Vec<QuestionSetSummary>, QuizError> {
        Ok(self
            .data
            .question_sets
            .iter()
            .map(QuestionSet::summary)
            .collect())
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    fn create_question_set(&mut self, input: NewQuestionSet) -> Result<QuestionSet, QuizError> {
        let record = input.into_record(Utc::now())?;
        self.data.question_sets.push(record.clone());
        if let Err(err) = self.save() {
            self.data.question_sets.pop();
            return Err(err);
        }
        info!(id = %record.id, questions = record.questions.len(), "question set created");
        Ok(record)
    }

    fn random_question(&mut self, set_id: QuestionSetId) -> Result<RandomQuestion, QuizError> {
        let set = self
            .data
            .question_sets
            .iter()
            .find(|set| set.id == set_id)
            .ok_or(QuizError::NotFound(set_id))?;
        if set.questions.is_empty() {
            return Err(QuizError::EmptySet(set_id));
        }

        let question_index = self.rng.gen_range(0..set.questions.len());
        let question = &set.questions[question_index];
        Ok(RandomQuestion {
            question_set_id: set.id,
            question_index,
            question: question.question.clone(),
            answer: question.answer.clone(),
            difficulty: question.difficulty,
        })
    }

    #[instrument(skip(self, report), fields(set = %report.question_set_id, index = report.question_index))]
    fn submit_report(&mut self, report: NewReport) -> Result<ReportAck, QuizError> {
        let reason = report.reason.trim();
        if reason.chars().count() < MIN_REASON_LEN {
            return Err(QuizError::validation(
                "reason",
                format!("Please provide a reason (at least {MIN_REASON_LEN} characters)"),
            ));
        }
        let set = self
            .question_set(report.question_set_id)
            .ok_or(QuizError::NotFound(report.question_set_id))?;
        if report.question_index >= set.questions.len() {
            return Err(QuizError::validation(
                "questionIndex",
                "Invalid question index",
            ));
        }

        let stored = Report {
            id: Uuid::new_v4(),
            question_set_id: report.question_set_id,
            question_index: report.question_index,
            reason: reason.to_string(),
            created_at: Utc::now(),
        };
        let report_id = stored.id;
        self.data.reports.push(stored);
        if let Err(err) = self.save() {
            self.data.reports.pop();
            return Err(err);
        }
        info!(%report_id, "question reported");
        Ok(ReportAck {
            report_id,
            message: "Report submitted. Thank you!".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::model::{Difficulty, NewQuestion};

    #[test]
    fn starter_bank_lists_every_set() {
        let bank = QuestionBank::with_starter_sets(1);
        let sets = bank.list_question_sets().unwrap();
        assert_eq!(sets.len(), STARTER_SETS.len());
        assert!(sets.iter().all(|set| set.question_count > 0));
    }

    #[test]
    fn random_question_comes_from_requested_set() {
        let mut bank = QuestionBank::with_starter_sets(3);
        let id = bank.list_question_sets().unwrap()[1].id;
        for _ in 0..20 {
            let drawn = bank.random_question(id).unwrap();
            let set = bank.question_set(id).unwrap();
            assert_eq!(drawn.question_set_id, id);
            assert_eq!(set.questions[drawn.question_index].question, drawn.question);
        }
    }

    #[test]
    fn unknown_set_is_not_found() {
        let mut bank = QuestionBank::new(0);
        let missing = Uuid::new_v4();
        assert!(matches!(
            bank.random_question(missing),
            Err(QuizError::NotFound(id)) if id == missing
        ));
    }

    #[test]
    fn reports_check_reason_and_index() {
        let mut bank = QuestionBank::new(0);
        let set = bank
            .create_question_set(NewQuestionSet {
                title: "Colours".to_string(),
                subject: "Art".to_string(),
                questions: vec![NewQuestion::new("Mix blue and yellow?", "green", Difficulty::Easy)],
            })
            .unwrap();

        let report = |index: usize, reason: &str| NewReport {
            question_set_id: set.id,
            question_index: index,
            reason: reason.to_string(),
        };

        assert!(matches!(
            bank.submit_report(report(0, " ab ")),
            Err(QuizError::Validation { field: "reason", .. })
        ));
        assert!(matches!(
            bank.submit_report(report(1, "typo in answer")),
            Err(QuizError::Validation { field: "questionIndex", .. })
        ));
        let ack = bank.submit_report(report(0, "  typo in answer ")).unwrap();
        assert_eq!(bank.reports().len(), 1);
        assert_eq!(bank.reports()[0].id, ack.report_id);
        assert_eq!(bank.reports()[0].reason, "typo in answer");
    }
}
