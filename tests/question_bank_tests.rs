//! Question bank contract tests: validation, persistence and reports.

use std::path::PathBuf;

use ultangber::quiz::{
    Difficulty, NewQuestion, NewQuestionSet, NewReport, QuestionBank, QuestionProvider, QuizError,
};
use uuid::Uuid;

fn temp_bank_path() -> PathBuf {
    std::env::temp_dir().join(format!("ultangber-bank-{}.json", Uuid::new_v4()))
}

fn capitals() -> NewQuestionSet {
    NewQuestionSet {
        title: "  Capitals ".to_string(),
        subject: "Geography".to_string(),
        questions: vec![
            NewQuestion::new("Capital of Peru?", " Lima ", Difficulty::Easy),
            NewQuestion::new("Capital of Kenya?", "Nairobi", Difficulty::Medium),
        ],
    }
}

fn validation_message(result: Result<impl Sized, QuizError>) -> String {
    match result {
        Err(QuizError::Validation { message, .. }) => message,
        Err(other) => panic!("expected a validation error, got {other}"),
        Ok(_) => panic!("expected a validation error, got success"),
    }
}

// =============================================================================
// Creation
// =============================================================================

/// Stored sets are trimmed and stamped.
#[test]
fn test_create_trims_and_stamps() {
    let mut bank = QuestionBank::new(1);
    let set = bank.create_question_set(capitals()).unwrap();

    assert_eq!(set.title, "Capitals");
    assert_eq!(set.questions[0].answer, "Lima");
    assert_eq!(set.created_at, set.updated_at);

    let sets = bank.list_question_sets().unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].id, set.id);
    assert_eq!(sets[0].question_count, 2);
}

/// Invalid input is refused with a message naming the problem.
#[test]
fn test_create_validation_messages() {
    let mut bank = QuestionBank::new(1);

    let mut input = capitals();
    input.title = "   ".to_string();
    assert_eq!(validation_message(bank.create_question_set(input)), "Title is required");

    let mut input = capitals();
    input.subject.clear();
    assert_eq!(validation_message(bank.create_question_set(input)), "Subject is required");

    let mut input = capitals();
    input.questions.clear();
    assert_eq!(
        validation_message(bank.create_question_set(input)),
        "At least one question is required"
    );

    let mut input = capitals();
    input.questions[1].question = "Why?".to_string();
    assert_eq!(
        validation_message(bank.create_question_set(input)),
        "Question 2: must be at least 6 characters"
    );

    let mut input = capitals();
    input.questions[0].answer = "  ".to_string();
    assert_eq!(
        validation_message(bank.create_question_set(input)),
        "Question 1: answer cannot be empty"
    );

    assert!(bank.is_empty());
}

/// Difficulty may be left out of a JSON document.
#[test]
fn test_difficulty_defaults_to_easy() {
    let input: NewQuestionSet = serde_json::from_str(
        r#"{ "title": "Birds", "subject": "Nature", "questions": [
            { "question": "Fastest bird in a dive?", "answer": "Peregrine falcon" }
        ] }"#,
    )
    .unwrap();
    let mut bank = QuestionBank::new(1);
    let set = bank.create_question_set(input).unwrap();
    assert_eq!(set.questions[0].difficulty, Difficulty::Easy);
}

// =============================================================================
// Persistence
// =============================================================================

/// Sets and reports survive a reopen of the bank file.
#[test]
fn test_bank_file_round_trip() {
    let path = temp_bank_path();
    let set_id = {
        let mut bank = QuestionBank::open(&path, 1).unwrap();
        assert!(bank.is_empty());
        let set = bank.create_question_set(capitals()).unwrap();
        bank.submit_report(NewReport {
            question_set_id: set.id,
            question_index: 1,
            reason: "answer is outdated".to_string(),
        })
        .unwrap();
        set.id
    };

    let mut reopened = QuestionBank::open(&path, 2).unwrap();
    assert_eq!(reopened.path(), Some(path.as_path()));
    assert_eq!(reopened.question_set(set_id).map(|set| set.questions.len()), Some(2));
    assert_eq!(reopened.reports().len(), 1);
    assert_eq!(reopened.reports()[0].question_index, 1);
    assert!(reopened.random_question(set_id).is_ok());

    std::fs::remove_file(&path).unwrap();
}

/// A failed write leaves the bank as it was.
#[test]
fn test_failed_save_rolls_back() {
    let path = std::env::temp_dir()
        .join(format!("ultangber-missing-{}", Uuid::new_v4()))
        .join("bank.json");
    let mut bank = QuestionBank::open(&path, 1).unwrap();

    let result = bank.create_question_set(capitals());

    assert!(matches!(result, Err(QuizError::Io(_))));
    assert!(bank.list_question_sets().unwrap().is_empty());
}

/// A corrupt file is reported instead of silently replaced.
#[test]
fn test_corrupt_file_is_rejected() {
    let path = temp_bank_path();
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(QuestionBank::open(&path, 1), Err(QuizError::Format(_))));

    std::fs::remove_file(&path).unwrap();
}

// =============================================================================
// Draws and Reports
// =============================================================================

/// Draws are reproducible for a given seed.
#[test]
fn test_draws_follow_seed() {
    let mut first = QuestionBank::with_starter_sets(9);
    let set_id = first.list_question_sets().unwrap()[0].id;
    let mut second = first.clone();

    let a: Vec<usize> = (0..10)
        .map(|_| first.random_question(set_id).unwrap().question_index)
        .collect();
    let b: Vec<usize> = (0..10)
        .map(|_| second.random_question(set_id).unwrap().question_index)
        .collect();
    assert_eq!(a, b);
}

/// Reports name the offending field and message.
#[test]
fn test_report_validation() {
    let mut bank = QuestionBank::new(1);
    let set = bank.create_question_set(capitals()).unwrap();

    let short = bank.submit_report(NewReport {
        question_set_id: set.id,
        question_index: 0,
        reason: " x ".to_string(),
    });
    assert_eq!(
        validation_message(short),
        "Please provide a reason (at least 3 characters)"
    );

    let out_of_range = bank.submit_report(NewReport {
        question_set_id: set.id,
        question_index: 5,
        reason: "wrong answer".to_string(),
    });
    assert_eq!(validation_message(out_of_range), "Invalid question index");

    let missing = Uuid::new_v4();
    let unknown = bank.submit_report(NewReport {
        question_set_id: missing,
        question_index: 0,
        reason: "wrong answer".to_string(),
    });
    assert!(matches!(unknown, Err(QuizError::NotFound(id)) if id == missing));

    let ack = bank
        .submit_report(NewReport {
            question_set_id: set.id,
            question_index: 0,
            reason: "wrong answer".to_string(),
        })
        .unwrap();
    assert_eq!(ack.message, "Report submitted. Thank you!");
}
