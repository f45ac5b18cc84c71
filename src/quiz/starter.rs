use once_cell::sync::Lazy;

use super::model::{Difficulty, NewQuestion, NewQuestionSet};

/// Sets loaded into a fresh bank so a game can start without any setup.
pub static STARTER_SETS: Lazy<Vec<NewQuestionSet>> = Lazy::new(|| {
    vec![
        NewQuestionSet {
            title: "Quick Arithmetic".to_string(),
            subject: "Mathematics".to_string(),
            questions: vec![
                NewQuestion::new("What is 5 + 3?", "8", Difficulty::Easy),
                NewQuestion::new("What is 7 x 6?", "42", Difficulty::Easy),
                NewQuestion::new("What is 144 / 12?", "12", Difficulty::Medium),
                NewQuestion::new("What is 15% of 200?", "30", Difficulty::Medium),
                NewQuestion::new("What is the square root of 169?", "13", Difficulty::Medium),
                NewQuestion::new("What is 2 to the power of 10?", "1024", Difficulty::Hard),
            ],
        },
        NewQuestionSet {
            title: "World Capitals".to_string(),
            subject: "Geography".to_string(),
            questions: vec![
                NewQuestion::new("What is the capital of France?", "Paris", Difficulty::Easy),
                NewQuestion::new("What is the capital of Japan?", "Tokyo", Difficulty::Easy),
                NewQuestion::new("What is the capital of Canada?", "Ottawa", Difficulty::Medium),
                NewQuestion::new("What is the capital of Australia?", "Canberra", Difficulty::Medium),
                NewQuestion::new("What is the capital of Mongolia?", "Ulaanbaatar", Difficulty::Hard),
            ],
        },
        NewQuestionSet {
            title: "Everyday Science".to_string(),
            subject: "Science".to_string(),
            questions: vec![
                NewQuestion::new("Which planet is known as the Red Planet?", "Mars", Difficulty::Easy),
                NewQuestion::new("What gas do plants absorb from the air?", "Carbon dioxide", Difficulty::Medium),
                NewQuestion::new("What is the chemical symbol for gold?", "Au", Difficulty::Medium),
                NewQuestion::new("How many bones are in the adult human body?", "206", Difficulty::Hard),
            ],
        },
    ]
});
