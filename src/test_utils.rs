#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Difficulty, QuestionType, QuizDefinition, QuizOption, QuizQuestion};

    /// Single-choice question whose only correct option is `correct`.
    pub fn single_question(id: &str, option_ids: &[&str], correct: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            question: format!("Question {}", id),
            question_type: QuestionType::Single,
            options: option_ids
                .iter()
                .map(|o| QuizOption {
                    id: o.to_string(),
                    text: format!("Option {}", o),
                    is_correct: *o == correct,
                })
                .collect(),
            explanation: format!("{} is correct", correct),
        }
    }

    /// Multi-choice question whose correct set is `correct`.
    pub fn multiple_question(id: &str, option_ids: &[&str], correct: &[&str]) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            question: format!("Question {}", id),
            question_type: QuestionType::Multiple,
            options: option_ids
                .iter()
                .map(|o| QuizOption {
                    id: o.to_string(),
                    text: format!("Option {}", o),
                    is_correct: correct.contains(o),
                })
                .collect(),
            explanation: format!("{} are correct", correct.join(", ")),
        }
    }

    pub fn quiz_with(questions: Vec<QuizQuestion>, time_limit: u32) -> QuizDefinition {
        QuizDefinition {
            id: "quiz-1".to_string(),
            title: "Rust Basics".to_string(),
            description: "A short quiz".to_string(),
            total_questions: questions.len(),
            time_limit,
            difficulty: Difficulty::Medium,
            category: "programming".to_string(),
            questions,
        }
    }

    /// Q1 single with correct "A", Q2 multiple with correct {"X", "Z"}, one minute.
    pub fn mixed_quiz() -> QuizDefinition {
        quiz_with(
            vec![
                single_question("q1", &["A", "B", "C"], "A"),
                multiple_question("q2", &["X", "Y", "Z"], &["X", "Z"]),
            ],
            1,
        )
    }

    pub fn three_question_quiz() -> QuizDefinition {
        quiz_with(
            vec![
                single_question("q1", &["a", "b"], "a"),
                single_question("q2", &["a", "b"], "b"),
                single_question("q3", &["a", "b", "c"], "c"),
            ],
            5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_mixed_quiz() {
        let quiz = mixed_quiz();
        assert_eq!(quiz.total_questions, 2);
        assert_eq!(quiz.questions[1].correct_option_ids().len(), 2);
    }

    #[test]
    fn test_fixtures_single_question_marks_one_correct() {
        let question = single_question("q", &["a", "b", "c"], "b");
        assert_eq!(question.options.iter().filter(|o| o.is_correct).count(), 1);
        assert!(question.options[1].is_correct);
    }
}
