use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(length(min = 1, message = "question must have at least one option"))]
    pub options: Vec<QuizOption>,
    pub explanation: String, // only surfaced once the session is completed
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,   // Exactly one correct option, selecting replaces
    Multiple, // One or more correct options, selecting toggles
}

impl QuizQuestion {
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    /// The set a selection must equal for the question to count as correct.
    pub fn correct_option_ids(&self) -> BTreeSet<String> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, is_correct: bool) -> QuizOption {
        QuizOption {
            id: id.to_string(),
            text: format!("Option {}", id),
            is_correct,
        }
    }

    #[test]
    fn question_type_uses_lowercase_names() {
        let json = serde_json::to_string(&QuestionType::Multiple).expect("should serialize");
        assert_eq!(json, "\"multiple\"");

        let parsed: QuestionType = serde_json::from_str("\"single\"").expect("should deserialize");
        assert_eq!(parsed, QuestionType::Single);
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<QuestionType>("\"essay\"");

        assert!(parsed.is_err());
    }

    #[test]
    fn question_deserializes_from_camel_case_payload() {
        let payload = r#"{
            "id": "q-1",
            "question": "Which keyword declares a constant?",
            "type": "single",
            "options": [
                { "id": "a", "text": "const", "isCorrect": true },
                { "id": "b", "text": "let", "isCorrect": false }
            ],
            "explanation": "const declares a compile-time constant."
        }"#;

        let question: QuizQuestion = serde_json::from_str(payload).expect("should deserialize");

        assert_eq!(question.question_type, QuestionType::Single);
        assert_eq!(question.options.len(), 2);
        assert!(question.options[0].is_correct);
    }

    #[test]
    fn correct_option_ids_collects_every_correct_option() {
        let question = QuizQuestion {
            id: "q-2".to_string(),
            question: "Pick the primes".to_string(),
            question_type: QuestionType::Multiple,
            options: vec![option("x", true), option("y", false), option("z", true)],
            explanation: String::new(),
        };

        let correct = question.correct_option_ids();

        assert_eq!(correct.len(), 2);
        assert!(correct.contains("x"));
        assert!(correct.contains("z"));
        assert!(question.has_option("y"));
        assert!(!question.has_option("w"));
    }

    #[test]
    fn question_without_options_fails_validation() {
        let question = QuizQuestion {
            id: "q-3".to_string(),
            question: "Empty".to_string(),
            question_type: QuestionType::Single,
            options: vec![],
            explanation: String::new(),
        };

        assert!(question.validate().is_err());
    }
}
