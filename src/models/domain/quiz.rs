use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz_question::{QuestionType, QuizQuestion};

/// A quiz as handed over by the loading layer. Never mutated by a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub total_questions: usize, // must match questions.len()
    #[validate(range(min = 1, message = "time limit must be at least one minute"))]
    pub time_limit: u32, // whole minutes
    pub difficulty: Difficulty,
    pub category: String,
    #[validate(length(min = 1, message = "quiz must contain at least one question"), nested)]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl QuizDefinition {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn question(&self, question_id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn time_limit_seconds(&self) -> u64 {
        u64::from(self.time_limit) * 60
    }

    /// Field checks followed by the structural rules a session relies on.
    pub fn check_integrity(&self) -> AppResult<()> {
        if self.total_questions == 0 || self.questions.is_empty() {
            return Err(AppError::InvalidDefinition(format!(
                "Quiz '{}' has no questions",
                self.id
            )));
        }

        self.validate()?;

        if self.total_questions != self.questions.len() {
            return Err(AppError::InvalidDefinition(format!(
                "Quiz '{}' declares {} questions but contains {}",
                self.id,
                self.total_questions,
                self.questions.len()
            )));
        }

        let mut question_ids = HashSet::new();
        for question in &self.questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(AppError::InvalidDefinition(format!(
                    "Duplicate question id '{}'",
                    question.id
                )));
            }

            let mut option_ids = HashSet::new();
            for option in &question.options {
                if !option_ids.insert(option.id.as_str()) {
                    return Err(AppError::InvalidDefinition(format!(
                        "Duplicate option id '{}' in question '{}'",
                        option.id, question.id
                    )));
                }
            }

            let correct_count = question.options.iter().filter(|o| o.is_correct).count();
            match question.question_type {
                QuestionType::Single if correct_count != 1 => {
                    return Err(AppError::InvalidDefinition(format!(
                        "Single-choice question '{}' must have exactly one correct option, found {}",
                        question.id, correct_count
                    )));
                }
                QuestionType::Multiple if correct_count == 0 => {
                    return Err(AppError::InvalidDefinition(format!(
                        "Multi-choice question '{}' has no correct options",
                        question.id
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
