use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::domain::{QuestionType, QuizOption, QuizQuestion, QuizResult};

/// What a rendering layer needs to draw the session at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSessionView {
    pub session_id: String,
    pub quiz_id: String,
    pub title: String,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub question: QuestionView,
    pub selected_option_ids: BTreeSet<String>,
    pub answered_count: usize,
    pub time_remaining: u64,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
}

/// A question with its ground truth withheld until the session is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<OptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl OptionView {
    fn from_option(option: &QuizOption, reveal: bool) -> Self {
        OptionView {
            id: option.id.clone(),
            text: option.text.clone(),
            is_correct: reveal.then_some(option.is_correct),
        }
    }
}

impl QuestionView {
    pub fn from_question(question: &QuizQuestion, reveal: bool) -> Self {
        QuestionView {
            id: question.id.clone(),
            question: question.question.clone(),
            question_type: question.question_type,
            options: question
                .options
                .iter()
                .map(|o| OptionView::from_option(o, reveal))
                .collect(),
            explanation: reveal.then(|| question.explanation.clone()),
        }
    }
}
