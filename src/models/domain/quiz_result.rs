use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Question id to the option ids selected for it.
pub type AnswerMap = BTreeMap<String, BTreeSet<String>>;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: String,
    pub score: u8,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub time_spent: u64, // seconds
    pub user_answers: AnswerMap,
    pub question_results: Vec<QuestionOutcome>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: String,
    pub selected_option_ids: BTreeSet<String>,
    pub correct_option_ids: BTreeSet<String>,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CompletionReason {
    Submitted,
    Expired,
}

impl std::fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionReason::Submitted => write!(f, "submitted"),
            CompletionReason::Expired => write!(f, "expired"),
        }
    }
}
