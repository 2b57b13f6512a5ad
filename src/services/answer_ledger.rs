use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{AnswerMap, QuestionType, QuizDefinition};

/// Live record of the options selected for each question of one quiz.
#[derive(Debug, Clone)]
pub struct AnswerLedger {
    definition: Arc<QuizDefinition>,
    selections: AnswerMap,
}

impl AnswerLedger {
    pub fn new(definition: Arc<QuizDefinition>) -> Self {
        Self {
            definition,
            selections: AnswerMap::new(),
        }
    }

    /// Single-choice questions replace the selection; multi-choice questions
    /// toggle the option in or out of it.
    pub fn select(&mut self, question_id: &str, option_id: &str) -> AppResult<()> {
        let question = self.definition.question(question_id).ok_or_else(|| {
            AppError::InvalidReference(format!("Question '{}' is not part of this quiz", question_id))
        })?;

        if !question.has_option(option_id) {
            return Err(AppError::InvalidReference(format!(
                "Option '{}' does not belong to question '{}'",
                option_id, question_id
            )));
        }
        let question_type = question.question_type;

        match question_type {
            QuestionType::Single => {
                self.selections.insert(
                    question_id.to_string(),
                    BTreeSet::from([option_id.to_string()]),
                );
            }
            QuestionType::Multiple => {
                let selected = self.selections.entry(question_id.to_string()).or_default();
                if !selected.remove(option_id) {
                    selected.insert(option_id.to_string());
                }
            }
        }

        Ok(())
    }

    pub fn answers_for(&self, question_id: &str) -> AppResult<BTreeSet<String>> {
        if self.definition.question(question_id).is_none() {
            return Err(AppError::InvalidReference(format!(
                "Question '{}' is not part of this quiz",
                question_id
            )));
        }

        Ok(self
            .selections
            .get(question_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Independent deep copy; later selections never show up in it.
    pub fn snapshot(&self) -> AnswerMap {
        self.selections.clone()
    }

    pub fn answered_count(&self) -> usize {
        self.selections.values().filter(|s| !s.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::mixed_quiz;

    fn ledger() -> AnswerLedger {
        AnswerLedger::new(Arc::new(mixed_quiz()))
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unanswered_question_has_empty_selection() {
        let ledger = ledger();

        assert!(ledger.answers_for("q1").expect("q1 exists").is_empty());
        assert_eq!(ledger.answered_count(), 0);
    }

    #[test]
    fn single_choice_replaces_previous_selection() {
        let mut ledger = ledger();

        ledger.select("q1", "A").expect("valid selection");
        ledger.select("q1", "B").expect("valid selection");

        assert_eq!(ledger.answers_for("q1").unwrap(), set(&["B"]));
    }

    #[test]
    fn single_choice_reselecting_keeps_selection() {
        let mut ledger = ledger();

        ledger.select("q1", "C").unwrap();
        ledger.select("q1", "C").unwrap();

        assert_eq!(ledger.answers_for("q1").unwrap(), set(&["C"]));
    }

    #[test]
    fn multiple_choice_accumulates_selections() {
        let mut ledger = ledger();

        for option in ["X", "Y", "Z"] {
            ledger.select("q2", option).unwrap();
        }

        assert_eq!(ledger.answers_for("q2").unwrap(), set(&["X", "Y", "Z"]));
    }

    #[test]
    fn multiple_choice_toggle_is_symmetric() {
        let mut ledger = ledger();
        ledger.select("q2", "X").unwrap();
        let before = ledger.answers_for("q2").unwrap();

        ledger.select("q2", "Z").unwrap();
        ledger.select("q2", "Z").unwrap();

        assert_eq!(ledger.answers_for("q2").unwrap(), before);
    }

    #[test]
    fn toggling_everything_off_leaves_empty_set() {
        let mut ledger = ledger();

        ledger.select("q2", "Y").unwrap();
        ledger.select("q2", "Y").unwrap();

        assert!(ledger.answers_for("q2").unwrap().is_empty());
        assert_eq!(ledger.answered_count(), 0);
    }

    #[test]
    fn unknown_question_is_invalid_reference() {
        let mut ledger = ledger();

        let err = ledger.select("q9", "A").unwrap_err();
        assert!(matches!(err, AppError::InvalidReference(_)));
        assert!(matches!(
            ledger.answers_for("q9"),
            Err(AppError::InvalidReference(_))
        ));
    }

    #[test]
    fn option_from_another_question_is_invalid_reference() {
        let mut ledger = ledger();

        let err = ledger.select("q1", "X").unwrap_err();

        assert!(err.to_string().contains("does not belong to question 'q1'"));
        assert!(ledger.snapshot().is_empty());
    }

    #[test]
    fn snapshot_does_not_alias_live_selections() {
        let mut ledger = ledger();
        ledger.select("q1", "A").unwrap();

        let snapshot = ledger.snapshot();
        ledger.select("q1", "B").unwrap();
        ledger.select("q2", "X").unwrap();

        assert_eq!(snapshot.get("q1"), Some(&set(&["A"])));
        assert!(!snapshot.contains_key("q2"));
        assert_eq!(ledger.answered_count(), 2);
    }
}
