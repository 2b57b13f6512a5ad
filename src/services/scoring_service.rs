use std::collections::BTreeSet;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{AnswerMap, QuestionOutcome, QuizDefinition, QuizQuestion, QuizResult};

pub struct ScoringService;

impl ScoringService {
    /// Grade a finished session. Pure: identical inputs give an identical result.
    pub fn score(
        definition: &QuizDefinition,
        answers: &AnswerMap,
        elapsed_seconds: u64,
    ) -> AppResult<QuizResult> {
        let total_questions = definition.questions.len();
        if total_questions == 0 || definition.total_questions == 0 {
            return Err(AppError::InvalidDefinition(format!(
                "Quiz '{}' has no questions to score",
                definition.id
            )));
        }

        let question_results = definition
            .questions
            .iter()
            .map(|question| Self::grade_question(question, answers.get(&question.id)))
            .collect::<AppResult<Vec<_>>>()?;

        let correct_answers = question_results.iter().filter(|r| r.is_correct).count();

        Ok(QuizResult {
            quiz_id: definition.id.clone(),
            score: Self::percentage(correct_answers, total_questions),
            total_questions,
            correct_answers,
            time_spent: elapsed_seconds,
            user_answers: answers.clone(),
            question_results,
        })
    }

    /// A question is correct only when the selection equals the correct set exactly,
    /// for single- and multi-choice alike.
    fn grade_question(
        question: &QuizQuestion,
        selected: Option<&BTreeSet<String>>,
    ) -> AppResult<QuestionOutcome> {
        let correct_option_ids = question.correct_option_ids();
        if correct_option_ids.is_empty() {
            return Err(AppError::InvalidDefinition(format!(
                "Question '{}' has no correct options",
                question.id
            )));
        }

        // Absent and empty selections are graded the same way.
        let selected_option_ids = selected.cloned().unwrap_or_default();
        let is_correct = selected_option_ids == correct_option_ids;

        Ok(QuestionOutcome {
            question_id: question.id.clone(),
            selected_option_ids,
            correct_option_ids,
            is_correct,
        })
    }

    // round(correct / total * 100), halves rounding up.
    fn percentage(correct: usize, total: usize) -> u8 {
        let rounded = (correct * 200 + total) / (total * 2);
        rounded.min(100) as u8
    }
}
