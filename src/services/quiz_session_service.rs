use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{CompletionReason, QuizDefinition, QuizQuestion, QuizResult};
use crate::models::dto::{QuestionView, QuizSessionView};
use crate::services::answer_ledger::AnswerLedger;
use crate::services::clock::Clock;
use crate::services::countdown_timer::{CountdownTimer, TimerEvent, TimerState};
use crate::services::scoring_service::ScoringService;

/// The result lives inside the completed state, so a session can never be
/// completed without one or hold one while still active.
#[derive(Debug, Clone)]
enum SessionState {
    Active,
    Completed {
        result: QuizResult,
        reason: CompletionReason,
        completed_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Running { time_remaining: u64 },
    /// This tick hit the deadline and completed the session.
    Expired(QuizResult),
    /// The session was already completed; nothing happened.
    Completed,
}

/// One attempt at a quiz. The only place session state is allowed to change.
pub struct QuizSession {
    id: String,
    definition: Arc<QuizDefinition>,
    clock: Arc<dyn Clock>,
    ledger: AnswerLedger,
    timer: CountdownTimer,
    current_question_index: usize,
    start_time: DateTime<Utc>,
    time_remaining: u64,
    state: SessionState,
}

impl QuizSession {
    /// Validate the definition and start the countdown. A malformed definition
    /// never gets as far as starting a timer.
    pub fn start(definition: Arc<QuizDefinition>, clock: Arc<dyn Clock>) -> AppResult<Self> {
        definition.check_integrity()?;

        let start_time = clock.now();
        let total_seconds = definition.time_limit_seconds();
        let mut timer = CountdownTimer::new();
        timer.start(total_seconds, start_time)?;

        let id = Uuid::new_v4().to_string();
        log::info!(
            "Started session {} for quiz '{}' ({} questions, {}s limit)",
            id,
            definition.id,
            definition.questions.len(),
            total_seconds
        );

        Ok(Self {
            id,
            ledger: AnswerLedger::new(Arc::clone(&definition)),
            definition,
            clock,
            timer,
            current_question_index: 0,
            start_time,
            time_remaining: total_seconds,
            state: SessionState::Active,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.id
    }

    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.definition.questions[self.current_question_index]
    }

    pub fn current_selection(&self) -> BTreeSet<String> {
        self.ledger
            .answers_for(&self.current_question().id)
            .unwrap_or_default()
    }

    pub fn answers_for(&self, question_id: &str) -> AppResult<BTreeSet<String>> {
        self.ledger.answers_for(question_id)
    }

    /// Seconds left as of the last tick or completion.
    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed { .. })
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            SessionState::Completed { result, .. } => Some(result),
            SessionState::Active => None,
        }
    }

    pub fn completion_reason(&self) -> Option<CompletionReason> {
        match &self.state {
            SessionState::Completed { reason, .. } => Some(*reason),
            SessionState::Active => None,
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            SessionState::Completed { completed_at, .. } => Some(*completed_at),
            SessionState::Active => None,
        }
    }

    pub fn go_to(&mut self, index: usize) -> AppResult<()> {
        self.expire_if_due()?;
        self.ensure_active("go_to")?;

        let total = self.definition.questions.len();
        if index >= total {
            return Err(AppError::OutOfRange { index, total });
        }

        self.current_question_index = index;
        log::debug!("Session {} moved to question {}", self.id, index);
        Ok(())
    }

    /// Moves forward; stays put on the last question.
    pub fn next(&mut self) -> AppResult<()> {
        self.expire_if_due()?;
        self.ensure_active("next")?;

        if self.current_question_index + 1 < self.definition.questions.len() {
            self.current_question_index += 1;
        }
        Ok(())
    }

    /// Moves back; stays put on the first question.
    pub fn previous(&mut self) -> AppResult<()> {
        self.expire_if_due()?;
        self.ensure_active("previous")?;

        self.current_question_index = self.current_question_index.saturating_sub(1);
        Ok(())
    }

    pub fn select_answer(&mut self, question_id: &str, option_id: &str) -> AppResult<()> {
        self.expire_if_due()?;
        self.ensure_active("select_answer")?;

        self.ledger.select(question_id, option_id)?;
        log::debug!(
            "Session {} selected option '{}' on question '{}'",
            self.id,
            option_id,
            question_id
        );
        Ok(())
    }

    /// Completes the session, or returns the stored result if it already is.
    pub fn submit(&mut self) -> AppResult<QuizResult> {
        self.expire_if_due()?;
        if let SessionState::Completed { result, .. } = &self.state {
            return Ok(result.clone());
        }

        let now = self.clock.now();
        self.timer.cancel(now);
        self.complete(now, CompletionReason::Submitted)
    }

    /// Advance the countdown to the clock's current time. The tick that reaches
    /// the deadline completes the session exactly as `submit` would.
    pub fn tick(&mut self) -> AppResult<TickOutcome> {
        if self.is_completed() {
            return Ok(TickOutcome::Completed);
        }

        let now = self.clock.now();
        match self.timer.tick(now) {
            TimerEvent::Tick { remaining_seconds } => {
                self.time_remaining = self.time_remaining.min(remaining_seconds);
                Ok(TickOutcome::Running {
                    time_remaining: self.time_remaining,
                })
            }
            TimerEvent::Expired => {
                let completed_at = self.timer.deadline().unwrap_or(now);
                let result = self.complete(completed_at, CompletionReason::Expired)?;
                Ok(TickOutcome::Expired(result))
            }
            TimerEvent::Inactive => Err(AppError::InternalError(format!(
                "Timer for active session {} is {:?}",
                self.id,
                self.timer.state()
            ))),
        }
    }

    pub fn view(&self) -> QuizSessionView {
        let completed = self.is_completed();
        QuizSessionView {
            session_id: self.id.clone(),
            quiz_id: self.definition.id.clone(),
            title: self.definition.title.clone(),
            current_question_index: self.current_question_index,
            total_questions: self.definition.questions.len(),
            question: QuestionView::from_question(self.current_question(), completed),
            selected_option_ids: self.current_selection(),
            answered_count: self.ledger.answered_count(),
            time_remaining: self.time_remaining,
            is_completed: completed,
            result: self.result().cloned(),
        }
    }

    /// Commands read the clock too, so a late command finds the session
    /// already expired even when no tick has run since the deadline.
    fn expire_if_due(&mut self) -> AppResult<()> {
        if self.is_completed() {
            return Ok(());
        }

        let now = self.clock.now();
        if let Some(deadline) = self.timer.deadline() {
            if now >= deadline {
                self.timer.tick(now);
                self.complete(deadline, CompletionReason::Expired)?;
            }
        }
        Ok(())
    }

    fn ensure_active(&self, operation: &str) -> AppResult<()> {
        if self.is_completed() {
            log::warn!("Rejected {} on completed session {}", operation, self.id);
            return Err(AppError::SessionCompleted(format!(
                "Cannot {} after session {} has completed",
                operation, self.id
            )));
        }
        Ok(())
    }

    fn complete(
        &mut self,
        completed_at: DateTime<Utc>,
        reason: CompletionReason,
    ) -> AppResult<QuizResult> {
        let limit = self.definition.time_limit_seconds();
        let elapsed = (completed_at - self.start_time).num_seconds().max(0) as u64;
        let time_spent = elapsed.min(limit);

        let snapshot = self.ledger.snapshot();
        let result = ScoringService::score(&self.definition, &snapshot, time_spent)?;

        self.time_remaining = match reason {
            CompletionReason::Expired => 0,
            CompletionReason::Submitted => self.timer.remaining_seconds(completed_at),
        };
        self.state = SessionState::Completed {
            result: result.clone(),
            reason,
            completed_at,
        };

        log::info!(
            "Session {} {}: {}/{} correct, score {}, {}s spent",
            self.id,
            reason,
            result.correct_answers,
            result.total_questions,
            result.score,
            result.time_spent
        );
        Ok(result)
    }
}
