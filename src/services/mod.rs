pub mod answer_ledger;
pub mod clock;
pub mod countdown_timer;
pub mod quiz_session_service;
pub mod scoring_service;
pub mod session_runner;

pub use answer_ledger::AnswerLedger;
pub use clock::{Clock, ManualClock, TokioClock};
pub use countdown_timer::{CountdownTimer, TimerEvent, TimerState};
pub use quiz_session_service::{QuizSession, TickOutcome};
pub use scoring_service::ScoringService;
pub use session_runner::{SessionCommand, SessionHandle, SessionRunner};
