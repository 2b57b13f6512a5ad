pub mod quiz;
pub mod quiz_question;
pub mod quiz_result;
pub use quiz::{Difficulty, QuizDefinition};
pub use quiz_question::{QuestionType, QuizOption, QuizQuestion};
pub use quiz_result::{AnswerMap, CompletionReason, QuestionOutcome, QuizResult};
