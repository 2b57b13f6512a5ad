pub mod response;

pub use response::{OptionView, QuestionView, QuizSessionView};
