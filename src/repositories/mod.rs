pub mod quiz_result_repository;

pub use quiz_result_repository::{InMemoryResultSink, LogResultSink, QuizResultSink};
