use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{errors::AppResult, models::domain::QuizResult};

/// Where a finished session's result is handed off. Called once per session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizResultSink: Send + Sync {
    async fn save_result(&self, session_id: &str, result: &QuizResult) -> AppResult<()>;
}

/// Writes each result to the log as JSON.
pub struct LogResultSink;

#[async_trait]
impl QuizResultSink for LogResultSink {
    async fn save_result(&self, session_id: &str, result: &QuizResult) -> AppResult<()> {
        let json = serde_json::to_string(result)?;
        log::info!("Quiz result for session {}: {}", session_id, json);
        Ok(())
    }
}

/// Keeps results in memory, in delivery order.
#[derive(Clone, Default)]
pub struct InMemoryResultSink {
    results: Arc<RwLock<Vec<(String, QuizResult)>>>,
}

impl InMemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn results(&self) -> Vec<(String, QuizResult)> {
        self.results.read().await.clone()
    }

    pub async fn find_by_session(&self, session_id: &str) -> Option<QuizResult> {
        self.results
            .read()
            .await
            .iter()
            .find(|(id, _)| id == session_id)
            .map(|(_, result)| result.clone())
    }
}

#[async_trait]
impl QuizResultSink for InMemoryResultSink {
    async fn save_result(&self, session_id: &str, result: &QuizResult) -> AppResult<()> {
        let mut results = self.results.write().await;
        results.push((session_id.to_string(), result.clone()));
        Ok(())
    }
}
