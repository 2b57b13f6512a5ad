use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Question index {index} is out of range for a quiz with {total} questions")]
    OutOfRange { index: usize, total: usize },

    #[error("Session completed: {0}")]
    SessionCompleted(String),

    #[error("Invalid quiz definition: {0}")]
    InvalidDefinition(String),

    #[error("Result sink error: {0}")]
    SinkError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidReference(_) => "INVALID_REFERENCE",
            AppError::OutOfRange { .. } => "OUT_OF_RANGE",
            AppError::SessionCompleted(_) => "SESSION_COMPLETED",
            AppError::InvalidDefinition(_) => "INVALID_DEFINITION",
            AppError::SinkError(_) => "SINK_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Errors a caller caused by passing bad input, as opposed to a broken environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidReference(_)
                | AppError::OutOfRange { .. }
                | AppError::SessionCompleted(_)
                | AppError::InvalidDefinition(_)
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidDefinition(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON error: {}", err))
    }
}
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("IO error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
