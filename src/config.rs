use std::env;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub tick_interval_ms: u64,
    pub quiz_definition_path: String,
    pub command_buffer: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            tick_interval_ms: env::var("QUIZ_TICK_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            quiz_definition_path: env::var("QUIZ_DEFINITION_PATH")
                .unwrap_or_else(|_| "quiz.json".to_string()),
            command_buffer: env::var("QUIZ_COMMAND_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(32),
        }
    }

    /// Rejects values the session runner cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(AppError::InternalError(
                "QUIZ_TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if self.command_buffer == 0 {
            return Err(AppError::InternalError(
                "QUIZ_COMMAND_BUFFER must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn test_config() -> Self {
        Self {
            tick_interval_ms: 1000,
            quiz_definition_path: "quiz.json".to_string(),
            command_buffer: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(config.tick_interval_ms > 0);
        assert!(!config.quiz_definition_path.is_empty());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.command_buffer, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tick_interval() {
        let config = Config {
            tick_interval_ms: 0,
            ..Config::test_config()
        };

        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_validate_rejects_zero_command_buffer() {
        let config = Config {
            command_buffer: 0,
            ..Config::test_config()
        };

        assert!(config.validate().is_err());
    }
}
