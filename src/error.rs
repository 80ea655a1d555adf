//! Error types for the quality gate
//!
//! Two kinds matter to callers: configuration problems, which are raised
//! before any process of the affected stage is spawned, and check failures,
//! which carry the stage that failed and a human readable message.

use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message}")]
    CheckFailed { stage: Stage, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

impl GateError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn check_failed(stage: Stage, message: impl Into<String>) -> Self {
        Self::CheckFailed {
            stage,
            message: message.into(),
        }
    }

    /// Stage that failed, if this is a check failure
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::CheckFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Process exit code used at the CLI boundary
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CheckFailed { .. } => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failure_displays_message_only() {
        let err = GateError::check_failed(Stage::Syntax, "There are syntax errors!");
        assert_eq!(err.to_string(), "There are syntax errors!");
        assert_eq!(err.stage(), Some(Stage::Syntax));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err = GateError::config("Bin directory not found");
        assert_eq!(err.to_string(), "Configuration error: Bin directory not found");
        assert_eq!(err.stage(), None);
        assert_eq!(err.exit_code(), 2);
    }
}
