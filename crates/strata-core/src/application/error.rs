//! Application layer errors.
//!
//! These errors represent failures in orchestration: I/O, external tools,
//! providers. Invalid input is `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Template rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A file the operation explicitly refers to does not exist.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// An external tool exited non-zero or could not be launched.
    #[error("`{command}` failed{}", exit_suffix(.code))]
    ExternalProcessFailure {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The selected backend exists but has no implementation.
    #[error("{feature} is not implemented")]
    NotImplemented { feature: String },

    /// Shared adapter state could not be locked.
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => " to start".to_string(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the project directory exists (run `strata init`)".into(),
            ],
            Self::NotFound { path } => vec![
                format!("No file at {}", path.display()),
                "Check the path; relative paths resolve from the current directory".into(),
            ],
            Self::ExternalProcessFailure { command, code, stderr } => {
                let mut s = Vec::new();
                if code.is_none() {
                    let program = command.split_whitespace().next().unwrap_or(command);
                    s.push(format!("Ensure `{program}` is installed and on your PATH"));
                } else {
                    s.push("Check the tool output above for details".into());
                }
                if let Some(last) = stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                    s.push(format!("Last error line: {}", last.trim()));
                }
                s
            }
            Self::NotImplemented { feature } => vec![
                format!("{} is not available yet", feature),
                "Set \"ai.provider\" to \"mock\" in strata.json".into(),
            ],
            Self::StoreLockError => vec![
                "Internal state is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::RenderingFailed { .. } => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ExternalProcessFailure { .. } => ErrorCategory::ExternalProcess,
            Self::NotImplemented { .. } => ErrorCategory::NotImplemented,
            Self::FilesystemError { .. } | Self::StoreLockError | Self::RenderingFailed { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}
