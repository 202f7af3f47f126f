//! Top-level error returned by every core operation.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{self, DomainError};

#[derive(Debug, Error, Clone)]
pub enum StrataError {
    /// Rejected input or a document the core refuses to interpret.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Filesystem, external tool or AI provider failure.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

/// Coarse classification the CLI turns into exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidArgument,
    ParseAmbiguous,
    NotFound,
    ExternalProcess,
    NotImplemented,
    Internal,
}

pub type StrataResult<T> = Result<T, StrataError>;

impl StrataError {
    /// Hints for the user, most specific first.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                domain::ErrorCategory::InvalidArgument => ErrorCategory::InvalidArgument,
                domain::ErrorCategory::ParseAmbiguous => ErrorCategory::ParseAmbiguous,
            },
            Self::Application(e) => e.category(),
        }
    }
}
