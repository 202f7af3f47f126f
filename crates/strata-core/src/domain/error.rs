// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Caller misuse (rejected before any file I/O)
    // ========================================================================
    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("'{kind}' artifacts require the '{parameter}' parameter")]
    MissingParameter {
        kind: &'static str,
        parameter: &'static str,
    },

    // ========================================================================
    // Documents outside the supported dialect
    // ========================================================================
    #[error("Could not interpret {document} at line {line}: {reason}")]
    ParseAmbiguous {
        document: String,
        line: usize,
        reason: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidArgument { field, reason } => vec![
                format!("Check the {}: {}", field, reason),
                "Names must start with a letter or '_' and contain only letters, digits and '_'"
                    .into(),
                "Examples: stg_users, fct_orders, daily_revenue".into(),
            ],
            Self::MissingParameter { kind, parameter } => vec![
                format!("A {} needs a value for '{}'", kind, parameter),
                "Use --help on the subcommand to see its required flags".into(),
            ],
            Self::ParseAmbiguous { document, line, .. } => vec![
                format!("Inspect {} around line {}", document, line),
                "Only the subset of YAML that strata writes itself is understood".into(),
                "Re-run with --lenient to skip unrecognised lines (they are dropped on rewrite)"
                    .into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } | Self::MissingParameter { .. } => {
                ErrorCategory::InvalidArgument
            }
            Self::ParseAmbiguous { .. } => ErrorCategory::ParseAmbiguous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidArgument,
    ParseAmbiguous,
}
