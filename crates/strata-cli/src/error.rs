//! CLI-level errors and how they reach the terminal.
//!
//! Core failures are wrapped unchanged; the CLI adds its own variants for
//! problems found before the core is called. Every error maps to a process
//! exit status and a short list of hints.

use std::error::Error as _;
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use strata_core::{
    domain::DomainError,
    error::{ErrorCategory, StrataError},
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments that parsed but make no sense together.
    #[error("Invalid input: {message}")]
    Usage { message: String },

    /// `strata.json` could not be loaded, or a requested key is unknown.
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{0}")]
    Core(#[from] StrataError),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// An existing file would be replaced and nobody agreed to it.
    #[error("Refusing to overwrite {path}")]
    OverwriteRefused { path: PathBuf },
}

/// Process exit status, one per family of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Failure = 1,
    Usage = 2,
    NotFound = 3,
    Config = 4,
}

impl From<io::Error> for CliError {
    fn from(source: io::Error) -> Self {
        CliError::Io {
            context: format!("I/O error: {source}"),
            source,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        CliError::Core(err.into())
    }
}

impl CliError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        CliError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn status(&self) -> ExitStatus {
        match self {
            Self::Usage { .. } | Self::OverwriteRefused { .. } => ExitStatus::Usage,
            Self::Config { .. } => ExitStatus::Config,
            Self::Io { .. } => ExitStatus::Failure,
            Self::Core(core) => match core.category() {
                ErrorCategory::InvalidArgument | ErrorCategory::ParseAmbiguous => {
                    ExitStatus::Usage
                }
                ErrorCategory::NotFound => ExitStatus::NotFound,
                ErrorCategory::ExternalProcess
                | ErrorCategory::NotImplemented
                | ErrorCategory::Internal => ExitStatus::Failure,
            },
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.status() as u8
    }

    /// What the user can try next.
    pub fn hints(&self) -> Vec<String> {
        match self {
            Self::Usage { .. } => vec!["Run the command with --help to see its arguments".into()],
            Self::Config { .. } => vec![
                "Check strata.json in the project directory, or the file passed to --config".into(),
                "Environment overrides look like STRATA_DBT__PROJECT_DIR=transform".into(),
                "`strata config list` prints the effective configuration".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::Io { .. } => vec!["Check that the path exists and is writable".into()],
            Self::OverwriteRefused { path } => vec![format!(
                "Re-run with --yes to replace {}",
                path.display()
            )],
        }
    }

    /// Text written to stderr before exiting.
    ///
    /// With `verbose` the source chain is listed and the trailing
    /// `--verbose` reminder is dropped.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, f: fn(&str) -> String| {
            if color { f(text) } else { text.to_owned() }
        };

        let mut out = String::new();
        let _ = writeln!(out, "\n{} {self}", paint("Error:", |s| s.red().bold().to_string()));

        if verbose {
            let mut source = self.source();
            while let Some(cause) = source {
                let _ = writeln!(out, "  {} {cause}", paint("caused by:", |s| s.dimmed().to_string()));
                source = cause.source();
            }
        }

        let hints = self.hints();
        if !hints.is_empty() {
            let _ = writeln!(out, "\n{}", paint("Hints:", |s| s.yellow().bold().to_string()));
            for hint in hints {
                let _ = writeln!(out, "  - {hint}");
            }
        }

        if !verbose {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Use -v / --verbose for more details.", |s| s.dimmed().to_string())
            );
        }
        out
    }

    /// Record the failure in the log before it is printed.
    pub fn trace(&self) {
        match self.status() {
            ExitStatus::Usage | ExitStatus::NotFound => tracing::warn!(error = %self, "Command rejected"),
            ExitStatus::Config | ExitStatus::Failure => tracing::error!(error = %self, "Command failed"),
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "Underlying cause");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::application::ApplicationError;

    fn core(err: impl Into<StrataError>) -> CliError {
        CliError::Core(err.into())
    }

    #[test]
    fn invalid_argument_exits_two() {
        let err = core(DomainError::InvalidArgument {
            field: "name",
            reason: "must not be empty".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn parse_ambiguous_exits_two() {
        let err = core(DomainError::ParseAmbiguous {
            document: "schema.yml".into(),
            line: 4,
            reason: "unsupported key 'sources'".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn not_found_exits_three() {
        let err = core(ApplicationError::NotFound {
            path: PathBuf::from("models/missing.sql"),
        });
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn configuration_exits_four() {
        let err = CliError::Config { message: "x".into() };
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn external_tool_and_missing_backend_exit_one() {
        let tool = core(ApplicationError::ExternalProcessFailure {
            command: "dbt run".into(),
            code: Some(2),
            stderr: "Compilation Error".into(),
        });
        let backend = core(ApplicationError::NotImplemented {
            feature: "The openai provider".into(),
        });
        assert_eq!(tool.exit_code(), 1);
        assert_eq!(backend.exit_code(), 1);
    }

    #[test]
    fn overwrite_refusal_hints_at_yes() {
        let err = CliError::OverwriteRefused {
            path: PathBuf::from("dbt/models/staging/stg_users.sql"),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.hints().iter().any(|h| h.contains("--yes")));
    }

    #[test]
    fn plain_render_has_no_escape_codes() {
        let err = CliError::OverwriteRefused {
            path: PathBuf::from("/tmp/x"),
        };
        let text = err.render(false, false);
        assert!(text.contains("Error: Refusing to overwrite /tmp/x"));
        assert!(text.contains("Hints:"));
        assert!(text.contains("--verbose"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn verbose_render_lists_causes() {
        let err = CliError::io(
            "reading model",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.render(true, false);
        assert!(text.contains("caused by: denied"));
        assert!(!text.contains("--verbose"));
    }
}
