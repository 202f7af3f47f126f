//! What a generation use case did, for the caller to display.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{ArtifactKind, ModelLayer, UpsertOutcome};

/// Report returned by every generation operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub layer: Option<ModelLayer>,
    pub registration: Registration,
}

/// Where the artifact was recorded besides its own file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Registration {
    None,
    Index {
        path: PathBuf,
        outcome: RegistrationOutcome,
    },
    Metadata {
        path: PathBuf,
        outcome: UpsertOutcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Added,
    AlreadyRegistered,
    /// The existing exports list could not be read; a fresh one was appended.
    Recovered,
}

impl GeneratedArtifact {
    /// One-line summary of the registration for status output.
    pub fn registration_summary(&self) -> Option<String> {
        match &self.registration {
            Registration::None => None,
            Registration::Index { path, outcome } => Some(match outcome {
                RegistrationOutcome::Added => format!("registered in {}", path.display()),
                RegistrationOutcome::AlreadyRegistered => {
                    format!("already registered in {}", path.display())
                }
                RegistrationOutcome::Recovered => format!(
                    "registered in {} (existing __all__ unreadable, appended a new one)",
                    path.display()
                ),
            }),
            Registration::Metadata { path, outcome } => Some(match outcome {
                UpsertOutcome::Inserted => format!("added to {}", path.display()),
                UpsertOutcome::Updated => format!("updated in {}", path.display()),
            }),
        }
    }
}
