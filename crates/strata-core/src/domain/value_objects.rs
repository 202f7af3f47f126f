//! Domain value objects: ArtifactKind, ModelLayer, Materialization, ParseMode,
//! AiProviderKind.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// What a generated file represents in its target tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// dbt model (`.sql`).
    Model,
    /// Dagster software-defined asset.
    Asset,
    /// Dagster job.
    Job,
    /// Dagster schedule.
    ScheduledTrigger,
    /// Supabase SQL migration.
    Migration,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Asset => "asset",
            Self::Job => "job",
            Self::ScheduledTrigger => "schedule",
            Self::Migration => "migration",
        }
    }

    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::Model | Self::Migration => "sql",
            Self::Asset | Self::Job | Self::ScheduledTrigger => "py",
        }
    }

    /// Whether generated files of this kind are re-exported from a
    /// per-directory `__init__.py`.
    pub const fn is_indexed(&self) -> bool {
        matches!(self, Self::Asset | Self::Job | Self::ScheduledTrigger)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "model" => Ok(Self::Model),
            "asset" => Ok(Self::Asset),
            "job" => Ok(Self::Job),
            "schedule" | "scheduled_trigger" => Ok(Self::ScheduledTrigger),
            "migration" => Ok(Self::Migration),
            other => Err(DomainError::InvalidArgument {
                field: "artifact kind",
                reason: format!("unknown artifact kind: {other}"),
            }),
        }
    }
}

// ── ModelLayer ───────────────────────────────────────────────────────────────

/// dbt model layer, which doubles as the subdirectory under `models/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelLayer {
    Staging,
    Intermediate,
    Marts,
}

impl ModelLayer {
    pub const ALL: [ModelLayer; 3] = [Self::Staging, Self::Intermediate, Self::Marts];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Intermediate => "intermediate",
            Self::Marts => "marts",
        }
    }

    pub const fn dir_name(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ModelLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Materialization ──────────────────────────────────────────────────────────

/// dbt materialization strategy written into the model's config header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
    #[default]
    View,
    Table,
    Incremental,
    Ephemeral,
}

impl Materialization {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Table => "table",
            Self::Incremental => "incremental",
            Self::Ephemeral => "ephemeral",
        }
    }
}

impl fmt::Display for Materialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Materialization {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "table" => Ok(Self::Table),
            "incremental" => Ok(Self::Incremental),
            "ephemeral" => Ok(Self::Ephemeral),
            other => Err(DomainError::InvalidArgument {
                field: "materialization",
                reason: format!(
                    "unknown materialization '{other}' (expected view, table, incremental or ephemeral)"
                ),
            }),
        }
    }
}

// ── ParseMode ────────────────────────────────────────────────────────────────

/// How the restricted-YAML reader treats lines outside its dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Fail with `DomainError::ParseAmbiguous`.
    #[default]
    Strict,
    /// Skip the line and report it.
    Lenient,
}

// ── AiProviderKind ───────────────────────────────────────────────────────────

/// Backend used by the assistant features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    #[default]
    Mock,
    OpenAi,
    Anthropic,
}

impl AiProviderKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for AiProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(DomainError::InvalidArgument {
                field: "ai provider",
                reason: format!("unknown provider '{other}' (expected mock, openai or anthropic)"),
            }),
        }
    }
}
