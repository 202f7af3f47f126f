//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::GeneratorSettings;
use crate::domain::{AiProviderKind, ArtifactDescriptor, ProjectStructure};
use crate::error::StrataResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StrataResult<()>;

    /// Replace a file's content in one complete write.
    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()>;

    /// Read a file; `Ok(None)` when it does not exist.
    fn read_to_string(&self, path: &Path) -> StrataResult<Option<String>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for generated file content.
///
/// Implemented by:
/// - `strata_adapters::renderer::TemplateRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactRenderer: Send + Sync {
    /// Produce the full text of the file for `descriptor`.
    fn render(
        &self,
        descriptor: &ArtifactDescriptor,
        settings: &GeneratorSettings,
    ) -> StrataResult<String>;

    /// Produce the skeleton written by `strata init`, rooted at the project.
    fn skeleton(
        &self,
        project_name: &str,
        settings: &GeneratorSettings,
    ) -> StrataResult<ProjectStructure>;
}

/// One external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished external command. Stdout goes straight to the
/// terminal; stderr is captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal.
    pub status_code: Option<i32>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Port for running external tools (dbt, dagster, supabase).
///
/// Implemented by:
/// - `strata_adapters::process::CommandRunner`
#[cfg_attr(test, mockall::automock)]
pub trait ToolRunner: Send + Sync {
    /// Run to completion. Launch failures are errors; non-zero exits are not.
    fn run(&self, invocation: &ToolInvocation) -> StrataResult<ToolOutput>;
}

/// What the assistant is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistTask {
    DraftModel,
    Explain,
    Optimize,
}

/// Sampling parameters, defaulted from project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiParams {
    pub provider: AiProviderKind,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AiParams {
    fn default() -> Self {
        Self {
            provider: AiProviderKind::Mock,
            model: "mock-1".into(),
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub task: AssistTask,
    pub prompt: String,
    pub params: AiParams,
}

/// Port for text generation backends.
///
/// Implemented by:
/// - `strata_adapters::ai::MockProvider`
/// - `strata_adapters::ai::UnimplementedProvider` (OpenAI, Anthropic)
#[cfg_attr(test, mockall::automock)]
pub trait AiProvider: Send + Sync {
    fn kind(&self) -> AiProviderKind;

    fn generate(&self, request: &AiRequest) -> StrataResult<String>;
}
