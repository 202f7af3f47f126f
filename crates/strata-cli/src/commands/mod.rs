//! Command handlers.
//!
//! Each handler translates parsed arguments into core calls and displays the
//! result. Adapters are wired here; no business logic lives in this module.

pub mod ai;
pub mod completions;
pub mod config;
pub mod dagster;
pub mod dbt;
pub mod init;
pub mod list;
pub mod supabase;

use std::path::Path;

use strata_adapters::{CommandRunner, LocalFilesystem, TemplateRenderer, provider_for};
use strata_core::{
    application::{
        ApplicationError, AssistService, BackendService, GeneratedArtifact, GeneratorSettings,
        OrchestrationService, ProjectService, TransformService, ports::Filesystem,
    },
    domain::ArtifactKind,
};

use crate::{error::CliResult, output::OutputManager};

// ── wiring ────────────────────────────────────────────────────────────────────

fn transform_service(settings: GeneratorSettings) -> TransformService {
    TransformService::new(
        settings,
        Box::new(LocalFilesystem::new()),
        Box::new(TemplateRenderer::new()),
        Box::new(CommandRunner::new()),
    )
}

fn orchestration_service(settings: GeneratorSettings) -> OrchestrationService {
    OrchestrationService::new(
        settings,
        Box::new(LocalFilesystem::new()),
        Box::new(TemplateRenderer::new()),
        Box::new(CommandRunner::new()),
    )
}

fn backend_service(settings: GeneratorSettings) -> BackendService {
    BackendService::new(
        settings,
        Box::new(LocalFilesystem::new()),
        Box::new(TemplateRenderer::new()),
        Box::new(CommandRunner::new()),
    )
}

fn project_service(settings: GeneratorSettings) -> ProjectService {
    ProjectService::new(
        settings,
        Box::new(LocalFilesystem::new()),
        Box::new(TemplateRenderer::new()),
    )
}

fn assist_service(settings: GeneratorSettings) -> AssistService {
    let provider = provider_for(settings.ai.provider);
    AssistService::new(settings, provider, Box::new(LocalFilesystem::new()))
}

// ── shared helpers ────────────────────────────────────────────────────────────

/// Read a user-supplied input file (`--sql-file`, `--code-file`).
fn read_input_file(path: &Path) -> CliResult<String> {
    match LocalFilesystem::new().read_to_string(path)? {
        Some(content) => Ok(content),
        None => Err(strata_core::error::StrataError::from(ApplicationError::NotFound {
            path: path.to_path_buf(),
        })
        .into()),
    }
}

fn kind_label(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Model => "dbt model",
        ArtifactKind::Asset => "Dagster asset",
        ArtifactKind::Job => "Dagster job",
        ArtifactKind::ScheduledTrigger => "Dagster schedule",
        ArtifactKind::Migration => "Supabase migration",
    }
}

/// Path shown to the user: relative to the project root when possible.
fn display_path(path: &Path, settings: &GeneratorSettings) -> String {
    path.strip_prefix(&settings.project_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Print what a generation operation did.
fn report_artifact(
    output: &OutputManager,
    name: &str,
    artifact: &GeneratedArtifact,
    settings: &GeneratorSettings,
) -> CliResult<()> {
    if output.is_json() {
        return output.json(artifact);
    }

    output.success(&format!(
        "Created {} '{}' at {}",
        kind_label(artifact.kind),
        name,
        display_path(&artifact.path, settings),
    ))?;
    if let Some(layer) = artifact.layer {
        output.info(&format!("Layer: {layer}"))?;
    }
    if let Some(summary) = artifact.registration_summary() {
        output.info(&summary)?;
    }
    Ok(())
}
