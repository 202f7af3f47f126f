//! Built-in renderer for generated artifacts.
//!
//! Content is produced from fixed templates per artifact kind; caller-supplied
//! bodies are kept verbatim apart from the configuration header.

pub mod header;
pub mod python;
pub mod skeleton;
pub mod sql;

use strata_core::{
    application::{GeneratorSettings, ports::ArtifactRenderer},
    domain::{ArtifactDescriptor, ArtifactKind, ProjectStructure},
    error::StrataResult,
};
use tracing::instrument;

/// Renderer backed by the templates compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactRenderer for TemplateRenderer {
    #[instrument(skip_all, fields(name = %descriptor.name(), kind = %descriptor.kind()))]
    fn render(
        &self,
        descriptor: &ArtifactDescriptor,
        settings: &GeneratorSettings,
    ) -> StrataResult<String> {
        Ok(match descriptor.kind() {
            ArtifactKind::Model => sql::model(descriptor, settings.default_materialization),
            ArtifactKind::Migration => sql::migration(descriptor),
            ArtifactKind::Asset | ArtifactKind::Job | ArtifactKind::ScheduledTrigger => {
                python::definition(descriptor)
            }
        })
    }

    #[instrument(skip(self, settings))]
    fn skeleton(
        &self,
        project_name: &str,
        settings: &GeneratorSettings,
    ) -> StrataResult<ProjectStructure> {
        skeleton::project(project_name, settings)
    }
}
