//! Dagster use cases: generate assets, jobs and schedules, materialize.

use tracing::{info, instrument};

use crate::{
    application::{
        GeneratorSettings,
        ports::{ArtifactRenderer, Filesystem, ToolInvocation, ToolRunner},
        services::{DeclarationService, GeneratedArtifact, Registration, support},
    },
    domain::{ArtifactDescriptor, ArtifactKind, Destination, IndexEntry},
    error::StrataResult,
};

/// Generates Dagster definitions and runs the dagster CLI.
pub struct OrchestrationService {
    settings: GeneratorSettings,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn ArtifactRenderer>,
    runner: Box<dyn ToolRunner>,
}

impl OrchestrationService {
    pub fn new(
        settings: GeneratorSettings,
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn ArtifactRenderer>,
        runner: Box<dyn ToolRunner>,
    ) -> Self {
        Self {
            settings,
            filesystem,
            renderer,
            runner,
        }
    }

    pub fn generate_asset(&self, descriptor: &ArtifactDescriptor) -> StrataResult<GeneratedArtifact> {
        self.generate(descriptor, ArtifactKind::Asset)
    }

    pub fn generate_job(&self, descriptor: &ArtifactDescriptor) -> StrataResult<GeneratedArtifact> {
        self.generate(descriptor, ArtifactKind::Job)
    }

    pub fn generate_schedule(
        &self,
        descriptor: &ArtifactDescriptor,
    ) -> StrataResult<GeneratedArtifact> {
        self.generate(descriptor, ArtifactKind::ScheduledTrigger)
    }

    /// `dagster asset materialize -m <module> --select <select|*>`.
    #[instrument(skip(self))]
    pub fn materialize(&self, select: Option<&str>) -> StrataResult<()> {
        let invocation = ToolInvocation::new("dagster", self.settings.dagster_dir())
            .arg("asset")
            .arg("materialize")
            .arg("-m")
            .arg(self.settings.dagster_module.as_str())
            .arg("--select")
            .arg(select.unwrap_or("*"));
        support::run_checked(self.runner.as_ref(), invocation)
    }

    #[instrument(skip_all, fields(name = %descriptor.name(), kind = %expected))]
    fn generate(
        &self,
        descriptor: &ArtifactDescriptor,
        expected: ArtifactKind,
    ) -> StrataResult<GeneratedArtifact> {
        support::expect_kind(descriptor, expected)?;

        let destination = Destination::for_artifact(descriptor, &self.settings.layout);
        let content = self.renderer.render(descriptor, &self.settings)?;
        let path = self.settings.resolve(destination.path());
        support::write_with_parents(self.filesystem.as_ref(), &path, &content)?;
        info!(path = %path.display(), "Definition written");

        let directory = self.settings.resolve(&destination.directory);
        let entry = IndexEntry::with_module(descriptor.name(), destination.module_name());
        let outcome = DeclarationService::new(self.filesystem.as_ref())
            .register_symbol(&directory, &entry)?;

        Ok(GeneratedArtifact {
            path,
            kind: expected,
            layer: None,
            registration: Registration::Index {
                path: DeclarationService::index_path(&directory),
                outcome,
            },
        })
    }
}
