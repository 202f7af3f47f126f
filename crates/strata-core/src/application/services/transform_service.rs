//! dbt use cases: generate SQL models, drive the dbt CLI.

use std::fmt;
use std::str::FromStr;

use tracing::{info, instrument};

use crate::{
    application::{
        GeneratorSettings,
        ports::{ArtifactRenderer, Filesystem, ToolInvocation, ToolRunner},
        services::{GeneratedArtifact, MetadataService, Registration, support},
    },
    domain::{ArtifactDescriptor, ArtifactKind, Destination, DomainError, ModelUpdate},
    error::StrataResult,
};

/// dbt subcommands strata can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbtAction {
    Run,
    Test,
    Compile,
}

impl DbtAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Test => "test",
            Self::Compile => "compile",
        }
    }
}

impl fmt::Display for DbtAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbtAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "run" => Ok(Self::Run),
            "test" => Ok(Self::Test),
            "compile" => Ok(Self::Compile),
            _ => Err(DomainError::InvalidArgument {
                field: "dbt action",
                reason: format!("'{s}' is not one of run, test, compile"),
            }),
        }
    }
}

/// Generates dbt models and runs dbt.
pub struct TransformService {
    settings: GeneratorSettings,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn ArtifactRenderer>,
    runner: Box<dyn ToolRunner>,
}

impl TransformService {
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

    /// Write the model's SQL file and upsert its entry in the layer's
    /// `schema.yml`.
    ///
    /// The SQL file is written first; a failed metadata write leaves it on
    /// disk.
    #[instrument(skip_all, fields(model = %descriptor.name()))]
    pub fn generate_model(&self, descriptor: &ArtifactDescriptor) -> StrataResult<GeneratedArtifact> {
        support::expect_kind(descriptor, ArtifactKind::Model)?;

        let destination = Destination::for_artifact(descriptor, &self.settings.layout);
        let content = self.renderer.render(descriptor, &self.settings)?;
        let path = self.settings.resolve(destination.path());
        support::write_with_parents(self.filesystem.as_ref(), &path, &content)?;
        info!(path = %path.display(), layer = ?destination.layer, "Model written");

        let registration = match destination.metadata_path() {
            Some(relative) => {
                let metadata_path = self.settings.resolve(relative);
                let outcome = self
                    .metadata()
                    .upsert_model(&metadata_path, model_update(descriptor))?;
                Registration::Metadata {
                    path: metadata_path,
                    outcome,
                }
            }
            None => Registration::None,
        };

        Ok(GeneratedArtifact {
            path,
            kind: ArtifactKind::Model,
            layer: destination.layer,
            registration,
        })
    }

    /// `dbt <action> [--select <select>]` in the dbt project directory.
    #[instrument(skip(self))]
    pub fn run(&self, action: DbtAction, select: Option<&str>) -> StrataResult<()> {
        let mut invocation = ToolInvocation::new("dbt", self.settings.dbt_dir()).arg(action.as_str());
        if let Some(select) = select {
            invocation = invocation.arg("--select").arg(select);
        }
        support::run_checked(self.runner.as_ref(), invocation)
    }

    fn metadata(&self) -> MetadataService<'_> {
        MetadataService::new(
            self.filesystem.as_ref(),
            self.settings.schema_version,
            self.settings.parse_mode,
        )
    }
}

fn model_update(descriptor: &ArtifactDescriptor) -> ModelUpdate {
    let params = descriptor.params();
    let mut update = ModelUpdate::new(descriptor.name())
        .columns(params.columns.clone())
        .tests(params.tests.clone());
    if let Some(description) = &params.description {
        update = update.description(description.clone());
    }
    update
}
