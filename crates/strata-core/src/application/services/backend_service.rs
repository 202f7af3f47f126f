//! Supabase use cases: timestamped migrations, `supabase db push`.

use chrono::Utc;
use tracing::{info, instrument};

use crate::{
    application::{
        GeneratorSettings,
        ports::{ArtifactRenderer, Filesystem, ToolInvocation, ToolRunner},
        services::{GeneratedArtifact, Registration, support},
    },
    domain::{ArtifactDescriptor, ArtifactKind, Destination},
    error::StrataResult,
};

/// Migration version format used by the Supabase CLI.
pub const VERSION_FORMAT: &str = "%Y%m%d%H%M%S";

pub struct BackendService {
    settings: GeneratorSettings,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn ArtifactRenderer>,
    runner: Box<dyn ToolRunner>,
}

impl BackendService {
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

    /// Write `<version>_<name>.sql` into the migrations directory.
    ///
    /// A descriptor without a version gets the current UTC timestamp.
    #[instrument(skip_all, fields(name = %descriptor.name()))]
    pub fn generate_migration(
        &self,
        descriptor: &ArtifactDescriptor,
    ) -> StrataResult<GeneratedArtifact> {
        let descriptor = match descriptor.params().version.as_deref() {
            Some(version) if !version.is_empty() => descriptor.clone(),
            _ => descriptor.with_version(Utc::now().format(VERSION_FORMAT).to_string()),
        };
        support::expect_kind(&descriptor, ArtifactKind::Migration)?;

        let destination = Destination::for_artifact(&descriptor, &self.settings.layout);
        let content = self.renderer.render(&descriptor, &self.settings)?;
        let path = self.settings.resolve(destination.path());
        support::write_with_parents(self.filesystem.as_ref(), &path, &content)?;
        info!(path = %path.display(), "Migration written");

        Ok(GeneratedArtifact {
            path,
            kind: ArtifactKind::Migration,
            layer: None,
            registration: Registration::None,
        })
    }

    /// `supabase db push` from the directory containing `supabase/`.
    #[instrument(skip(self))]
    pub fn push(&self) -> StrataResult<()> {
        let invocation = ToolInvocation::new("supabase", self.settings.supabase_dir())
            .arg("db")
            .arg("push");
        support::run_checked(self.runner.as_ref(), invocation)
    }
}
