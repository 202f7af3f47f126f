//! Generator settings passed explicitly into every service.

use std::path::{Path, PathBuf};

use crate::application::ports::AiParams;
use crate::domain::{ArtifactDescriptor, Destination, Materialization, ParseMode, ProjectLayout};

/// Everything the services need to know about the project they write into.
///
/// Built by the caller (normally from `strata.json`); the core keeps no
/// module-level defaults of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Absolute (or cwd-relative) project root every layout path hangs off.
    pub project_root: PathBuf,
    pub layout: ProjectLayout,
    /// `version:` header written into new `schema.yml` documents.
    pub schema_version: u32,
    pub default_materialization: Materialization,
    pub parse_mode: ParseMode,
    /// Python module passed to `dagster -m`.
    pub dagster_module: String,
    pub ai: AiParams,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            layout: ProjectLayout::default(),
            schema_version: 2,
            default_materialization: Materialization::View,
            parse_mode: ParseMode::Strict,
            dagster_module: "orchestration".into(),
            ai: AiParams::default(),
        }
    }
}

impl GeneratorSettings {
    /// Resolve a layout-relative path against the project root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(relative)
    }

    /// Absolute location the descriptor's file will be written to.
    pub fn artifact_path(&self, descriptor: &ArtifactDescriptor) -> PathBuf {
        self.resolve(Destination::for_artifact(descriptor, &self.layout).path())
    }

    /// Directory the dbt CLI runs in.
    pub fn dbt_dir(&self) -> PathBuf {
        self.resolve(&self.layout.dbt_project)
    }

    /// Directory the dagster CLI runs in (parent of the package).
    pub fn dagster_dir(&self) -> PathBuf {
        match self.layout.dagster_package.parent() {
            Some(parent) => self.resolve(parent),
            None => self.project_root.clone(),
        }
    }

    /// Directory the supabase CLI runs in (parent of `supabase/`).
    pub fn supabase_dir(&self) -> PathBuf {
        match self.layout.supabase_project.parent() {
            Some(parent) => self.resolve(parent),
            None => self.project_root.clone(),
        }
    }
}
