//! Where generated artifacts land inside a project.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{
    convention,
    entities::artifact::ArtifactDescriptor,
    value_objects::{ArtifactKind, ModelLayer},
};

/// File name of the per-layer dbt metadata document.
pub const METADATA_FILE: &str = "schema.yml";

/// File name of the per-directory Python index.
pub const INDEX_FILE: &str = "__init__.py";

/// Tool project roots, relative to the strata project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    pub dbt_project: PathBuf,
    pub dagster_package: PathBuf,
    pub supabase_project: PathBuf,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            dbt_project: PathBuf::from("dbt"),
            dagster_package: PathBuf::from("dagster").join("orchestration"),
            supabase_project: PathBuf::from("supabase"),
        }
    }
}

impl ProjectLayout {
    pub fn models_dir(&self) -> PathBuf {
        self.dbt_project.join("models")
    }

    pub fn layer_dir(&self, layer: ModelLayer) -> PathBuf {
        self.models_dir().join(layer.dir_name())
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.supabase_project.join("migrations")
    }

    /// Directory holding every generated file of an indexed Dagster kind.
    pub fn dagster_dir(&self, kind: ArtifactKind) -> Option<PathBuf> {
        let sub = match kind {
            ArtifactKind::Asset => "assets",
            ArtifactKind::Job => "jobs",
            ArtifactKind::ScheduledTrigger => "schedules",
            ArtifactKind::Model | ArtifactKind::Migration => return None,
        };
        Some(self.dagster_package.join(sub))
    }
}

/// Resolved output location for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub directory: PathBuf,
    pub file_name: String,
    /// Set for dbt models only.
    pub layer: Option<ModelLayer>,
}

impl Destination {
    /// Resolve the destination of `descriptor` under `layout`.
    ///
    /// Pure: the same descriptor and layout always yield the same path.
    pub fn for_artifact(descriptor: &ArtifactDescriptor, layout: &ProjectLayout) -> Self {
        let name = descriptor.name();
        let kind = descriptor.kind();
        let ext = kind.file_extension();

        match kind {
            ArtifactKind::Model => {
                let layer = convention::resolve(name);
                Self {
                    directory: layout.layer_dir(layer),
                    file_name: format!("{name}.{ext}"),
                    layer: Some(layer),
                }
            }
            ArtifactKind::Migration => {
                let file_name = match descriptor.params().version.as_deref() {
                    Some(version) if !version.is_empty() => format!("{version}_{name}.{ext}"),
                    _ => format!("{name}.{ext}"),
                };
                Self {
                    directory: layout.migrations_dir(),
                    file_name,
                    layer: None,
                }
            }
            ArtifactKind::Asset | ArtifactKind::Job | ArtifactKind::ScheduledTrigger => Self {
                directory: layout
                    .dagster_dir(kind)
                    .unwrap_or_else(|| layout.dagster_package.clone()),
                file_name: format!("{name}.{ext}"),
                layer: None,
            },
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// File stem, used as the Python module name in index files.
    pub fn module_name(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }

    /// Sibling metadata document for dbt models.
    pub fn metadata_path(&self) -> Option<PathBuf> {
        self.layer.map(|_| self.directory.join(METADATA_FILE))
    }

    /// Sibling index file for indexed kinds.
    pub fn index_path(&self) -> PathBuf {
        self.directory.join(INDEX_FILE)
    }
}
