//! Project initialisation.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        GeneratorSettings,
        ports::{ArtifactRenderer, Filesystem},
        services::support,
    },
    domain::{FsEntry, ProjectStructure},
    error::StrataResult,
};

/// What `init` did with each skeleton file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
    /// Existing files left untouched.
    pub skipped: Vec<PathBuf>,
    /// Existing files rewritten because `force` was set.
    pub overwritten: Vec<PathBuf>,
}

pub struct ProjectService {
    settings: GeneratorSettings,
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn ArtifactRenderer>,
}

impl ProjectService {
    pub fn new(
        settings: GeneratorSettings,
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn ArtifactRenderer>,
    ) -> Self {
        Self {
            settings,
            filesystem,
            renderer,
        }
    }

    /// Write the project skeleton under the project root.
    ///
    /// Existing files are skipped unless `force` is set. Safe to run again
    /// on an initialised project.
    #[instrument(skip(self), fields(root = %self.settings.project_root.display()))]
    pub fn init(&self, project_name: &str, force: bool) -> StrataResult<InitReport> {
        let structure = self.renderer.skeleton(project_name, &self.settings)?;
        structure.validate()?;
        info!(entries = structure.entry_count(), "Writing project skeleton");

        let report = self.write_all(&structure, force)?;
        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            "Project initialised"
        );
        Ok(report)
    }

    fn write_all(&self, structure: &ProjectStructure, force: bool) -> StrataResult<InitReport> {
        let mut report = InitReport::default();
        self.filesystem.create_dir_all(structure.root())?;

        for entry in structure.entries() {
            let path = structure.root().join(entry.path());
            match entry {
                FsEntry::Directory(_) => {
                    if !self.filesystem.exists(&path) {
                        self.filesystem.create_dir_all(&path)?;
                    }
                }
                FsEntry::File(file) => {
                    let exists = self.filesystem.exists(&path);
                    if exists && !force {
                        debug!(path = %path.display(), "Keeping existing file");
                        report.skipped.push(path);
                        continue;
                    }
                    support::write_with_parents(self.filesystem.as_ref(), &path, &file.content)?;
                    if exists {
                        report.overwritten.push(path);
                    } else {
                        report.created.push(path);
                    }
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ports::MockArtifactRenderer, services::fakes::FakeFilesystem};
    use crate::error::ErrorCategory;

    fn renderer() -> MockArtifactRenderer {
        let mut renderer = MockArtifactRenderer::new();
        renderer.expect_skeleton().returning(|name, settings| {
            Ok(ProjectStructure::new(settings.project_root.clone())
                .with_directory("dbt/models/staging")
                .with_file("strata.json", format!("{{\"project\":{{\"name\":\"{name}\"}}}}\n"))
                .with_file("dbt/dbt_project.yml", "name: acme\n"))
        });
        renderer
    }

    fn service(fs: &FakeFilesystem) -> ProjectService {
        ProjectService::new(
            GeneratorSettings {
                project_root: PathBuf::from("/acme"),
                ..GeneratorSettings::default()
            },
            Box::new(fs.clone()),
            Box::new(renderer()),
        )
    }

    #[test]
    fn fresh_init_creates_everything() {
        let fs = FakeFilesystem::default();
        let report = service(&fs).init("acme", false).unwrap();

        assert_eq!(report.created.len(), 2);
        assert!(report.skipped.is_empty());
        assert!(fs.exists(std::path::Path::new("/acme/dbt/models/staging")));
        assert!(fs.read("/acme/strata.json").unwrap().contains("acme"));
    }

    #[test]
    fn existing_files_are_skipped() {
        let fs = FakeFilesystem::default().with_file("/acme/strata.json", "{}\n");
        let report = service(&fs).init("acme", false).unwrap();

        assert_eq!(report.skipped, vec![PathBuf::from("/acme/strata.json")]);
        assert_eq!(fs.read("/acme/strata.json").unwrap(), "{}\n");
    }

    #[test]
    fn force_overwrites_existing_files() {
        let fs = FakeFilesystem::default().with_file("/acme/strata.json", "{}\n");
        let report = service(&fs).init("acme", true).unwrap();

        assert_eq!(report.overwritten, vec![PathBuf::from("/acme/strata.json")]);
        assert_ne!(fs.read("/acme/strata.json").unwrap(), "{}\n");
    }

    #[test]
    fn absolute_entries_are_rejected() {
        let mut renderer = MockArtifactRenderer::new();
        renderer.expect_skeleton().returning(|_, _| {
            Ok(ProjectStructure::new("/acme").with_file("/etc/passwd", "x"))
        });
        let fs = FakeFilesystem::default();
        let service = ProjectService::new(
            GeneratorSettings::default(),
            Box::new(fs.clone()),
            Box::new(renderer),
        );

        let err = service.init("acme", false).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
        assert_eq!(fs.file_count(), 0);
    }
}
