//! Declaration store: registrations in Python `__init__.py` index files.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::{
    application::{ports::Filesystem, services::RegistrationOutcome},
    domain::{INDEX_FILE, IndexEntry, MergeOutcome, entities::index_file},
    error::StrataResult,
};

/// Registers generated symbols in the index file of their directory.
pub struct DeclarationService<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> DeclarationService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Path of the index file that governs `directory`.
    pub fn index_path(directory: &Path) -> PathBuf {
        directory.join(INDEX_FILE)
    }

    /// Make `entry` importable from `directory`'s index file.
    ///
    /// Creates the directory and file when absent. Registering the same
    /// entry twice leaves the file byte-identical.
    #[instrument(skip_all, fields(dir = %directory.display(), symbol = %entry.symbol))]
    pub fn register_symbol(
        &self,
        directory: &Path,
        entry: &IndexEntry,
    ) -> StrataResult<RegistrationOutcome> {
        if !self.filesystem.exists(directory) {
            self.filesystem.create_dir_all(directory)?;
        }

        let path = Self::index_path(directory);
        let existing = self.filesystem.read_to_string(&path)?.unwrap_or_default();

        match index_file::merge(&existing, entry) {
            MergeOutcome::Unchanged => {
                debug!("Symbol already registered");
                Ok(RegistrationOutcome::AlreadyRegistered)
            }
            MergeOutcome::Updated(content) => {
                self.filesystem.write_file(&path, &content)?;
                debug!("Symbol registered");
                Ok(RegistrationOutcome::Added)
            }
            MergeOutcome::Recovered { content, reason } => {
                warn!(
                    index = %path.display(),
                    %reason,
                    "Could not read existing __all__; appended a new one"
                );
                self.filesystem.write_file(&path, &content)?;
                Ok(RegistrationOutcome::Recovered)
            }
        }
    }

    /// Symbols currently imported by `directory`'s index file.
    pub fn registered(&self, directory: &Path) -> StrataResult<Vec<String>> {
        let content = self
            .filesystem
            .read_to_string(&Self::index_path(directory))?
            .unwrap_or_default();
        Ok(index_file::registered_symbols(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fakes::FakeFilesystem;

    #[test]
    fn creates_index_lazily() {
        let fs = FakeFilesystem::default();
        let service = DeclarationService::new(&fs);
        let dir = Path::new("pkg/assets");

        let outcome = service.register_symbol(dir, &IndexEntry::new("a1")).unwrap();

        assert_eq!(outcome, RegistrationOutcome::Added);
        assert!(fs.exists(dir));
        assert_eq!(
            fs.read("pkg/assets/__init__.py").unwrap(),
            "from .a1 import a1\n\n__all__ = [\"a1\"]\n"
        );
    }

    #[test]
    fn duplicate_registration_is_byte_identical() {
        let fs = FakeFilesystem::default();
        let service = DeclarationService::new(&fs);
        let dir = Path::new("pkg/assets");

        service.register_symbol(dir, &IndexEntry::new("a1")).unwrap();
        let first = fs.read("pkg/assets/__init__.py").unwrap();
        let outcome = service.register_symbol(dir, &IndexEntry::new("a1")).unwrap();

        assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(fs.read("pkg/assets/__init__.py").unwrap(), first);
        assert_eq!(first.matches("from .a1 import a1").count(), 1);
    }

    #[test]
    fn unreadable_exports_are_recovered() {
        let fs = FakeFilesystem::default()
            .with_file("pkg/jobs/__init__.py", "__all__ = compute()\n");
        let service = DeclarationService::new(&fs);

        let outcome = service
            .register_symbol(Path::new("pkg/jobs"), &IndexEntry::new("nightly"))
            .unwrap();

        assert_eq!(outcome, RegistrationOutcome::Recovered);
        assert_eq!(
            service.registered(Path::new("pkg/jobs")).unwrap(),
            vec!["nightly"]
        );
    }
}
