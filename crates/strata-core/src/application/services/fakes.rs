//! In-memory filesystem for service tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    error::StrataResult,
};

/// Cloning shares state, so a test can keep a handle after boxing one.
#[derive(Clone, Default)]
pub(crate) struct FakeFilesystem {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl FakeFilesystem {
    pub(crate) fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_string());
        self
    }

    pub(crate) fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub(crate) fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Filesystem for FakeFilesystem {
    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        let mut dirs = self.dirs.lock().map_err(|_| ApplicationError::StoreLockError)?;
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        self.files
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> StrataResult<Option<String>> {
        Ok(self
            .files
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .get(path)
            .cloned())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().is_ok_and(|f| f.contains_key(path))
            || self.dirs.lock().is_ok_and(|d| d.contains(path))
    }
}
