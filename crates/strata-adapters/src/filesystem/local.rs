//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{StrataError, StrataResult},
};

/// Production filesystem implementation.
///
/// Every write goes to a temporary file in the target's directory and is
/// renamed over the target, so readers see either the old or the new file.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> StrataResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> StrataResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "create temp file"))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        tmp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;

        trace!(path = %path.display(), bytes = content.len(), "File written");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> StrataResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(path, e, "read file")),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StrataError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
