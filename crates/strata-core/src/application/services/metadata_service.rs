//! Metadata store: dbt `schema.yml` documents.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::{
    application::{ports::Filesystem, services::support},
    domain::{MetadataDocument, ModelUpdate, ParseMode, UpsertOutcome, dialect},
    error::StrataResult,
};

/// Reads and upserts model records in metadata documents.
pub struct MetadataService<'a> {
    filesystem: &'a dyn Filesystem,
    default_version: u32,
    mode: ParseMode,
}

impl<'a> MetadataService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, default_version: u32, mode: ParseMode) -> Self {
        Self {
            filesystem,
            default_version,
            mode,
        }
    }

    /// Load the document at `path`; an absent file is an empty document.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> StrataResult<MetadataDocument> {
        let Some(text) = self.filesystem.read_to_string(path)? else {
            debug!("No metadata document yet");
            return Ok(MetadataDocument::new(self.default_version));
        };

        let parsed = dialect::parse(
            &text,
            &path.display().to_string(),
            self.default_version,
            self.mode,
        )?;

        for skipped in &parsed.skipped {
            warn!(
                line = skipped.line,
                content = %skipped.content,
                reason = %skipped.reason,
                "Ignored line outside the supported YAML subset"
            );
        }

        Ok(parsed.document)
    }

    /// Insert or update one model record and write the document back.
    #[instrument(skip_all, fields(path = %path.display(), model = %update.name))]
    pub fn upsert_model(&self, path: &Path, update: ModelUpdate) -> StrataResult<UpsertOutcome> {
        let mut document = self.load(path)?;
        let outcome = document.upsert_model(update);
        support::write_with_parents(self.filesystem, path, &dialect::serialize(&document))?;
        debug!(?outcome, "Metadata written");
        Ok(outcome)
    }
}
