//! Inventory of generated artifacts found on disk.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use strata_core::{
    application::GeneratorSettings,
    domain::{ArtifactKind, INDEX_FILE, ModelLayer},
};

/// One artifact file, with its path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub kind: ArtifactKind,
    pub name: String,
    pub path: PathBuf,
    pub layer: Option<ModelLayer>,
}

/// Walk the project's artifact directories. Missing directories are empty.
pub fn scan(settings: &GeneratorSettings) -> Vec<CatalogEntry> {
    let layout = &settings.layout;
    let mut entries = Vec::new();

    for layer in ModelLayer::ALL {
        collect(
            settings,
            &layout.layer_dir(layer),
            "sql",
            ArtifactKind::Model,
            Some(layer),
            &mut entries,
        );
    }
    for kind in [ArtifactKind::Asset, ArtifactKind::Job, ArtifactKind::ScheduledTrigger] {
        if let Some(dir) = layout.dagster_dir(kind) {
            collect(settings, &dir, "py", kind, None, &mut entries);
        }
    }
    collect(
        settings,
        &layout.migrations_dir(),
        "sql",
        ArtifactKind::Migration,
        None,
        &mut entries,
    );

    debug!(count = entries.len(), "Catalog scanned");
    entries
}

fn collect(
    settings: &GeneratorSettings,
    relative_dir: &Path,
    extension: &str,
    kind: ArtifactKind,
    layer: Option<ModelLayer>,
    out: &mut Vec<CatalogEntry>,
) {
    let dir = settings.resolve(relative_dir);
    if !dir.is_dir() {
        return;
    }

    let walker = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, dir = %dir.display(), "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(extension)
            || path.file_name().and_then(|n| n.to_str()) == Some(INDEX_FILE)
        {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        out.push(CatalogEntry {
            kind,
            name: stem.to_string(),
            path: relative_dir.join(entry.file_name()),
            layer,
        });
    }
}
