//! `strata list`: inventory of generated artifacts.

use strata_adapters::{CatalogEntry, catalog};

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// List every model, Dagster definition and migration in the project.
pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let settings = config.to_settings(&global.project_dir, global.lenient);
    let entries = catalog::scan(&settings);

    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            if entries.is_empty() {
                output.info("No generated artifacts found")?;
                return Ok(());
            }
            output.header(&format!("{} artifact(s):", entries.len()))?;
            output.print(&format!("  {:<20} {:<28} {:<14} PATH", "KIND", "NAME", "LAYER"))?;
            for entry in &entries {
                output.print(&table_row(entry))?;
            }
        }

        // JSON is written even in quiet mode so pipes keep working.
        ListFormat::Json => output.json(&entries)?,

        ListFormat::List => {
            for entry in &entries {
                output.print(&entry.path.display().to_string())?;
            }
        }
    }

    Ok(())
}

fn table_row(entry: &CatalogEntry) -> String {
    format!(
        "  {:<20} {:<28} {:<14} {}",
        entry.kind.as_str(),
        entry.name,
        entry.layer.map(|l| l.as_str()).unwrap_or("-"),
        entry.path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use strata_core::domain::{ArtifactKind, ModelLayer};

    #[test]
    fn table_row_shows_dash_without_layer() {
        let row = table_row(&CatalogEntry {
            kind: ArtifactKind::Asset,
            name: "raw_users".into(),
            path: PathBuf::from("dagster/orchestration/assets/raw_users.py"),
            layer: None,
        });
        assert!(row.contains("raw_users"));
        assert!(row.contains(" - "));
    }

    #[test]
    fn table_row_shows_layer() {
        let row = table_row(&CatalogEntry {
            kind: ArtifactKind::Model,
            name: "stg_users".into(),
            path: PathBuf::from("dbt/models/staging/stg_users.sql"),
            layer: Some(ModelLayer::Staging),
        });
        assert!(row.contains("staging"));
    }
}
