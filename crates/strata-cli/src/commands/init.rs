//! `strata init`: write the project skeleton.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use strata_core::application::{GeneratorSettings, InitReport};

use super::{display_path, project_service};
use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Create the skeleton under `--project-dir`.
#[instrument(skip_all, fields(dir = %global.project_dir.display()))]
pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let name = project_name(args.name, &config, &global.project_dir)?;
    debug!(project = %name, force = args.force, "Resolved project name");

    let settings = config.to_settings(&global.project_dir, global.lenient);
    let report = project_service(settings.clone()).init(&name, args.force)?;

    if output.is_json() {
        return output.json(&report);
    }
    print_report(&name, &report, &settings, &output)
}

/// Explicit argument, then `project.name` from config, then the directory name.
fn project_name(explicit: Option<String>, config: &AppConfig, dir: &Path) -> CliResult<String> {
    if let Some(name) = explicit.or_else(|| config.project.name.clone()) {
        return Ok(name);
    }
    let absolute: PathBuf =
        std::path::absolute(dir).map_err(|e| CliError::io(format!("resolving {}", dir.display()), e))?;
    absolute
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| CliError::Usage {
            message: format!(
                "cannot derive a project name from '{}'; pass one explicitly",
                dir.display()
            ),
        })
}

fn print_report(
    name: &str,
    report: &InitReport,
    settings: &GeneratorSettings,
    output: &OutputManager,
) -> CliResult<()> {
    output.success(&format!(
        "Initialised '{name}' in {}",
        settings.project_root.display()
    ))?;
    output.info(&format!(
        "{} created, {} kept, {} overwritten",
        report.created.len(),
        report.skipped.len(),
        report.overwritten.len()
    ))?;
    for path in &report.skipped {
        output.warning(&format!("kept existing {}", display_path(path, settings)))?;
    }
    for path in &report.overwritten {
        output.warning(&format!("overwrote {}", display_path(path, settings)))?;
    }

    if report.created.iter().any(|p| p.ends_with("strata.json")) {
        output.print("")?;
        output.print("Next steps:")?;
        output.print("  strata dbt model stg_example")?;
        output.print("  strata dagster asset example_asset")?;
    }
    Ok(())
}
