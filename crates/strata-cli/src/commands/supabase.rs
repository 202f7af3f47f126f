//! `strata supabase`: write migrations and push them.

use tracing::instrument;

use strata_core::{
    application::GeneratorSettings,
    domain::{ArtifactDescriptor, ArtifactKind},
};

use super::{backend_service, read_input_file, report_artifact};
use crate::{
    cli::{GlobalArgs, MigrationArgs, SupabaseCommands},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct supabase subcommand.
pub fn execute(
    cmd: SupabaseCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let settings = config.to_settings(&global.project_dir, global.lenient);
    match cmd {
        SupabaseCommands::Migration(args) => generate_migration(args, settings, &output),
        SupabaseCommands::Push => {
            backend_service(settings).push()?;
            output.success("supabase db push finished")?;
            Ok(())
        }
    }
}

/// Migrations are versioned by timestamp, so there is nothing to overwrite.
#[instrument(skip_all, fields(migration = %args.name))]
fn generate_migration(
    args: MigrationArgs,
    settings: GeneratorSettings,
    output: &OutputManager,
) -> CliResult<()> {
    let mut builder = ArtifactDescriptor::builder(args.name.as_str(), ArtifactKind::Migration);
    if let Some(path) = &args.sql_file {
        builder = builder.body(read_input_file(path)?);
    }
    let descriptor = builder.build()?;

    let artifact = backend_service(settings.clone()).generate_migration(&descriptor)?;
    report_artifact(output, &args.name, &artifact, &settings)
}
