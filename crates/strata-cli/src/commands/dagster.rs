//! `strata dagster`: generate assets, jobs and schedules; materialize assets.

use tracing::instrument;

use strata_core::{
    application::GeneratorSettings,
    domain::{ArtifactDescriptor, ArtifactKind},
};

use super::{orchestration_service, read_input_file, report_artifact};
use crate::{
    cli::{AssetArgs, DagsterCommands, GlobalArgs, JobArgs, ScheduleArgs, SelectArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct dagster subcommand.
pub fn execute(
    cmd: DagsterCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let settings = config.to_settings(&global.project_dir, global.lenient);
    match cmd {
        DagsterCommands::Asset(args) => generate_asset(args, settings, &output),
        DagsterCommands::Job(args) => generate_job(args, settings, &output),
        DagsterCommands::Schedule(args) => generate_schedule(args, settings, &output),
        DagsterCommands::Materialize(args) => materialize(args, settings, &output),
    }
}

#[instrument(skip_all, fields(asset = %args.name))]
fn generate_asset(
    args: AssetArgs,
    settings: GeneratorSettings,
    output: &OutputManager,
) -> CliResult<()> {
    let mut builder = ArtifactDescriptor::builder(args.name.as_str(), ArtifactKind::Asset)
        .deps(args.deps)
        .tags(args.tags);
    if let Some(kind) = args.compute_kind {
        builder = builder.compute_kind(kind);
    }
    if let Some(group) = args.group {
        builder = builder.group(group);
    }
    if let Some(description) = args.description {
        builder = builder.description(description);
    }
    let descriptor = builder.build()?;
    output.confirm_overwrite(&settings.artifact_path(&descriptor))?;

    let descriptor = match &args.code_file {
        Some(path) => descriptor.with_body(read_input_file(path)?),
        None => descriptor,
    };

    let artifact = orchestration_service(settings.clone()).generate_asset(&descriptor)?;
    report_artifact(output, &args.name, &artifact, &settings)
}

#[instrument(skip_all, fields(job = %args.name))]
fn generate_job(args: JobArgs, settings: GeneratorSettings, output: &OutputManager) -> CliResult<()> {
    let mut builder =
        ArtifactDescriptor::builder(args.name.as_str(), ArtifactKind::Job).tags(args.tags);
    if let Some(description) = args.description {
        builder = builder.description(description);
    }
    let descriptor = builder.build()?;
    output.confirm_overwrite(&settings.artifact_path(&descriptor))?;

    let artifact = orchestration_service(settings.clone()).generate_job(&descriptor)?;
    report_artifact(output, &args.name, &artifact, &settings)
}

#[instrument(skip_all, fields(schedule = %args.name, job = %args.job))]
fn generate_schedule(
    args: ScheduleArgs,
    settings: GeneratorSettings,
    output: &OutputManager,
) -> CliResult<()> {
    let mut builder =
        ArtifactDescriptor::builder(args.name.as_str(), ArtifactKind::ScheduledTrigger)
            .target_job(args.job);
    if let Some(cron) = args.cron {
        builder = builder.cron(cron);
    }
    let descriptor = builder.build()?;
    output.confirm_overwrite(&settings.artifact_path(&descriptor))?;

    let artifact = orchestration_service(settings.clone()).generate_schedule(&descriptor)?;
    report_artifact(output, &args.name, &artifact, &settings)
}

fn materialize(args: SelectArgs, settings: GeneratorSettings, output: &OutputManager) -> CliResult<()> {
    orchestration_service(settings).materialize(args.select.as_deref())?;
    output.success("dagster asset materialize finished")?;
    Ok(())
}
