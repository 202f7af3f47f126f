//! `strata dbt`: generate models and run the dbt CLI.

use tracing::{debug, instrument};

use strata_core::{
    application::{DbtAction, GeneratorSettings},
    domain::{ArtifactDescriptor, ArtifactKind},
};

use super::{assist_service, read_input_file, report_artifact, transform_service};
use crate::{
    cli::{DbtCommands, GlobalArgs, ModelArgs, SelectArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct dbt subcommand.
pub fn execute(
    cmd: DbtCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let settings = config.to_settings(&global.project_dir, global.lenient);
    match cmd {
        DbtCommands::Model(args) => generate_model(args, settings, &output),
        DbtCommands::Run(args) => run(DbtAction::Run, args, settings, &output),
        DbtCommands::Test(args) => run(DbtAction::Test, args, settings, &output),
        DbtCommands::Compile(args) => run(DbtAction::Compile, args, settings, &output),
    }
}

#[instrument(skip_all, fields(model = %args.name))]
fn generate_model(
    args: ModelArgs,
    settings: GeneratorSettings,
    output: &OutputManager,
) -> CliResult<()> {
    let descriptor = build_descriptor(&args)?;
    output.confirm_overwrite(&settings.artifact_path(&descriptor))?;

    let body = match (&args.sql, &args.sql_file, &args.ai) {
        (Some(sql), _, _) => Some(sql.clone()),
        (None, Some(path), _) => Some(read_input_file(path)?),
        (None, None, Some(prompt)) => Some(draft_sql(prompt, &settings, output)?),
        (None, None, None) => None,
    };
    let descriptor = match body {
        Some(body) => descriptor.with_body(body),
        None => descriptor,
    };
    debug!(has_body = descriptor.params().body.is_some(), "Model descriptor built");

    let artifact = transform_service(settings.clone()).generate_model(&descriptor)?;
    report_artifact(output, &args.name, &artifact, &settings)
}

fn build_descriptor(args: &ModelArgs) -> CliResult<ArtifactDescriptor> {
    let mut builder = ArtifactDescriptor::builder(args.name.as_str(), ArtifactKind::Model)
        .tags(args.tags.iter().cloned())
        .columns(args.columns.iter().cloned());
    if let Some(materialized) = args.materialized {
        builder = builder.materialized(materialized.into());
    }
    if let Some(description) = &args.description {
        builder = builder.description(description.as_str());
    }
    for test in &args.tests {
        builder = builder.test(test.as_str());
    }
    Ok(builder.build()?)
}

fn draft_sql(
    prompt: &str,
    settings: &GeneratorSettings,
    output: &OutputManager,
) -> CliResult<String> {
    let spinner = output.spinner(&format!(
        "Drafting SQL with the {} provider...",
        settings.ai.provider
    ));
    let drafted = assist_service(settings.clone()).draft_model_sql(prompt);
    spinner.finish_and_clear();
    Ok(drafted?)
}

fn run(
    action: DbtAction,
    args: SelectArgs,
    settings: GeneratorSettings,
    output: &OutputManager,
) -> CliResult<()> {
    transform_service(settings).run(action, args.select.as_deref())?;
    output.success(&format!("dbt {action} finished"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::MaterializedArg;
    use strata_core::domain::{ColumnRecord, Materialization};

    fn args(name: &str) -> ModelArgs {
        ModelArgs {
            name: name.into(),
            materialized: None,
            sql: None,
            sql_file: None,
            ai: None,
            description: None,
            tags: vec![],
            columns: vec![],
            tests: vec![],
        }
    }

    #[test]
    fn descriptor_carries_flags() {
        let mut a = args("fct_orders");
        a.materialized = Some(MaterializedArg::Table);
        a.description = Some("one row per order".into());
        a.tags = vec!["finance".into()];
        a.columns = vec![ColumnRecord::new("order_id")];
        a.tests = vec!["unique".into()];

        let d = build_descriptor(&a).unwrap();
        let p = d.params();
        assert_eq!(p.materialized, Some(Materialization::Table));
        assert_eq!(p.description.as_deref(), Some("one row per order"));
        assert_eq!(p.tags, vec!["finance"]);
        assert_eq!(p.columns.len(), 1);
        assert_eq!(p.tests, vec!["unique"]);
    }

    #[test]
    fn invalid_name_is_a_user_error() {
        let err = build_descriptor(&args("9bad name")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
