//! `strata ai`: explain or optimize an existing file.

use std::path::Path;

use serde::Serialize;
use tracing::instrument;

use strata_core::{
    application::{AssistService, ports::AssistTask},
    error::StrataResult,
};

use super::assist_service;
use crate::{
    cli::{AiCommands, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

type AssistCall = fn(&AssistService, &Path) -> StrataResult<String>;

#[derive(Debug, Serialize)]
struct AssistResponse<'a> {
    task: AssistTask,
    file: &'a Path,
    response: String,
}

/// Dispatch to the correct ai subcommand.
#[instrument(skip_all)]
pub fn execute(
    cmd: AiCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let settings = config.to_settings(&global.project_dir, global.lenient);
    let provider = settings.ai.provider;
    let service = assist_service(settings);

    let (task, file, call): (AssistTask, &Path, AssistCall) = match &cmd {
        AiCommands::Explain { file } => (
            AssistTask::Explain,
            file.as_path(),
            AssistService::explain_file as AssistCall,
        ),
        AiCommands::Optimize { file } => (
            AssistTask::Optimize,
            file.as_path(),
            AssistService::optimize_file as AssistCall,
        ),
    };

    let spinner = output.spinner(&format!("Asking the {provider} provider..."));
    let response = call(&service, file);
    spinner.finish_and_clear();
    let response = response?;

    if output.is_json() {
        return output.json(&AssistResponse {
            task,
            file,
            response,
        });
    }
    output.header(&format!("{}", file.display()))?;
    output.print(response.trim_end())?;
    Ok(())
}
