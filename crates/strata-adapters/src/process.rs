//! External tool execution.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use tracing::{debug, instrument, warn};

use strata_core::{
    application::{
        ApplicationError,
        ports::{ToolInvocation, ToolOutput, ToolRunner},
    },
    error::StrataResult,
};

/// Runs tools as blocking child processes.
///
/// Stdout goes straight to the terminal. Stderr is captured for the error
/// report and replayed to the terminal once the tool exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }
}

fn launch_failure(invocation: &ToolInvocation, reason: String) -> ApplicationError {
    ApplicationError::ExternalProcessFailure {
        command: invocation.to_string(),
        code: None,
        stderr: reason,
    }
}

impl ToolRunner for CommandRunner {
    #[instrument(skip_all, fields(command = %invocation))]
    fn run(&self, invocation: &ToolInvocation) -> StrataResult<ToolOutput> {
        if !invocation.working_dir.is_dir() {
            return Err(ApplicationError::NotFound {
                path: invocation.working_dir.clone(),
            }
            .into());
        }

        let program = which::which(&invocation.program).map_err(|e| {
            launch_failure(
                invocation,
                format!("{} not found on PATH: {e}", invocation.program),
            )
        })?;
        debug!(program = %program.display(), "Resolved executable");

        let child = Command::new(&program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| launch_failure(invocation, format!("failed to start: {e}")))?;

        let output = child
            .wait_with_output()
            .map_err(|e| launch_failure(invocation, format!("failed to wait: {e}")))?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.is_empty() {
            if let Err(e) = io::stderr().write_all(stderr.as_bytes()) {
                warn!(error = %e, "Could not replay tool stderr");
            }
        }

        debug!(status = ?output.status.code(), "Tool exited");
        Ok(ToolOutput {
            status_code: output.status.code(),
            stderr,
        })
    }
}
