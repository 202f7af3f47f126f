//! Helpers shared by the generator services.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ToolInvocation, ToolRunner},
    },
    domain::{ArtifactDescriptor, ArtifactKind, DomainError},
    error::StrataResult,
};

/// Write `content` to `path`, creating missing parent directories first.
pub(crate) fn write_with_parents(
    filesystem: &dyn Filesystem,
    path: &Path,
    content: &str,
) -> StrataResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !filesystem.exists(parent) {
            debug!(dir = %parent.display(), "Creating directory");
            filesystem.create_dir_all(parent)?;
        }
    }
    filesystem.write_file(path, content)
}

/// Reject descriptors handed to the wrong generator, then validate them.
pub(crate) fn expect_kind(
    descriptor: &ArtifactDescriptor,
    expected: ArtifactKind,
) -> StrataResult<()> {
    if descriptor.kind() != expected {
        return Err(DomainError::InvalidArgument {
            field: "kind",
            reason: format!(
                "expected a {} descriptor, got {}",
                expected,
                descriptor.kind()
            ),
        }
        .into());
    }
    descriptor.validate()?;
    Ok(())
}

/// Run an external tool; any non-zero exit becomes `ExternalProcessFailure`.
pub(crate) fn run_checked(runner: &dyn ToolRunner, invocation: ToolInvocation) -> StrataResult<()> {
    info!(
        command = %invocation,
        dir = %invocation.working_dir.display(),
        "Running external tool"
    );
    let output = runner.run(&invocation)?;
    if output.success() {
        return Ok(());
    }
    Err(ApplicationError::ExternalProcessFailure {
        command: invocation.to_string(),
        code: output.status_code,
        stderr: output.stderr,
    }
    .into())
}
