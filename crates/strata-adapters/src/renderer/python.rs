//! Dagster asset, job and schedule content.

use strata_core::domain::{ArtifactDescriptor, ArtifactKind};

use super::header::{self, py_str};

/// Cron expression used when a schedule names none.
pub const DEFAULT_CRON: &str = "0 0 * * *";

/// Decorator name for an indexed Dagster kind.
pub fn decorator_name(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Job => "job",
        ArtifactKind::ScheduledTrigger => "schedule",
        _ => "asset",
    }
}

/// Single-line decorator carrying the descriptor's annotations.
pub fn decorator(descriptor: &ArtifactDescriptor) -> String {
    let params = descriptor.params();
    let mut args: Vec<String> = Vec::new();

    match descriptor.kind() {
        ArtifactKind::ScheduledTrigger => {
            args.push(format!(
                "cron_schedule={}",
                py_str(params.cron.as_deref().unwrap_or(DEFAULT_CRON))
            ));
            if let Some(job) = &params.target_job {
                args.push(format!("job={job}"));
            }
        }
        kind => {
            if kind == ArtifactKind::Asset {
                if !params.deps.is_empty() {
                    let deps: Vec<String> = params.deps.iter().map(|d| py_str(d)).collect();
                    args.push(format!("deps=[{}]", deps.join(", ")));
                }
                if let Some(group) = &params.group {
                    args.push(format!("group_name={}", py_str(group)));
                }
                if let Some(compute_kind) = &params.compute_kind {
                    args.push(format!("compute_kind={}", py_str(compute_kind)));
                }
            }
            if !params.tags.is_empty() {
                let tags: Vec<String> = params
                    .tags
                    .iter()
                    .map(|t| format!("{}: \"\"", py_str(t)))
                    .collect();
                args.push(format!("tags={{{}}}", tags.join(", ")));
            }
            if let Some(description) = &params.description {
                args.push(format!("description={}", py_str(description)));
            }
        }
    }

    let name = decorator_name(descriptor.kind());
    if args.is_empty() {
        format!("@{name}")
    } else {
        format!("@{name}({})", args.join(", "))
    }
}

pub fn definition(descriptor: &ArtifactDescriptor) -> String {
    let body = match &descriptor.params().body {
        Some(body) => body.clone(),
        None => default_body(descriptor),
    };
    header::apply_python(
        &body,
        &decorator(descriptor),
        decorator_name(descriptor.kind()),
    )
}

fn default_body(descriptor: &ArtifactDescriptor) -> String {
    let name = descriptor.name();
    let params = descriptor.params();
    let summary = params
        .description
        .clone()
        .unwrap_or_else(|| format!("Placeholder {} `{name}`.", descriptor.kind()));

    match descriptor.kind() {
        ArtifactKind::Job => format!(
            "def {name}():\n    \"\"\"{summary}\"\"\"\n    # TODO: invoke the ops this job runs.\n"
        ),
        ArtifactKind::ScheduledTrigger => {
            let job = params.target_job.as_deref().unwrap_or(name);
            let cron = params.cron.as_deref().unwrap_or(DEFAULT_CRON);
            format!(
                "from dagster import schedule\n\nfrom ..jobs import {job}\n\n\n\
                 def {name}(context):\n    \"\"\"Run `{job}` on `{cron}`.\"\"\"\n    \
                 # TODO: return run config for the scheduled run.\n    return {{}}\n"
            )
        }
        _ => {
            let upstream: Vec<String> = params.deps.iter().map(|d| py_str(d)).collect();
            let doc = if params.deps.is_empty() {
                format!("    \"\"\"{summary}\"\"\"\n")
            } else {
                format!(
                    "    \"\"\"{summary}\n\n    Upstream: {}\n    \"\"\"\n",
                    params.deps.join(", ")
                )
            };
            format!(
                "def {name}(context) -> dict:\n{doc}    # TODO: replace the placeholder with the real computation.\n    \
                 context.log.info(\"Materializing {name}\")\n    return {{\"upstream\": [{}]}}\n",
                upstream.join(", ")
            )
        }
    }
}
