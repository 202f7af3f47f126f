//! `strata config`: inspect the effective configuration.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&value)?;
            } else {
                output.print(&render_scalar(&value))?;
            }
        }

        ConfigCommands::List => output.json(&config)?,

        ConfigCommands::Path => {
            let path = config.config_path(&global.project_dir);
            output.print(&path.display().to_string())?;
            if config.source.is_none() {
                output.info("(not present, defaults and environment in effect)")?;
            }
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<serde_json::Value> {
    config.get(key).ok_or_else(|| CliError::Config {
        message: format!("Unknown config key: '{key}'"),
    })
}

/// Strings print bare, everything else as JSON.
fn render_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
