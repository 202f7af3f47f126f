//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core only ever sees the [`GeneratorSettings`]
//! built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--lenient`, `--no-color`; applied at the call-site)
//! 2. Environment variables (`STRATA_` prefix, `__` between sections,
//!    e.g. `STRATA_DBT__DEFAULT_MATERIALIZATION=table`)
//! 3. Config file (`--config FILE`, else `<project-dir>/strata.json`)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use strata_core::{
    application::{GeneratorSettings, ports::AiParams},
    domain::{AiProviderKind, Materialization, ParseMode, ProjectLayout},
};

/// File name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "strata.json";

const ENV_PREFIX: &str = "STRATA";

/// Application configuration, mirroring the sections of `strata.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub project: ProjectConfig,
    pub dbt: DbtConfig,
    pub dagster: DagsterConfig,
    pub supabase: SupabaseConfig,
    pub ai: AiConfig,
    pub parsing: ParsingConfig,
    pub output: OutputConfig,

    /// File the values were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: Option<String>,
    /// `version:` written into new schema.yml documents.
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DbtConfig {
    pub project_dir: PathBuf,
    pub default_materialization: Materialization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DagsterConfig {
    /// Directory the dagster CLI runs in.
    pub project_dir: PathBuf,
    /// Python package holding assets/, jobs/ and schedules/.
    pub package: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Parent of the `supabase/` directory; empty means the project root.
    pub project_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProviderKind,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub lenient: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            schema_version: 2,
        }
    }
}

impl Default for DbtConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("dbt"),
            default_materialization: Materialization::View,
        }
    }
}

impl Default for DagsterConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("dagster"),
            package: "orchestration".into(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        let params = AiParams::default();
        Self {
            provider: params.provider,
            model: params.model,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

impl AppConfig {
    /// Load configuration for the project rooted at `project_dir`.
    ///
    /// An explicit `config_file` must exist; the implicit
    /// `<project_dir>/strata.json` is optional.
    pub fn load(config_file: Option<&PathBuf>, project_dir: &Path) -> anyhow::Result<Self> {
        let defaults = serde_json::to_string(&Self::default())
            .context("Failed to serialise default configuration")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults,
            config::FileFormat::Json,
        ));

        let source = match config_file {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("config file {} does not exist", path.display());
                }
                Some(path.clone())
            }
            None => {
                let implicit = project_dir.join(CONFIG_FILE_NAME);
                implicit.is_file().then_some(implicit)
            }
        };

        if let Some(path) = &source {
            info!(path = %path.display(), "Loading config file");
            builder = builder.add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Json)
                    .required(true),
            );
        } else {
            debug!(dir = %project_dir.display(), "No strata.json found, using defaults");
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.source = source;
        Ok(config)
    }

    /// Settings for the core services, rooted at `project_root`.
    pub fn to_settings(&self, project_root: &Path, lenient: bool) -> GeneratorSettings {
        let layout = ProjectLayout {
            dbt_project: self.dbt.project_dir.clone(),
            dagster_package: self.dagster.project_dir.join(&self.dagster.package),
            supabase_project: self.supabase.project_dir.join("supabase"),
        };
        let parse_mode = if lenient || self.parsing.lenient {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        };

        GeneratorSettings {
            project_root: project_root.to_path_buf(),
            layout,
            schema_version: self.project.schema_version,
            default_materialization: self.dbt.default_materialization,
            parse_mode,
            dagster_module: self.dagster.package.clone(),
            ai: AiParams {
                provider: self.ai.provider,
                model: self.ai.model.clone(),
                temperature: self.ai.temperature,
                max_tokens: self.ai.max_tokens,
            },
        }
    }

    /// Look up a dotted key such as `dbt.project_dir`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let tree = serde_json::to_value(self).ok()?;
        let pointer = format!("/{}", key.replace('.', "/"));
        tree.pointer(&pointer).cloned()
    }

    /// Where `config path` points: the file in use, or the implicit location.
    pub fn config_path(&self, project_dir: &Path) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| project_dir.join(CONFIG_FILE_NAME))
    }
}
