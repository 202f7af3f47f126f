//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use strata_core::domain::{ColumnRecord, Materialization};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Boilerplate generator for dbt, Dagster and Supabase",
    long_about = "Strata writes dbt models, Dagster assets/jobs/schedules and \
                  Supabase migrations into the right place of a data project, \
                  keeps schema.yml and __init__.py registrations up to date, \
                  and wraps the tools' own CLIs.",
    after_help = "EXAMPLES:\n\
        \x20 strata init acme\n\
        \x20 strata dbt model stg_users --column id:'primary key' --test unique\n\
        \x20 strata dagster asset raw_users --deps stg_users --group ingest\n\
        \x20 strata supabase migration add_users_table\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the project skeleton.
    #[command(
        about = "Initialise a Strata project",
        after_help = "EXAMPLES:\n\
            \x20 strata init               # name taken from the directory\n\
            \x20 strata init acme          # explicit project name\n\
            \x20 strata -C ../acme init    # somewhere else"
    )]
    Init(InitArgs),

    /// dbt models and commands.
    #[command(subcommand, about = "Generate dbt models and run dbt")]
    Dbt(DbtCommands),

    /// Dagster assets, jobs and schedules.
    #[command(subcommand, about = "Generate Dagster definitions and materialize assets")]
    Dagster(DagsterCommands),

    /// Supabase migrations.
    #[command(subcommand, about = "Generate Supabase migrations and push them")]
    Supabase(SupabaseCommands),

    /// AI assistance for existing files.
    #[command(subcommand, about = "Explain or optimize a file with the AI provider")]
    Ai(AiCommands),

    /// List generated artifacts.
    #[command(
        visible_alias = "ls",
        about = "List generated artifacts",
        after_help = "EXAMPLES:\n\
            \x20 strata list\n\
            \x20 strata list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get dbt.default_materialization\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name; defaults to the project directory's name.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Rewrite skeleton files that already exist.
    #[arg(short = 'f', long = "force", help = "Overwrite existing skeleton files")]
    pub force: bool,
}

// ── dbt ───────────────────────────────────────────────────────────────────────

/// Subcommands for `strata dbt`.
#[derive(Debug, Subcommand)]
pub enum DbtCommands {
    /// Generate a model and record it in its layer's schema.yml.
    #[command(after_help = "EXAMPLES:\n\
        \x20 strata dbt model stg_users\n\
        \x20 strata dbt model fct_orders --materialized table --tag finance\n\
        \x20 strata dbt model int_sessions --ai 'sessionize page views'")]
    Model(ModelArgs),
    /// Run `dbt run`.
    Run(SelectArgs),
    /// Run `dbt test`.
    Test(SelectArgs),
    /// Run `dbt compile`.
    Compile(SelectArgs),
}

/// Arguments for `strata dbt model`.
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Model name; the prefix (stg_, int_, fct_, dim_) picks the layer.
    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(long = "materialized", value_enum, value_name = "KIND")]
    pub materialized: Option<MaterializedArg>,

    /// Inline SQL body.
    #[arg(long = "sql", value_name = "TEXT", conflicts_with_all = ["sql_file", "ai"])]
    pub sql: Option<String>,

    /// Read the SQL body from a file.
    #[arg(long = "sql-file", value_name = "FILE", conflicts_with = "ai")]
    pub sql_file: Option<PathBuf>,

    /// Draft the SQL body with the AI provider from a description.
    #[arg(long = "ai", value_name = "PROMPT")]
    pub ai: Option<String>,

    #[arg(short = 'd', long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Column to document, as `NAME` or `NAME:DESCRIPTION`.
    #[arg(long = "column", value_name = "NAME[:DESC]", value_parser = parse_column)]
    pub columns: Vec<ColumnRecord>,

    /// Model-level dbt test (e.g. `unique`).
    #[arg(long = "test", value_name = "TEST")]
    pub tests: Vec<String>,
}

/// `--select` shared by the tool-running subcommands.
#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Selection passed through to the tool.
    #[arg(short = 's', long = "select", value_name = "SELECTOR")]
    pub select: Option<String>,
}

/// dbt materializations accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum MaterializedArg {
    View,
    Table,
    Incremental,
    Ephemeral,
}

impl From<MaterializedArg> for Materialization {
    fn from(arg: MaterializedArg) -> Self {
        match arg {
            MaterializedArg::View => Materialization::View,
            MaterializedArg::Table => Materialization::Table,
            MaterializedArg::Incremental => Materialization::Incremental,
            MaterializedArg::Ephemeral => Materialization::Ephemeral,
        }
    }
}

fn parse_column(raw: &str) -> Result<ColumnRecord, String> {
    let (name, description) = match raw.split_once(':') {
        Some((name, description)) => (name.trim(), Some(description.trim())),
        None => (raw.trim(), None),
    };
    if name.is_empty() {
        return Err("column name cannot be empty".into());
    }
    let column = ColumnRecord::new(name);
    Ok(match description {
        Some(d) if !d.is_empty() => column.with_description(d),
        _ => column,
    })
}

// ── dagster ───────────────────────────────────────────────────────────────────

/// Subcommands for `strata dagster`.
#[derive(Debug, Subcommand)]
pub enum DagsterCommands {
    /// Generate an asset and register it in assets/__init__.py.
    #[command(after_help = "EXAMPLES:\n\
        \x20 strata dagster asset raw_users\n\
        \x20 strata dagster asset user_metrics --deps raw_users,raw_events --compute-kind pandas")]
    Asset(AssetArgs),
    /// Generate a job and register it in jobs/__init__.py.
    Job(JobArgs),
    /// Generate a schedule for an existing job.
    #[command(after_help = "EXAMPLES:\n\
        \x20 strata dagster schedule nightly_refresh --job refresh_job --cron '0 3 * * *'")]
    Schedule(ScheduleArgs),
    /// Run `dagster asset materialize`.
    Materialize(SelectArgs),
}

/// Arguments for `strata dagster asset`.
#[derive(Debug, Args)]
pub struct AssetArgs {
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Upstream assets, comma separated.
    #[arg(long = "deps", value_name = "A,B", value_delimiter = ',')]
    pub deps: Vec<String>,

    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    #[arg(long = "compute-kind", value_name = "KIND")]
    pub compute_kind: Option<String>,

    #[arg(short = 'g', long = "group", value_name = "GROUP")]
    pub group: Option<String>,

    /// Python body to wrap with the generated decorator.
    #[arg(long = "code-file", value_name = "FILE")]
    pub code_file: Option<PathBuf>,

    #[arg(short = 'd', long = "description", value_name = "TEXT")]
    pub description: Option<String>,
}

/// Arguments for `strata dagster job`.
#[derive(Debug, Args)]
pub struct JobArgs {
    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    #[arg(short = 'd', long = "description", value_name = "TEXT")]
    pub description: Option<String>,
}

/// Arguments for `strata dagster schedule`.
#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Job the schedule triggers.
    #[arg(short = 'j', long = "job", value_name = "JOB")]
    pub job: String,

    /// Cron expression (default: daily at midnight).
    #[arg(long = "cron", value_name = "EXPR")]
    pub cron: Option<String>,
}

// ── supabase ──────────────────────────────────────────────────────────────────

/// Subcommands for `strata supabase`.
#[derive(Debug, Subcommand)]
pub enum SupabaseCommands {
    /// Write a timestamped migration file.
    Migration(MigrationArgs),
    /// Run `supabase db push`.
    Push,
}

/// Arguments for `strata supabase migration`.
#[derive(Debug, Args)]
pub struct MigrationArgs {
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Read the migration SQL from a file.
    #[arg(long = "sql-file", value_name = "FILE")]
    pub sql_file: Option<PathBuf>,
}

// ── ai ────────────────────────────────────────────────────────────────────────

/// Subcommands for `strata ai`.
#[derive(Debug, Subcommand)]
pub enum AiCommands {
    /// Explain what a file does.
    Explain {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Suggest optimizations for a file.
    Optimize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `strata list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One path per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `strata completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `strata config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `dbt.project_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path of the configuration file in use.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
