//! Flags accepted before or after any subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain output without ANSI colors
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from FILE instead of <project-dir>/strata.json
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the data project; generated paths are relative to it
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        default_value = "."
    )]
    pub project_dir: PathBuf,

    /// Skip schema.yml lines outside the supported subset instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Overwrite existing files without asking
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colors when stdout is a terminal
    #[default]
    Auto,
    Human,
    Plain,
    /// Every command prints JSON on stdout
    Json,
}

#[cfg(test)]
impl GlobalArgs {
    pub(crate) fn for_tests() -> Self {
        Self {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            project_dir: PathBuf::from("."),
            lenient: false,
            yes: true,
            output_format: OutputFormat::Plain,
        }
    }
}
