//! `strata`: boilerplate generator for dbt, Dagster and Supabase projects.
//!
//! Exit codes: 0 success, 1 internal or external tool failure, 2 usage error
//! (bad argument, unreadable schema.yml, refused overwrite), 3 missing file,
//! 4 configuration error.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Also reached for --help and --version, which go to stdout.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let _log_guard = match init_logging(&cli.global) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    debug!(
        project_dir = %cli.global.project_dir.display(),
        lenient = cli.global.lenient,
        format = ?cli.global.output_format,
        "Starting"
    );

    let verbose = cli.global.verbose > 0;
    let color = !cli.global.no_color;

    let config = match AppConfig::load(cli.global.config.as_ref(), &cli.global.project_dir) {
        Ok(config) => config,
        Err(e) => {
            let err = CliError::Config {
                message: format!("{e:#}"),
            };
            return fail(&err, verbose, color);
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let color = output.supports_color();

    match run(cli, config, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err, verbose, color),
    }
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let global = cli.global;
    match cli.command {
        Commands::Init(cmd) => commands::init::execute(cmd, global, config, output),
        Commands::Dbt(cmd) => commands::dbt::execute(cmd, global, config, output),
        Commands::Dagster(cmd) => commands::dagster::execute(cmd, global, config, output),
        Commands::Supabase(cmd) => commands::supabase::execute(cmd, global, config, output),
        Commands::Ai(cmd) => commands::ai::execute(cmd, global, config, output),
        Commands::List(cmd) => commands::list::execute(cmd, global, config, output),
        Commands::Config(cmd) => commands::config::execute(cmd, global, config, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
    }
}

fn fail(err: &CliError, verbose: bool, color: bool) -> ExitCode {
    err.trace();
    let color = color && std::io::stderr().is_terminal();
    eprint!("{}", err.render(verbose, color));
    ExitCode::from(err.exit_code())
}
