//! Tracing setup for the binary.
//!
//! The library crates only emit events; this is the one place a subscriber
//! is installed. `-q` keeps errors only, each `-v` raises the level by one
//! step from WARN, and `RUST_LOG` wins over both. Setting `STRATA_LOG_FILE`
//! adds a second, colorless layer writing to that file.

use std::io::IsTerminal as _;
use std::path::Path;

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

pub const LOG_FILE_ENV: &str = "STRATA_LOG_FILE";

const CRATES: [&str; 4] = ["strata", "strata_cli", "strata_core", "strata_adapters"];

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<Option<WorkerGuard>> {
    let level = level_for(args.verbose, args.quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES.iter().map(|c| format!("{c}={level}")).collect();
        EnvFilter::new(directives.join(","))
    });

    let stderr_layer = fmt::layer()
        .without_time()
        .with_target(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match std::env::var_os(LOG_FILE_ENV).filter(|p| !p.is_empty()) {
        Some(path) => {
            let (writer, guard) = file_writer(Path::new(&path))?;
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a tracing subscriber is already installed")?;

    Ok(guard)
}

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn file_writer(path: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let name = path
        .file_name()
        .with_context(|| format!("{LOG_FILE_ENV} must name a file, got {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("opening log file {}", path.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}
