//! Everything the commands print to stdout.
//!
//! Human output goes through [`OutputManager`] so that `--quiet`,
//! `--no-color` and `--output-format` are honoured in one place.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    assume_yes: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let resolved_format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            explicit => explicit,
        };
        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format == OutputFormat::Plain,
            assume_yes: args.yes,
            term: Term::stdout(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked('\u{2713}', msg, Style::new().green())
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked('!', msg, Style::new().yellow())
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked('-', msg, Style::new().blue())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.no_color {
            self.print(text)
        } else {
            self.print(&text.style(Style::new().cyan().bold()).to_string())
        }
    }

    /// `<mark> <msg>`, with both parts colored when colors are on.
    fn marked(&self, mark: char, msg: &str, style: Style) -> io::Result<()> {
        if self.no_color {
            self.print(&format!("{mark} {msg}"))
        } else {
            self.print(&format!(
                "{} {}",
                mark.style(style.bold()),
                msg.style(style)
            ))
        }
    }

    /// Pretty JSON to stdout. Written even in quiet mode so pipes keep working.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> CliResult<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(|e| CliError::io("cannot render output as JSON", e.into()))?;
        self.term.write_line(&rendered)?;
        Ok(())
    }

    /// Spinner on stderr for calls of unknown duration.
    ///
    /// Hidden in quiet/JSON mode and when stderr is not a terminal.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || self.is_json() || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    /// Make sure replacing `path` is fine with the user.
    ///
    /// Passes when the file does not exist or `--yes` was given. Otherwise
    /// asks on an interactive terminal and refuses everywhere else.
    pub fn confirm_overwrite(&self, path: &Path) -> CliResult<()> {
        if self.assume_yes || !path.exists() {
            return Ok(());
        }
        if self.ask(&format!("{} already exists. Overwrite?", path.display()))? {
            Ok(())
        } else {
            Err(CliError::OverwriteRefused {
                path: path.to_path_buf(),
            })
        }
    }

    #[cfg(feature = "interactive")]
    fn ask(&self, prompt: &str) -> CliResult<bool> {
        if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
            return Ok(false);
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| CliError::io("failed to read confirmation", io::Error::other(e)))
    }

    #[cfg(not(feature = "interactive"))]
    fn ask(&self, _prompt: &str) -> CliResult<bool> {
        Ok(false)
    }

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}
