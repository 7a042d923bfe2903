//! Diagnostic logging on stderr.
//!
//! Stdout carries animation frames, so every log line goes to stderr. The
//! verbosity flags raise this crate's own level one step ahead of its
//! dependencies; `TYPEWRITER_LOG_LEVEL` replaces the computed filter
//! entirely.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, ColorChoice};

/// Environment variable holding a full `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "TYPEWRITER_LOG_LEVEL";

/// How log records are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Single-line text records.
    #[default]
    Human,
    /// One JSON object per record.
    Json,
}

/// Everything needed to install the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    pub verbosity: u8,
    pub color: ColorChoice,
}

impl LogSettings {
    /// Reads the logging flags off the parsed command line.
    #[must_use]
    pub const fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.log_format,
            verbosity: cli.verbose,
            color: cli.color,
        }
    }

    /// Filter directive used when `TYPEWRITER_LOG_LEVEL` is unset.
    ///
    /// Each `-v` lifts `typewriter` targets first and dependencies one
    /// level behind, so `-v` does not flood stderr with tokio internals.
    #[must_use]
    pub const fn default_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "warn,typewriter=info",
            2 => "info,typewriter=debug",
            _ => "debug,typewriter=trace",
        }
    }

    /// Whether human records get ANSI styling.
    #[must_use]
    pub const fn ansi(&self, stderr_is_terminal: bool, no_color: bool) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => stderr_is_terminal && !no_color,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_LEVEL_ENV)
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }

    /// Installs the global subscriber. A second call leaves the first
    /// subscriber in place.
    pub fn install(self) {
        let filter = self.filter();
        let with_targets = self.verbosity >= 2;

        let installed = match self.format {
            LogFormat::Human => {
                let ansi = self.ansi(
                    std::io::stderr().is_terminal(),
                    std::env::var_os("NO_COLOR").is_some(),
                );
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(ansi)
                    .with_target(with_targets)
                    .with_writer(std::io::stderr)
                    .try_init()
            }
            LogFormat::Json => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_target(with_targets)
                .with_writer(std::io::stderr)
                .try_init(),
        };

        if installed.is_ok() {
            tracing::debug!(format = ?self.format, verbosity = self.verbosity, "logging ready");
        }
    }
}
