//! CLI argument definitions
//!
//! All Clap derive structs for `typewriter` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::schema::parse_delay;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Typewriter text animation for the terminal.
#[derive(Parser, Debug)]
#[command(name = "typewriter", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TYPEWRITER_COLOR")]
    pub color: ColorChoice,

    /// Log record format on stderr.
    #[arg(
        long,
        default_value = "human",
        global = true,
        env = "TYPEWRITER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Animate phrases in the terminal.
    Run(RunArgs),

    /// Validate configuration files without animating.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a YAML or JSON configuration file.
    #[arg(short, long, env = "TYPEWRITER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Phrase to animate (repeatable). Replaces phrases from the config file.
    #[arg(short, long = "phrase", value_name = "TEXT")]
    pub phrases: Vec<String>,

    /// Delay between typed characters (e.g. `100ms`, `80`).
    #[arg(long, value_parser = parse_delay, value_name = "DURATION")]
    pub type_delay: Option<Duration>,

    /// Delay between deleted characters. Defaults to half the type delay.
    #[arg(long, value_parser = parse_delay, value_name = "DURATION")]
    pub delete_delay: Option<Duration>,

    /// Dwell time with the full phrase visible.
    #[arg(long, value_parser = parse_delay, value_name = "DURATION")]
    pub pause: Option<Duration>,

    /// Full caret blink period.
    #[arg(long = "blink", value_parser = parse_delay, value_name = "DURATION")]
    pub blink_interval: Option<Duration>,

    /// Run through the phrases once, then exit when done.
    #[arg(long)]
    pub once: bool,

    /// Stop after this long.
    #[arg(long = "for", value_parser = parse_delay, value_name = "DURATION")]
    pub run_for: Option<Duration>,

    /// Frame output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Write lifecycle events as JSON lines to this file (`-` for stderr).
    #[arg(long, value_name = "FILE")]
    pub events: Option<PathBuf>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["typewriter", "run"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn run_defaults() {
        let args = run_args(&[]);
        assert!(args.phrases.is_empty());
        assert!(!args.once);
        assert_eq!(args.format, OutputFormat::Human);
        assert_eq!(args.type_delay, None);
    }

    #[test]
    fn repeated_phrases_and_delays() {
        let args = run_args(&[
            "-p",
            "Hi",
            "--phrase",
            "Bye",
            "--type-delay",
            "40ms",
            "--pause",
            "2s",
            "--blink",
            "600",
            "--for",
            "5s",
        ]);
        assert_eq!(args.phrases, vec!["Hi", "Bye"]);
        assert_eq!(args.type_delay, Some(Duration::from_millis(40)));
        assert_eq!(args.pause, Some(Duration::from_secs(2)));
        assert_eq!(args.blink_interval, Some(Duration::from_millis(600)));
        assert_eq!(args.run_for, Some(Duration::from_secs(5)));
    }

    #[test]
    fn bad_delay_rejected() {
        let cli = Cli::try_parse_from(["typewriter", "run", "--type-delay", "quick"]);
        assert!(cli.is_err());
    }

    #[test]
    fn delay_longer_than_a_day_rejected() {
        let cli = Cli::try_parse_from(["typewriter", "run", "--pause", "500000000000y"]);
        assert!(cli.is_err());
    }

    #[test]
    fn validate_requires_files() {
        let cli = Cli::try_parse_from(["typewriter", "validate"]);
        assert!(cli.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["typewriter", "version", "-vv", "--color", "never"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["typewriter", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["typewriter", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
