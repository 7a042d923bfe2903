//! `typewriter run`
//!
//! Builds an engine from the config file and command-line overrides, renders
//! frames on stdout, and tears the engine down on the first of: a signal,
//! the `--for` deadline, or (for finite runs) the engine reaching `Done`.

use std::io::Write;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::ConfigLoader;
use crate::engine::{EngineHandle, PhraseList, TypewriterConfig, TypewriterEngine};
use crate::error::TypewriterError;
use crate::observability::EventEmitter;
use crate::render::{JsonLinesSink, TerminalSink};

/// Phrases animated when neither `--phrase` nor a config file supplies any.
pub const DEFAULT_PHRASES: [&str; 4] = [
    "build things for the web.",
    "design beautiful interfaces.",
    "solve complex problems.",
    "create digital experiences.",
];

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Signal,
    Deadline,
    Done,
}

/// Animate phrases until interrupted, timed out, or done.
///
/// # Errors
///
/// Returns an error if the config file is missing or invalid, if no phrases
/// remain after applying overrides, or if the events file cannot be opened.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), TypewriterError> {
    let (phrases, config) = resolve(args)?;
    let finite = !config.infinite;

    let mut engine = TypewriterEngine::from_phrase_list(phrases, config);
    if let Some(path) = &args.events {
        engine = engine.with_events(Arc::new(EventEmitter::open(path)?));
    }

    let mut handle = match args.format {
        OutputFormat::Human => engine.start(TerminalSink::new(std::io::stdout())),
        OutputFormat::Json => engine.start(JsonLinesSink::new(std::io::stdout())),
    };

    let reason = wait_for_stop(&handle, &cancel, args, finite).await;
    tracing::info!(engine_id = handle.id(), ?reason, "stopping");

    handle.stop();
    handle.finished().await;

    if args.format == OutputFormat::Human {
        let mut out = std::io::stdout();
        writeln!(out)?;
        out.flush()?;
    }

    Ok(())
}

async fn wait_for_stop(
    handle: &EngineHandle,
    cancel: &CancellationToken,
    args: &RunArgs,
    finite: bool,
) -> StopReason {
    let done = async {
        if finite {
            handle.wait_until_done().await;
        } else {
            std::future::pending::<()>().await;
        }
    };
    let deadline = async {
        match args.run_for {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        () = cancel.cancelled() => StopReason::Signal,
        () = deadline => StopReason::Deadline,
        () = done => StopReason::Done,
    }
}

/// Merges the config file (if any) with command-line overrides.
///
/// Precedence, lowest first: built-in defaults, config file, flags.
fn resolve(args: &RunArgs) -> Result<(PhraseList, TypewriterConfig), TypewriterError> {
    let (mut phrases, mut config) = if let Some(path) = &args.config {
        if !path.exists() {
            return Err(TypewriterError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )));
        }
        tracing::info!(config = %path.display(), "loading configuration");
        let loaded = ConfigLoader::with_defaults().load(path)?;
        for warning in &loaded.warnings {
            tracing::warn!(
                location = warning.location.as_deref().unwrap_or("<unknown>"),
                "{}",
                warning.message
            );
        }
        (loaded.phrases, loaded.config)
    } else {
        (PhraseList::new(DEFAULT_PHRASES)?, TypewriterConfig::default())
    };

    if !args.phrases.is_empty() {
        phrases = PhraseList::new(args.phrases.iter().cloned())?;
    }
    if let Some(delay) = args.type_delay {
        config = config.with_type_delay(delay);
    }
    if let Some(delay) = args.delete_delay {
        config = config.with_delete_delay(delay);
    }
    if let Some(pause) = args.pause {
        config = config.with_pause_duration(pause);
    }
    if let Some(interval) = args.blink_interval {
        config = config.with_blink_interval(interval);
    }
    if args.once {
        config = config.with_infinite(false);
    }

    Ok((phrases, config))
}
