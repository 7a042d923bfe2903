//! `typewriter` - typewriter text animation for the terminal

use clap::Parser;
use tokio_util::sync::CancellationToken;

use typewriter::cli::args::Cli;
use typewriter::cli::commands;
use typewriter::error::ExitCode;
use typewriter::observability::{LogSettings, describe_metrics};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        LogSettings::from_cli(&cli).install();
    }
    describe_metrics();

    let cancel = CancellationToken::new();

    // First signal stops the engine cleanly, a second one exits at once.
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to register SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    shutdown.cancel();
                    let _ = tokio::signal::ctrl_c().await;
                    std::process::exit(ExitCode::INTERRUPTED);
                }
            };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }

        shutdown.cancel();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }
    });

    let result = commands::dispatch(cli, cancel).await;

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
