use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::{fmt, EnvFilter};
use venv_cli::cli::{run, Cli};
use venv_cli::core::{report, VenvError};

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI
    let cli = Cli::parse();

    // Dropping the run on a signal rolls back any unfinished swap.
    let result = tokio::select! {
        result = run(cli) => result,
        _ = interrupted() => Err(VenvError::Interrupted),
    };

    match result {
        Ok(None) => {}
        Ok(Some(handoff)) => exit_with(handoff.exec()),
        Err(e) => exit_with(e),
    }
}

/// Resolves on the first SIGINT, SIGTERM or SIGHUP.
async fn interrupted() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::debug!("Received SIGINT"),
        _ = unix_signal(SignalKind::terminate(), "SIGTERM") => tracing::debug!("Received SIGTERM"),
        _ = unix_signal(SignalKind::hangup(), "SIGHUP") => tracing::debug!("Received SIGHUP"),
    }
}

async fn unix_signal(kind: SignalKind, name: &str) {
    match signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!("Failed to install {} handler: {}", name, e);
            std::future::pending::<()>().await;
        }
    }
}

fn exit_with(error: VenvError) -> ! {
    if error.is_unrecoverable() {
        report::fatal(&error);
    } else if matches!(error, VenvError::Interrupted) {
        report::notice(&error);
    } else {
        report::error(&error);
    }

    std::process::exit(error.exit_code());
}
