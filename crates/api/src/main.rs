//! Timebook server entry point
//!
//! Usage: `timebook [--config <path>]`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use timebook_server::utils::logging::init_tracing;
use timebook_server::{build_router, AppContext};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    let config = match parse_config_arg().and_then(timebook_infra::config::load) {
        Ok(config) => config,
        Err(err) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("timebook: {err}");
            }
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);
    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => error!(error = %err, "Could not read .env"),
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: timebook_domain::Config) -> Result<(), Box<dyn std::error::Error>> {
    let bind_address: SocketAddr = config.server.bind_address.parse()?;

    info!("Initializing application context...");
    let ctx = Arc::new(AppContext::new(config)?);
    ctx.ensure_bootstrap_admin().await?;

    let app = build_router(Arc::clone(&ctx));

    let listener = TcpListener::bind(bind_address).await?;
    info!(address = %bind_address, "Timebook listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server shut down");
    Ok(())
}

/// `--config <path>` or `--config=<path>`; anything else is rejected.
fn parse_config_arg() -> timebook_domain::Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut path = None;

    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--config=") {
            path = Some(PathBuf::from(value));
        } else if arg == "--config" {
            let value = args.next().ok_or_else(|| {
                timebook_domain::TimebookError::Config("--config needs a path".to_string())
            })?;
            path = Some(PathBuf::from(value));
        } else {
            return Err(timebook_domain::TimebookError::Config(format!(
                "unknown argument '{arg}' (usage: timebook [--config <path>])"
            )));
        }
    }

    Ok(path)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
