//! Ayni - command-line front-end for the Ayni Abogados portal.
//!
//! Signs lawyers and clients into the demo portal, keeps their session for
//! 24 hours, validates RUTs and turns contact requests into e-mail and
//! WhatsApp links.

mod app;
mod cli;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::{Cli, Command};

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes buffered log lines when dropped.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Usage errors and --help exit here, before anything is loaded
    let cli = Cli::parse();

    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    info!(command = ?cli.command, "Ayni starting");
    let mut app = App::new();

    let ok = match cli.command {
        Command::Login { role, email } => app.login(role, email).await?,
        Command::Logout => {
            app.logout();
            true
        }
        Command::WhoAmI => {
            app.whoami();
            true
        }
        Command::Register { email, name } => app.register(email, name.join(" ")).await?,
        Command::Rut { inputs } => app.check_ruts(&inputs),
        Command::Contact(args) => app.contact(args.into()).await,
        Command::Users => {
            app.list_users();
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
