//! # Timor App
//!
//! Terminal dashboard for the Timor private internet service: a simulated VPN
//! connection, ad-supported free tier, VIP upgrade, wallet and Bluetooth mesh.
//!
//! ## Modules
//! - [`app`]: Core application state and key handling.
//! - [`cli`]: Command-line argument parsing and one-shot commands.
//! - [`event`]: Event loop handling.
//! - [`connection`], [`mesh`], [`flows`]: Timer-driven state machines.
//! - [`wallet`], [`monetization`], [`telemetry`]: Ledger, ad accrual and throughput.
//! - [`ui`]: TUI rendering and widget definitions.

mod access;
mod app;
mod catalog;
mod cli;
mod connection;
mod constants;
mod error;
mod event;
mod flows;
mod mesh;
mod monetization;
mod scheduler;
mod session;
mod share;
mod store;
mod telemetry;
mod theme;
mod ui;
mod utils;
mod wallet;

use app::App;
use clap::Parser;
use cli::args::Args;
use color_eyre::Result;
use event::{Event, EventHandler};
use store::KvStore;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse arguments
    let args = Args::parse();
    let _guard = setup_tracing(&args);

    let mut store = open_store(&args);

    // Handle CLI commands (servers, logout, etc.)
    if let Some(command) = &args.command {
        if cli::commands::handle_command(command, &mut store)? {
            return Ok(());
        }
    }

    tracing::info!(tick_rate = args.tick_rate, "starting dashboard");

    // Run the TUI application
    let terminal = ratatui::init();
    let result = run_tui(terminal, store, args.tick_rate);
    ratatui::restore();

    result
}

/// Logs go to a file; the terminal belongs to the TUI.
fn setup_tracing(args: &Args) -> Option<WorkerGuard> {
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("timor={level}")));

    let dir = args
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file = args.log_file.file_name()?;

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .ok()?;

    Some(guard)
}

/// Opens the persisted store, falling back to memory so the app still starts.
fn open_store(args: &Args) -> KvStore {
    let dir = match &args.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => utils::get_app_config_dir(),
    };
    let opened = dir
        .map_err(error::TimorError::from)
        .and_then(|dir| KvStore::open(dir.join(constants::STORE_FILE_NAME)));

    match opened {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "store unavailable, session will not persist");
            KvStore::in_memory()
        }
    }
}

/// Runs the main TUI event loop.
fn run_tui(mut terminal: ratatui::DefaultTerminal, store: KvStore, tick_rate: u64) -> Result<()> {
    let mut app = App::new(store);
    let events = EventHandler::new(tick_rate);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, &app))?;

        match events.next()? {
            Event::Key(key_event) => app.handle_key(key_event),
            Event::Tick => app.on_tick(),
            Event::Resize(width, height) => app.on_resize(width, height),
        }
    }

    Ok(())
}
