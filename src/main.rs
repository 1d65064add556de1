// ABOUTME: Main entry point for gigboard with TUI and CLI support
//
// Binary: gigboard
// Usage: gigboard [--format text|json] [COMMAND]
// - No command: launches TUI
// - login / register / logout: manage the session
// - profile: show your profile or a public one
// - tasks: list or post tasks
// - skills: list the skill catalogue
// - config: show or write the configuration

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gigboard::{
    api::ApiClient,
    app::{App, EventHandler},
    cli::{self, Commands, TaskCommands},
    components::LayoutComponent,
    config::{gigboard_home, AppConfig},
    session::SessionStore,
};
use ratatui::{backend::Backend, prelude::*, Terminal};
use std::{
    io::{self, IsTerminal},
    sync::Arc,
    time::{Duration, Instant},
};

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Unified terminal cleanup that works with a terminal instance
fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();
    let format = args.format;

    let result = match args.command {
        Some(Commands::Tui) | None => run_tui().await,
        Some(Commands::Config(config_args)) => cli::config::execute(config_args, format),
        Some(Commands::Login(login_args)) => {
            cli::account::login(&cli::connect()?, login_args, format).await
        }
        Some(Commands::Register(register_args)) => {
            cli::account::register(&cli::connect()?, register_args, format).await
        }
        Some(Commands::Logout) => cli::account::logout(&cli::connect()?, format).await,
        Some(Commands::Profile(profile_args)) => {
            cli::profile::execute(&cli::connect()?, profile_args, format).await
        }
        Some(Commands::Tasks(TaskCommands::List)) => cli::tasks::list(&cli::connect()?, format).await,
        Some(Commands::Tasks(TaskCommands::Create(task_args))) => {
            cli::tasks::create(&cli::connect()?, task_args, format).await
        }
        Some(Commands::Skills) => cli::skills::execute(&cli::connect()?, format).await,
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }
    result
}

async fn run_tui() -> Result<()> {
    // Check if we have a proper TTY
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Use the CLI commands (see `gigboard --help`) when redirecting output."
        ));
    }

    let config = AppConfig::load()?;
    let home = gigboard_home()?;
    let session = Arc::new(SessionStore::from_config(&config, &home));
    let api = ApiClient::new(&config.api, session).context("Failed to create API client")?;
    let mut app = App::new(api, &config.ui_preferences);
    let mut layout = LayoutComponent::new();
    let tick_rate = Duration::from_millis(config.ui_preferences.tick_rate_ms.max(16));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Ensure terminal cleanup happens even if there's an error
    let result = run_tui_loop(&mut app, &mut layout, &mut terminal, tick_rate).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    layout: &mut LayoutComponent,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let mut redraw = true;
    app.tick();

    loop {
        if redraw {
            terminal.draw(|frame| layout.render(frame, &app.state))?;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        // Poll on a blocking thread so spawned requests keep running
        let ready = tokio::task::spawn_blocking(move || event::poll(timeout)).await??;
        if ready {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
            }
        }

        // Apply finished requests and start queued ones
        app.tick();

        if app.state.should_quit {
            tracing::info!("Quitting");
            break;
        }

        let tick_elapsed = last_tick.elapsed() >= tick_rate;
        if tick_elapsed {
            last_tick = Instant::now();
        }
        redraw = app.needs_ui_refresh() || tick_elapsed;
    }

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = gigboard_home()
        .map(|home| home.join("logs"))
        .unwrap_or_else(|_| std::path::PathBuf::from(".gigboard/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    // Create JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "gigboard-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // Logging is optional; the TUI owns stdout so there is no fallback sink
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gigboard=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
