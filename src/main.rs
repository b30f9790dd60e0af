mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;
use clap::Parser;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::{AppConfig, Args};
use controller::AppController;
use model::{AppState, HttpLibraryApi};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Music Export Client Starting ===");

    let config = AppConfig::resolve(args)?;
    tracing::info!(
        server = %config.server,
        download_dir = %config.download_dir.display(),
        "Configuration resolved"
    );

    let api = HttpLibraryApi::new(&config.server, config.timeout)?;
    tracing::debug!(base_url = api.base_url(), "Backend client ready");
    let state = AppState::new(config.filters, config.export_options, config.theme);
    let state = Arc::new(Mutex::new(state));
    let controller = AppController::new(state.clone(), Arc::new(api), config.download_dir);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, state, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Music Export Client shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: Arc<Mutex<AppState>>,
    controller: AppController<HttpLibraryApi>,
) -> io::Result<()> {
    loop {
        let should_quit = {
            let mut state = state.lock().await;
            state.alerts.expire(Instant::now());

            let mut hits = state.hit_map;
            terminal.draw(|f| {
                hits = AppView::render(f, &state);
            })?;
            state.hit_map = hits;

            state.should_quit
        };

        if should_quit {
            break;
        }

        // Short poll so alert timers and finished requests show up promptly
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Err(e) = controller.handle_key_event(key).await {
                        tracing::warn!(error = %e, "Key handling failed");
                    }
                }
                Event::Mouse(mouse) => {
                    if let Err(e) = controller.handle_mouse_event(mouse).await {
                        tracing::warn!(error = %e, "Mouse handling failed");
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}
