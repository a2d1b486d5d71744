//! Mindgarden - Entry Point
//!
//! Initializes logging and the terminal, builds the game from config and
//! save data, and runs the main loop.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use mindgarden::data::{export_default_data, DataManager};
use mindgarden::game::{Game, GameMode};
use mindgarden::save::FileStore;
use mindgarden::ui::App;
use mindgarden::GameConfig;

fn main() -> Result<()> {
    // Log to a file so output doesn't interfere with the TUI
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("mindgarden.log")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    log::info!("Starting Mindgarden v{}", env!("CARGO_PKG_VERSION"));

    let config = GameConfig::load();

    // `mindgarden --export-data` writes the built-in content for editing
    if std::env::args().any(|arg| arg == "--export-data") {
        export_default_data(&config.data_dir)?;
        println!("Wrote default data to {}", config.data_dir.display());
        return Ok(());
    }

    let data = DataManager::load(&config.data_dir);
    let save_dir = config.save_dir();
    log::info!("Saving to {}", save_dir.display());
    let storage = Arc::new(FileStore::new(save_dir));
    let mut game = Game::new(config, storage, data);
    let mut app = App::new();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the game loop
    let result = run_game_loop(&mut terminal, &mut app, &mut game);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = game.save_all() {
        log::error!("Failed to save on exit: {}", e);
    }

    // Report any errors
    if let Err(ref e) = result {
        log::error!("Game exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Mindgarden shut down cleanly");
    result
}

/// Main game loop
fn run_game_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    game: &mut Game,
) -> Result<()> {
    let frame_time = game.config().frame_time();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        // Handle input
        if event::poll(std::time::Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key, game) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }

        // Advance timers and growth
        game.update(delta);

        // Render
        terminal.draw(|frame| {
            app.render(frame, game);
        })?;

        if game.mode() == GameMode::Quit {
            break;
        }

        // Frame rate limiting
        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}
