// src/app/mod.rs
//! Application module - state, input handling, and the terminal loop.

pub mod state;

// Re-export the App struct
pub use state::App;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// Target frame interval for the visualizer, roughly 30 fps.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Run the application until the user quits.
pub fn run() -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new()?;
    let mut last_second = Instant::now();

    loop {
        app.update();
        terminal.draw(|f| app.draw(f))?;

        if event::poll(FRAME_INTERVAL)? {
            if let CEvent::Key(key) = event::read()? {
                if app.on_key(key) {
                    break;
                }
            }
        }

        if last_second.elapsed() >= Duration::from_secs(1) {
            last_second = Instant::now();
            app.tick_elapsed();
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
