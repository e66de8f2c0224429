//! securesight-tui: Terminal dashboard for the SecureSight incident timeline
//!
//! This crate provides the TUI layer, including:
//! - Incident list with resolve toggling
//! - Player pane for the current incident
//! - Multi-lane timeline with a mouse-driven scrubber

mod app;
mod event;
#[cfg(test)]
pub mod test_utils;
mod ui;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use securesight_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use securesight_engine::{IncidentStore, TimelineConfig};
use std::io::{self, stdout};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the dashboard over `store`.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit.
pub async fn run_tui(
    store: IncidentStore,
    config: TimelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, config);
    let size = terminal.size()?;
    app.set_viewport(Rect::new(0, 0, size.width, size.height));

    // 4 Hz tick rate
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| ui::render(app, frame.area(), frame.buffer_mut()))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_action(event::key_to_action(key)),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    app.set_viewport(Rect::new(0, 0, width, height));
                }
                Event::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
