//! Event handling for the dashboard.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// A tick event for UI updates.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Event handler that runs in a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // crossterm polling is blocking I/O
        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) => Some(Event::Key(key)),
                            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                } else if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, blocking until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Up,
    Down,
    /// Open the highlighted incident in the player.
    Select,
    /// Flip the resolved flag of the highlighted incident.
    ToggleResolved,
    /// Show or hide resolved incidents in the list.
    ToggleShowResolved,
    /// Jump the scrubber to the previous incident on the timeline.
    PrevIncident,
    /// Jump the scrubber to the next incident on the timeline.
    NextIncident,
    None,
}

/// Convert a key event to an action.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Enter => Action::Select,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::PrevIncident,
        KeyCode::Right | KeyCode::Char('l') => Action::NextIncident,
        KeyCode::Char('r') => Action::ToggleResolved,
        KeyCode::Char('a') => Action::ToggleShowResolved,
        _ => Action::None,
    }
}
