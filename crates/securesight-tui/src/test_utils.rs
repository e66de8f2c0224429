//! Test utilities for rendering the dashboard into buffers.

use crate::app::App;
use chrono::{TimeZone, Utc};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};
use securesight_engine::{sample_incidents, IncidentStore, TimelineConfig};
use tempfile::TempDir;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(TEST_WIDTH, TEST_HEIGHT);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create an app over the sample incidents, sized to the test terminal.
///
/// The store lives in the returned temp dir, which must outlive the app.
pub fn create_test_app() -> (TempDir, App) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let store = IncidentStore::create(temp.path().join("incidents.json"), sample_incidents(now))
        .expect("Failed to create store");
    let mut app = App::new(store, TimelineConfig::default());
    app.set_viewport(Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT));
    (temp, app)
}

/// Convert a buffer to a string representation.
///
/// Trailing whitespace is trimmed from each line.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render the whole dashboard at the test size and return it as a string.
pub fn render_app_to_string(app: &App) -> String {
    let mut terminal = create_test_terminal();
    terminal
        .draw(|frame| crate::ui::render(app, frame.area(), frame.buffer_mut()))
        .expect("Failed to draw");
    buffer_to_string(terminal.backend().buffer())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld\n");
    }
}
