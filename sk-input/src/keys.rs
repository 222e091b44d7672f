//! Terminal key codes to physical key identifiers

use crossterm::event::{KeyCode, KeyEvent};

/// Physical key identifier for `key`, in the names a keyboard event reports
///
/// Returns `None` for keys that have no identifier (modifier-only, media).
pub fn physical_key(key: &KeyEvent) -> Option<String> {
    let id = match key.code {
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Escape".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Up => "ArrowUp".into(),
        KeyCode::Down => "ArrowDown".into(),
        KeyCode::Left => "ArrowLeft".into(),
        KeyCode::Right => "ArrowRight".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::Delete => "Delete".into(),
        _ => return None,
    };
    Some(id)
}
