//! Modal state machine for vim-style input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commands::Command;
use crate::keys::physical_key;

/// Input modes (vim-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
    Help,
}

impl Mode {
    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
            Mode::Help => "HELP",
        }
    }
}

/// Handles keyboard input and converts to commands
pub struct InputHandler {
    mode: Mode,
    command_buffer: String,
    /// Physical ids of the configured soft keys; these win over host bindings
    soft_keys: Vec<String>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
            soft_keys: Vec::new(),
        }
    }

    /// Set the physical keys that always go to the soft-key engine
    pub fn set_soft_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.soft_keys = keys.into_iter().map(Into::into).collect();
    }

    /// Get current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get current command buffer (for display)
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Command => self.handle_command_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }

        let physical = physical_key(&key);
        if let Some(id) = physical.as_ref().filter(|id| self.soft_keys.contains(id)) {
            return Some(Command::Key(id.clone()));
        }

        match key.code {
            // Mode switching
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command_buffer.clear();
                Some(Command::EnterCommandMode)
            }
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }

            // Options menu navigation
            KeyCode::Up => Some(Command::SelectPrev),
            KeyCode::Down => Some(Command::SelectNext),
            KeyCode::Char(c @ '1'..='9') => Some(Command::ActivateRow(c as usize - '1' as usize)),

            _ => physical.map(Command::Key),
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                let cmd = self.parse_command();
                self.mode = Mode::Normal;
                let buffer = std::mem::take(&mut self.command_buffer);
                cmd.or(Some(Command::ExecuteCommand(buffer)))
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.command_buffer.clear();
                Some(Command::EnterNormalMode)
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.mode = Mode::Normal;
                    Some(Command::EnterNormalMode)
                } else {
                    None
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                None
            }
            _ => None,
        }
    }

    fn parse_command(&self) -> Option<Command> {
        let input = self.command_buffer.trim();
        let words = split_words(input);
        let args: Vec<&str> = words.iter().map(String::as_str).collect();

        match args.as_slice() {
            ["q"] | ["quit"] => Some(Command::Quit),
            ["help"] => Some(Command::ToggleHelp),
            ["rescan"] => Some(Command::Rescan),
            ["theme", name] => Some(Command::SetTheme(name.to_string())),
            ["remove", node] => Some(Command::Remove(node.to_string())),
            ["hide", node] => Some(Command::Hide(node.to_string())),
            ["show", node] => Some(Command::Show(node.to_string())),
            ["accel", node] => Some(Command::SetAccel {
                node: node.to_string(),
                key: None,
            }),
            ["accel", node, key] => Some(Command::SetAccel {
                node: node.to_string(),
                key: Some(key.to_string()),
            }),
            ["text", node, rest @ ..] => Some(Command::SetText {
                node: node.to_string(),
                text: rest.join(" "),
            }),
            ["add", parent, id, label] => Some(Command::Add {
                parent: parent.to_string(),
                id: id.to_string(),
                label: label.to_string(),
                key: None,
            }),
            ["add", parent, id, label, key] => Some(Command::Add {
                parent: parent.to_string(),
                id: id.to_string(),
                label: label.to_string(),
                key: Some(key.to_string()),
            }),
            _ => None,
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            KeyCode::Char('k') | KeyCode::Up => Some(Command::HelpScrollUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Command::HelpScrollDown),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Split on whitespace, keeping quoted runs (`'..'` or `".."`) together
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    let mut quoted = false;

    for c in input.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                quoted = true;
            }
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() || quoted {
                    words.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(handler: &mut InputHandler, code: KeyCode) -> Option<Command> {
        handler.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn run(line: &str) -> Option<Command> {
        let mut handler = InputHandler::new();
        press(&mut handler, KeyCode::Char(':'));
        for c in line.chars() {
            press(&mut handler, KeyCode::Char(c));
        }
        press(&mut handler, KeyCode::Enter)
    }

    #[test]
    fn test_soft_keys_pass_through() {
        let mut handler = InputHandler::new();
        assert_eq!(press(&mut handler, KeyCode::F(1)), Some(Command::Key("F1".into())));
        assert_eq!(press(&mut handler, KeyCode::Enter), Some(Command::Key("Enter".into())));
        assert_eq!(press(&mut handler, KeyCode::Char('x')), Some(Command::Key("x".into())));
    }

    #[test]
    fn test_configured_soft_keys_win() {
        let mut handler = InputHandler::new();
        assert_eq!(press(&mut handler, KeyCode::Char('1')), Some(Command::ActivateRow(0)));

        handler.set_soft_keys(["1", "ArrowUp", "e"]);
        assert_eq!(press(&mut handler, KeyCode::Char('1')), Some(Command::Key("1".into())));
        assert_eq!(press(&mut handler, KeyCode::Up), Some(Command::Key("ArrowUp".into())));
        assert_eq!(press(&mut handler, KeyCode::Down), Some(Command::SelectNext));
    }

    #[test]
    fn test_menu_navigation() {
        let mut handler = InputHandler::new();
        assert_eq!(press(&mut handler, KeyCode::Up), Some(Command::SelectPrev));
        assert_eq!(press(&mut handler, KeyCode::Char('9')), Some(Command::ActivateRow(8)));
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut handler = InputHandler::new();
        handler.set_soft_keys(["q", "w", "e"]);
        let cmd = handler.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(cmd, Some(Command::Quit));
        assert_eq!(press(&mut handler, KeyCode::Char('q')), Some(Command::Key("q".into())));
    }

    #[test]
    fn test_mode_switching() {
        let mut handler = InputHandler::new();
        assert_eq!(press(&mut handler, KeyCode::Char('?')), Some(Command::ToggleHelp));
        assert_eq!(handler.mode(), Mode::Help);
        assert_eq!(press(&mut handler, KeyCode::Down), Some(Command::HelpScrollDown));
        assert_eq!(press(&mut handler, KeyCode::Esc), Some(Command::ToggleHelp));
        assert_eq!(handler.mode(), Mode::Normal);

        press(&mut handler, KeyCode::Char(':'));
        assert_eq!(handler.mode(), Mode::Command);
        press(&mut handler, KeyCode::Char('r'));
        assert_eq!(handler.command_buffer(), "r");
        assert_eq!(press(&mut handler, KeyCode::Backspace), Some(Command::EnterNormalMode));
        assert_eq!(handler.mode(), Mode::Normal);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(run("q"), Some(Command::Quit));
        assert_eq!(run("rescan"), Some(Command::Rescan));
        assert_eq!(
            run("text send Send now"),
            Some(Command::SetText {
                node: "send".into(),
                text: "Send now".into()
            })
        );
        assert_eq!(
            run("accel #4 F2"),
            Some(Command::SetAccel {
                node: "#4".into(),
                key: Some("F2".into())
            })
        );
        assert_eq!(
            run("accel back"),
            Some(Command::SetAccel {
                node: "back".into(),
                key: None
            })
        );
        assert_eq!(
            run("add footer edit \"Edit draft\" F1"),
            Some(Command::Add {
                parent: "footer".into(),
                id: "edit".into(),
                label: "Edit draft".into(),
                key: Some("F1".into())
            })
        );
        assert_eq!(run("hide back"), Some(Command::Hide("back".into())));
    }

    #[test]
    fn test_unknown_command_is_passed_back() {
        assert_eq!(run("bogus 1 2"), Some(Command::ExecuteCommand("bogus 1 2".into())));
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("a  'b c' \"\" d"), vec!["a", "b c", "", "d"]);
        assert!(split_words("   ").is_empty());
    }
}
