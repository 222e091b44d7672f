//! Status bar widget - mode indicator and command line

use crate::app::MessageType;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use sk_input::Mode;

/// Widget for displaying the status bar with mode and command input
pub struct StatusBarWidget<'a> {
    mode: Mode,
    command_buffer: &'a str,
    message: Option<&'a str>,
    message_type: MessageType,
    theme: &'a Theme,
    menu_open: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: Mode, command_buffer: &'a str, theme: &'a Theme) -> Self {
        Self {
            mode,
            command_buffer,
            message: None,
            message_type: MessageType::Info,
            theme,
            menu_open: false,
        }
    }

    pub fn message(mut self, msg: Option<&'a str>, msg_type: MessageType) -> Self {
        self.message = msg;
        self.message_type = msg_type;
        self
    }

    pub fn menu_open(mut self, open: bool) -> Self {
        self.menu_open = open;
        self
    }

    fn mode_string(&self) -> (&'static str, Style) {
        match self.mode {
            Mode::Normal if self.menu_open => ("MENU", Style::default().fg(self.theme.warning)),
            Mode::Normal => ("NORMAL", self.theme.highlight()),
            Mode::Command => ("COMMAND", Style::from(self.theme.accent)),
            Mode::Help => ("HELP", self.theme.highlight()),
        }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Length(10), // Mode indicator
            Constraint::Min(20),    // Command/message area
            Constraint::Length(24), // Help hint
        ])
        .split(area);

        let (mode_text, mode_style) = self.mode_string();
        let mode_line = Line::from(vec![
            Span::raw("["),
            Span::styled(mode_text, mode_style),
            Span::raw("]"),
        ]);
        Paragraph::new(mode_line).render(chunks[0], buf);

        let content = if self.mode == Mode::Command {
            Line::from(vec![
                Span::styled(":", Style::from(self.theme.accent)),
                Span::styled(self.command_buffer, self.theme.normal()),
                Span::styled("█", self.theme.highlight()), // Cursor
            ])
        } else if let Some(msg) = self.message {
            let msg_style = match self.message_type {
                MessageType::Info => self.theme.dim(),
                MessageType::Success => Style::from(self.theme.accent),
                MessageType::Warning => Style::default().fg(self.theme.warning),
                MessageType::Error => Style::default().fg(self.theme.danger),
            };
            Line::from(Span::styled(msg, msg_style))
        } else {
            Line::from(Span::styled(
                "Ready. Press ? for help, : for commands",
                self.theme.dim(),
            ))
        };
        Paragraph::new(content).render(chunks[1], buf);

        let help = match self.mode {
            Mode::Normal if self.menu_open => "↑/↓:select  1-9:pick",
            Mode::Normal => "?:help  ::cmd  ^Q:quit",
            Mode::Command => "Enter:run  Esc:cancel",
            Mode::Help => "Esc:close help",
        };
        let help_line = Line::from(Span::styled(help, self.theme.dim()));
        Paragraph::new(help_line).render(chunks[2], buf);
    }
}

/// Help overlay widget with scrolling support
pub struct HelpWidget<'a> {
    theme: &'a Theme,
    scroll: u16,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme, scroll: 0 }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn help_lines() -> Vec<&'static str> {
        vec![
            "╔════════════════════════════════════════════════════════════════╗",
            "║              softkeys - feature phone simulator                ║",
            "║                  ↑/↓ or j/k to scroll                          ║",
            "╠════════════════════════════════════════════════════════════════╣",
            "║ SOFT KEYS                  function preset   letter preset     ║",
            "║   Left (LSK)                   F1                q             ║",
            "║   Center (CSK)                 Enter             w             ║",
            "║   Right (RSK)                  F2                e             ║",
            "║                                                                ║",
            "║   A soft key activates the page node bound to it, or opens     ║",
            "║   that node's options menu when it names one.                  ║",
            "╠────────────────────────────────────────────────────────────────╣",
            "║ OPTIONS MENU                                                   ║",
            "║   ↑ / ↓         Move selection                                 ║",
            "║   1-9           Activate row                                   ║",
            "║   CSK           Activate selected row                          ║",
            "║   Cancel key    Close the menu (LSK unless configured)         ║",
            "║                 Other soft keys are ignored while it is open   ║",
            "╠────────────────────────────────────────────────────────────────╣",
            "║ COMMANDS (:)                                                   ║",
            "║   :text <node> <label>          Change a node's label          ║",
            "║   :remove <node>                Detach a node                  ║",
            "║   :accel <node> [key]           Set or drop an accelerator     ║",
            "║   :hide <node> / :show <node>   Toggle rendering               ║",
            "║   :add <parent> <id> <label> [key]   Append a button           ║",
            "║   :rescan                       Re-run soft key discovery      ║",
            "║   :theme <name>                 green / amber / cyber          ║",
            "║   :q                            Quit                           ║",
            "║                                                                ║",
            "║   <node> is an element id, or #n for an id-less node           ║",
            "╠════════════════════════════════════════════════════════════════╣",
            "║               Press Esc or ? to close help                     ║",
            "║                   Ctrl-Q to quit softkeys                      ║",
            "╚════════════════════════════════════════════════════════════════╝",
        ]
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear background
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        let help_text = Self::help_lines();
        let total_lines = help_text.len() as u16;
        let visible_lines = area.height.min(total_lines);

        // Clamp scroll to valid range
        let max_scroll = total_lines.saturating_sub(visible_lines);
        let scroll = self.scroll.min(max_scroll);

        let start_x = area.x + area.width.saturating_sub(68) / 2;

        for (i, line) in help_text
            .iter()
            .skip(scroll as usize)
            .take(visible_lines as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            for (j, ch) in line.chars().enumerate() {
                let x = start_x + j as u16;
                if x >= area.x + area.width {
                    break;
                }

                let style = if matches!(ch, '║' | '╔' | '╗' | '╚' | '╝' | '═' | '╠' | '╣' | '─') {
                    self.theme.border()
                } else {
                    self.theme.normal()
                };
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }

        if total_lines > visible_lines {
            let indicator = format!(" [{}/{}] ", scroll + 1, max_scroll + 1);
            let indicator_x = area.x + area.width.saturating_sub(indicator.len() as u16 + 2);
            let indicator_y = area.y + area.height - 1;

            for (i, ch) in indicator.chars().enumerate() {
                let x = indicator_x + i as u16;
                if x < area.x + area.width {
                    buf[(x, indicator_y)]
                        .set_char(ch)
                        .set_style(self.theme.dim());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_command_line_shows_buffer() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(Mode::Command, "rescan", &theme).render(area, &mut buf);
        let line = row(&buf, 0);
        assert!(line.contains("[COMMAND]"));
        assert!(line.contains(":rescan"));
    }

    #[test]
    fn test_menu_indicator() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(Mode::Normal, "", &theme)
            .menu_open(true)
            .message(Some("Reply"), MessageType::Success)
            .render(area, &mut buf);
        let line = row(&buf, 0);
        assert!(line.contains("[MENU]"));
        assert!(line.contains("Reply"));
    }

    #[test]
    fn test_help_scroll_is_clamped() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 5);
        let mut buf = Buffer::empty(area);
        HelpWidget::new(&theme).scroll(999).render(area, &mut buf);
        assert!(row(&buf, 4).contains("╚"));
    }
}
