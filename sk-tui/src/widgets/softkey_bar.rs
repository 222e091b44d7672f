//! Soft-key bar widget - the proxy container along the bottom edge

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use sk_core::{LogicalKey, ProxyContainer};

use crate::theme::Theme;

/// Renders one label per proxy: LSK left, CSK centered, RSK right
pub struct SoftKeyBarWidget<'a> {
    container: Option<&'a ProxyContainer>,
    theme: &'a Theme,
}

impl<'a> SoftKeyBarWidget<'a> {
    pub fn new(container: Option<&'a ProxyContainer>, theme: &'a Theme) -> Self {
        Self { container, theme }
    }
}

impl Widget for SoftKeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.dim());
            }
        }

        // Detached container: nothing but the empty strip
        let Some(container) = self.container else {
            return;
        };

        let slots = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
        for button in container.buttons() {
            let key = button.key();
            let alignment = match key {
                LogicalKey::Lsk => Alignment::Left,
                LogicalKey::Csk => Alignment::Center,
                LogicalKey::Rsk => Alignment::Right,
            };
            let label = Line::from(Span::styled(button.text(), self.theme.softkey(key)));
            Paragraph::new(label)
                .alignment(alignment)
                .render(slots[key.index()], buf);
        }
    }
}
