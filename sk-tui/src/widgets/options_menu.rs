//! Options menu widget - the modal overlay form

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use sk_core::OverlayForm;

use crate::theme::Theme;

/// Renders an open overlay form: header, numbered rows, cancel row
pub struct OptionsMenuWidget<'a> {
    form: &'a OverlayForm,
    theme: &'a Theme,
}

impl<'a> OptionsMenuWidget<'a> {
    pub fn new(form: &'a OverlayForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }

    /// Bottom-anchored area the menu occupies inside `area`
    pub fn area(form: &OverlayForm, area: Rect) -> Rect {
        // rows plus top and bottom border
        let wanted = u16::try_from(form.rows().len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let height = wanted.min(area.height);
        Rect {
            x: area.x,
            y: area.y + area.height - height,
            width: area.width,
            height,
        }
    }

    fn row_line(&self, index: usize) -> Line<'a> {
        let form: &'a OverlayForm = self.form;
        let row = &form.rows()[index];
        let number = if index < 9 {
            format!("{}. ", index + 1)
        } else {
            "   ".to_string()
        };
        let selected = form.selected() == Some(index);
        let style = if selected {
            self.theme.highlight()
        } else {
            self.theme.normal()
        };

        let mut spans = vec![Span::styled(number, self.theme.dim())];
        if let Some(icon) = row.icon() {
            spans.push(Span::styled(format!("[{icon}] "), self.theme.dim()));
        }
        spans.push(Span::styled(row.label(), style));
        Line::from(spans)
    }
}

impl Widget for OptionsMenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let cancel = self.form.cancel();
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_active())
            .style(self.theme.normal())
            .title_bottom(Line::from(Span::styled(
                format!(" {}: {} ", cancel.key().class_name(), cancel.label()),
                self.theme.dim(),
            )));
        if let Some(header) = self.form.header() {
            block = block.title(Span::styled(format!(" {header} "), self.theme.title()));
        }

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 1 || inner.width < 4 {
            return;
        }

        // Keep the selected row on screen
        let visible = inner.height as usize;
        let offset = self
            .form
            .selected()
            .map_or(0, |s| (s + 1).saturating_sub(visible));

        let lines: Vec<Line> = (offset..self.form.rows().len())
            .take(visible)
            .map(|i| self.row_line(i))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
