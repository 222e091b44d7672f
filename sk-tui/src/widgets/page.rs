//! Page widget - the host view tree as an indented outline

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use sk_tree::{Document, NodeId, ViewTree};

use crate::theme::Theme;

/// Renders every rendered node under the root, one line each
///
/// Nodes whose label moved to the soft-key bar are drawn crossed out.
pub struct PageWidget<'a> {
    doc: &'a Document,
    theme: &'a Theme,
    title: &'a str,
}

impl<'a> PageWidget<'a> {
    pub fn new(doc: &'a Document, theme: &'a Theme) -> Self {
        Self {
            doc,
            theme,
            title: "PAGE",
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    fn node_line(&self, node: NodeId) -> Line<'a> {
        let doc = self.doc;
        let depth = doc.depth(node).saturating_sub(1);
        let name = match doc.element_id(node) {
            Some(id) => format!("{}#{}", doc.tag(node).unwrap_or("?"), id),
            None => format!("{}{}", doc.tag(node).unwrap_or("?"), node),
        };

        let text_style = if doc.is_suppressed(node) {
            self.theme.suppressed()
        } else {
            self.theme.normal()
        };

        let mut spans = vec![
            Span::raw("  ".repeat(depth)),
            Span::styled(name, self.theme.dim()),
        ];
        let text = doc.text(node).unwrap_or_default();
        if !text.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(text, text_style));
        }
        if let Some(key) = doc.accelerator(node) {
            spans.push(Span::styled(format!(" [{key}]"), self.theme.softkey_hint()));
        }
        Line::from(spans)
    }
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .style(self.theme.normal())
            .title(Span::styled(format!(" {} ", self.title), self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 1 {
            return;
        }

        let doc = self.doc;
        let lines: Vec<Line> = doc
            .walk(doc.root())
            .into_iter()
            .skip(1)
            .filter(|n| doc.is_rendered(*n))
            .map(|n| self.node_line(n))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
