//! CRT-style themes for the softkeys host

use ratatui::style::{Color, Modifier, Style};
use sk_core::LogicalKey;

/// Theme configuration for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (selected rows, active elements)
    pub highlight: Color,
    /// Accent color
    pub accent: Color,
    /// Warning color
    pub warning: Color,
    /// Error/danger color
    pub danger: Color,
    pub lsk: Color,
    pub csk: Color,
    pub rsk: Color,
}

impl Theme {
    /// Look a theme up by its config name
    pub fn by_name(name: &str) -> Option<Theme> {
        match name.to_lowercase().as_str() {
            "green" => Some(CRT_GREEN),
            "amber" => Some(CRT_AMBER),
            "cyber" => Some(CYBERPUNK),
            _ => None,
        }
    }

    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get style for active borders
    pub fn border_active(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Label style for a soft key proxy
    pub fn softkey(&self, key: LogicalKey) -> Style {
        let color = match key {
            LogicalKey::Lsk => self.lsk,
            LogicalKey::Csk => self.csk,
            LogicalKey::Rsk => self.rsk,
        };
        let style = Style::default().fg(color).bg(self.bg);
        if key == LogicalKey::Csk {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Accelerator hint next to a page node
    pub fn softkey_hint(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Page nodes whose label lives on the soft-key bar
    pub fn suppressed(&self) -> Style {
        Style::default()
            .fg(self.fg_dim)
            .add_modifier(Modifier::CROSSED_OUT)
    }
}

/// Classic phosphor green CRT theme
pub const CRT_GREEN: Theme = Theme {
    name: "green",
    fg: Color::Rgb(51, 255, 51),          // #33ff33 - phosphor green
    fg_dim: Color::Rgb(25, 128, 25),      // dimmed green
    bg: Color::Rgb(0, 10, 0),             // near black with green tint
    highlight: Color::Rgb(180, 255, 180), // bright green
    accent: Color::Rgb(100, 255, 100),    // medium green
    warning: Color::Rgb(255, 255, 100),   // yellow-green
    danger: Color::Rgb(255, 100, 100),    // red warning
    lsk: Color::Rgb(100, 255, 150),       // green-cyan
    csk: Color::Rgb(180, 255, 180),       // bright green
    rsk: Color::Rgb(150, 255, 100),       // yellow-green
};

/// Amber CRT theme (1980s monochrome)
pub const CRT_AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(255, 176, 0),          // #ffb000 - amber
    fg_dim: Color::Rgb(128, 88, 0),       // dimmed amber
    bg: Color::Rgb(10, 5, 0),             // near black with amber tint
    highlight: Color::Rgb(255, 220, 128), // bright amber
    accent: Color::Rgb(255, 200, 64),     // medium amber
    warning: Color::Rgb(255, 255, 100),   // yellow
    danger: Color::Rgb(255, 100, 100),    // red warning
    lsk: Color::Rgb(255, 180, 50),        // orange-amber
    csk: Color::Rgb(255, 220, 128),       // bright amber
    rsk: Color::Rgb(255, 220, 100),       // yellow-amber
};

/// Cyberpunk neon theme
pub const CYBERPUNK: Theme = Theme {
    name: "cyber",
    fg: Color::Rgb(0, 255, 255),        // cyan
    fg_dim: Color::Rgb(0, 128, 128),    // dim cyan
    bg: Color::Rgb(5, 0, 10),           // dark purple-black
    highlight: Color::Rgb(255, 0, 255), // magenta
    accent: Color::Rgb(0, 255, 128),    // neon green
    warning: Color::Rgb(255, 255, 0),   // yellow
    danger: Color::Rgb(255, 50, 50),    // red
    lsk: Color::Rgb(255, 100, 255),     // pink
    csk: Color::Rgb(0, 255, 128),       // neon green
    rsk: Color::Rgb(100, 255, 255),     // light cyan
};

impl Default for Theme {
    fn default() -> Self {
        CRT_GREEN
    }
}
