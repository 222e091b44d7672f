//! Terminal UI for softkeys - widgets, themes and app state
//!
//! Draws a feature-phone style screen: the page, the soft-key bar and the
//! options menu overlay.

mod app;
mod theme;
pub mod widgets;

pub use app::{App, AppState, MessageType};
pub use theme::{Theme, CRT_AMBER, CRT_GREEN, CYBERPUNK};
pub use widgets::status_bar::HelpWidget;
pub use widgets::{OptionsMenuWidget, PageWidget, SoftKeyBarWidget, StatusBarWidget};
