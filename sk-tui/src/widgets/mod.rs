//! UI widgets for the softkeys host

mod options_menu;
mod page;
mod softkey_bar;
pub mod status_bar;

pub use options_menu::OptionsMenuWidget;
pub use page::PageWidget;
pub use softkey_bar::SoftKeyBarWidget;
pub use status_bar::StatusBarWidget;
