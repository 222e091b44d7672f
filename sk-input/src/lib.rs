//! Vim-style modal keyboard input for the softkeys terminal host
//!
//! Terminal key events become either a physical key identifier handed to the
//! soft-key engine, or a host command that edits the demo page.

mod commands;
mod keys;
mod modal;

pub use commands::Command;
pub use keys::physical_key;
pub use modal::{InputHandler, Mode};
