//! Command definitions for the softkeys host

/// Commands that can be dispatched from input
///
/// Node arguments are element ids, or `#n` for an id-less node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Soft keys
    Key(String), // Physical key id, routed through the engine

    // Options menu
    SelectNext,
    SelectPrev,
    ActivateRow(usize), // Zero-based row index

    // Page mutations
    SetText { node: String, text: String },
    Remove(String),
    SetAccel { node: String, key: Option<String> }, // None drops the accelerator
    Hide(String),
    Show(String),
    Add {
        parent: String,
        id: String,
        label: String,
        key: Option<String>,
    },
    Rescan,

    // UI
    ToggleHelp,
    SetTheme(String),
    HelpScrollUp,
    HelpScrollDown,

    // Mode changes
    EnterCommandMode,
    EnterNormalMode,

    // Application
    Quit,

    // Command mode, unrecognized input
    ExecuteCommand(String),
}
