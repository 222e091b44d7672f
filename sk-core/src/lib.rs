//! Soft-key engine for non-touch devices
//!
//! Binds the left, center and right soft keys to accelerator-tagged nodes of
//! a host view tree, mirrors their labels into a proxy bar, keeps both in step
//! with tree mutations and shows a modal options menu.

mod config;
mod engine;
mod error;
mod keys;
mod menu;
mod overlay;
mod proxy;
mod registry;
mod router;
mod sync;

pub use config::Config;
pub use engine::SoftKeys;
pub use error::{ConfigError, Result, SoftKeyError};
pub use keys::{KeyMap, KeyPreset, LogicalKey};
pub use menu::{ItemHandle, ItemOutcome, MenuItem, MenuModel, DEFAULT_MENU_KIND};
pub use overlay::{
    ActivatedItem, CancelRow, MenuPlacement, MenuRow, OverlayController, OverlayForm,
    OverlayState, CANCEL_L10N_ID,
};
pub use proxy::{ProxyButton, ProxyChange, ProxyContainer, ProxyRenderer, CONTAINER_SUBTYPE};
pub use registry::{BindChange, BindOutcome, KeyRegistry};
pub use router::{InputRouter, Routed};
pub use sync::{SyncReport, TreeSynchronizer};
