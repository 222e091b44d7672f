//! View tree contract for softkeys
//!
//! The soft-key engine never owns the tree it binds to. It reads labels and
//! attributes through [`ViewTree`] and learns about changes from batches of
//! [`MutationRecord`]s delivered to an [`Observer`].
//!
//! [`Document`] is an in-memory tree implementing the contract, used by the
//! terminal host and by tests.

mod document;
mod tree;

pub use document::{Document, NodeSpec};
pub use tree::{
    MenuSource, MutationBatch, MutationKind, MutationRecord, NodeId, ObserveOptions, Observer,
    ObserverId, ViewTree, ACCESSKEY_ATTR, CONTEXTMENU_ATTR, HEADER_ATTR, HIDDEN_ATTR, ICON_ATTR,
    SUPPRESSED_CLASS,
};
