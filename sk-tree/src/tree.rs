//! The contract between the soft-key engine and a host view tree

use std::fmt;

use crossbeam_channel::Receiver;

/// Attribute declaring the physical key a node answers to
pub const ACCESSKEY_ATTR: &str = "accesskey";
/// Attribute naming the menu collection a node opens
pub const CONTEXTMENU_ATTR: &str = "contextmenu";
/// Attribute on a menu collection carrying its header text
pub const HEADER_ATTR: &str = "header";
/// Attribute on a menu item carrying its icon reference
pub const ICON_ATTR: &str = "data-icon";
/// Attribute that takes a node (and its subtree) out of layout
pub const HIDDEN_ATTR: &str = "hidden";
/// Class marking a node whose soft-key proxy stands in for it visually
pub const SUPPRESSED_CLASS: &str = "sk-hide-button";

/// Opaque handle to a node in a view tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Raw index of the node inside its tree
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category of a reported mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Children added to or removed from `target`
    ChildList,
    /// Text content of `target` changed
    CharacterData,
    /// An attribute of `target` changed
    Attributes,
}

/// One change reported by the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    /// Set only for [`MutationKind::Attributes`]
    pub attribute_name: Option<String>,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added_nodes: Vec<NodeId>, removed_nodes: Vec<NodeId>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added_nodes,
            removed_nodes,
            attribute_name: None,
        }
    }

    pub fn character_data(target: NodeId) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: None,
        }
    }

    pub fn attribute(target: NodeId, name: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.into()),
        }
    }

    /// Whether this record reports a change of attribute `name`
    pub fn is_attribute(&self, name: &str) -> bool {
        self.kind == MutationKind::Attributes && self.attribute_name.as_deref() == Some(name)
    }
}

/// Records coalesced by the tree and delivered together, in report order
pub type MutationBatch = Vec<MutationRecord>;

/// Which mutations an observer wants reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub character_data: bool,
    pub attributes: bool,
    /// Restrict attribute records to these names (empty = every attribute)
    pub attribute_filter: Vec<String>,
    /// Observe the whole subtree, not just the target
    pub subtree: bool,
}

impl ObserveOptions {
    /// Whether an attribute record for `name` passes the filter
    pub fn wants_attribute(&self, name: &str) -> bool {
        self.attributes
            && (self.attribute_filter.is_empty() || self.attribute_filter.iter().any(|a| a == name))
    }

    /// Whether a record of this shape should be reported
    pub fn wants(&self, record: &MutationRecord) -> bool {
        match record.kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::CharacterData => self.character_data,
            MutationKind::Attributes => record
                .attribute_name
                .as_deref()
                .is_some_and(|name| self.wants_attribute(name)),
        }
    }
}

/// Identity of an observer registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Receiving end of an observer registration
///
/// Batches arrive when the tree reaches a delivery checkpoint. Dropping the
/// observer stops delivery, but trees keep the registration until
/// [`ViewTree::disconnect`] is called.
#[derive(Debug)]
pub struct Observer {
    id: ObserverId,
    batches: Receiver<MutationBatch>,
}

impl Observer {
    pub fn new(id: ObserverId, batches: Receiver<MutationBatch>) -> Self {
        Self { id, batches }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Take every batch delivered so far, oldest first
    pub fn drain(&self) -> Vec<MutationBatch> {
        self.batches.try_iter().collect()
    }
}

/// A menu collection resolved from an overlay-trigger reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSource {
    pub header: Option<String>,
    /// Item nodes in document order
    pub items: Vec<NodeId>,
}

/// Capabilities the soft-key engine needs from a host view tree
pub trait ViewTree {
    /// Root of the document
    fn root(&self) -> NodeId;

    /// Whether `node` is currently attached under the root
    fn contains(&self, node: NodeId) -> bool;

    /// Whether `node` is attached and laid out (not hidden by itself or an ancestor)
    fn is_rendered(&self, node: NodeId) -> bool;

    /// Current text label of `node`
    fn text(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Attached nodes declaring `accelerator`, in document order
    fn find_nodes_with_accelerator(&self, accelerator: &str) -> Vec<NodeId>;

    /// Resolve a menu collection by reference
    fn menu_source(&self, menu_ref: &str) -> Option<MenuSource>;

    /// Mark `node` as visually stood-in-for by a proxy, or lift that mark
    fn set_suppressed(&mut self, node: NodeId, suppressed: bool);

    /// Dispatch a synthetic activation (click) on `node`
    fn activate(&mut self, node: NodeId);

    /// Start observing `target`; `None` when the tree cannot report mutations
    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> Option<Observer>;

    /// Drop an observer registration and any records queued for it
    fn disconnect(&mut self, observer: ObserverId);

    fn accelerator(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, ACCESSKEY_ATTR)
    }

    fn overlay_trigger(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, CONTEXTMENU_ATTR)
    }
}
