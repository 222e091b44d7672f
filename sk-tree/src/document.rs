//! In-memory view tree with coalesced mutation reporting
//!
//! Mutations are queued per observer as they happen and delivered as one
//! batch per observer at the next [`Document::checkpoint`], the way a
//! browser defers mutation observer callbacks to a microtask checkpoint.

use std::collections::BTreeMap;

use crossbeam_channel::{unbounded, Sender};
use tracing::{debug, trace, warn};

use crate::tree::{
    MenuSource, MutationBatch, MutationRecord, NodeId, ObserveOptions, Observer, ObserverId,
    ViewTree, ACCESSKEY_ATTR, CONTEXTMENU_ATTR, HEADER_ATTR, HIDDEN_ATTR, ICON_ATTR,
    SUPPRESSED_CLASS,
};

/// Description of a node to create
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    tag: String,
    element_id: Option<String>,
    text: String,
    attributes: Vec<(String, String)>,
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn accesskey(self, key: impl Into<String>) -> Self {
        self.attr(ACCESSKEY_ATTR, key)
    }

    pub fn contextmenu(self, menu_ref: impl Into<String>) -> Self {
        self.attr(CONTEXTMENU_ATTR, menu_ref)
    }

    pub fn header(self, header: impl Into<String>) -> Self {
        self.attr(HEADER_ATTR, header)
    }

    pub fn icon(self, icon: impl Into<String>) -> Self {
        self.attr(ICON_ATTR, icon)
    }

    pub fn hidden(self) -> Self {
        self.attr(HIDDEN_ATTR, "")
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    element_id: Option<String>,
    text: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Registration {
    id: ObserverId,
    target: NodeId,
    options: ObserveOptions,
    queue: Vec<MutationRecord>,
    sender: Sender<MutationBatch>,
}

/// Mutable in-memory document
///
/// Nodes are never freed: a removed node stays addressable (detached), so
/// stale handles resolve to "not attached" instead of dangling.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    observers: Vec<Registration>,
    next_observer: u64,
    activations: Vec<NodeId>,
    observable: bool,
}

impl Document {
    /// Create a document holding only an empty `body` root
    pub fn new() -> Self {
        let root = NodeData {
            tag: "body".into(),
            element_id: None,
            text: String::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            observers: Vec::new(),
            next_observer: 1,
            activations: Vec::new(),
            observable: true,
        }
    }

    /// A document that cannot report mutations (for hosts lacking observation)
    pub fn without_observation() -> Self {
        Self {
            observable: false,
            ..Self::new()
        }
    }

    /// Create a detached node
    pub fn create(&mut self, spec: NodeSpec) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            tag: spec.tag,
            element_id: spec.element_id,
            text: spec.text,
            attributes: spec.attributes.into_iter().collect(),
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a node and append it under `parent`
    pub fn append(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
        let node = self.create(spec);
        self.append_child(parent, node);
        node
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        if is_inclusive_ancestor(&self.nodes, child, parent) {
            warn!(%parent, %child, "refusing to append a node under its own subtree");
            return;
        }

        if self.nodes[child.index()].parent.is_some() {
            self.remove(child);
        }

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        self.record(MutationRecord::child_list(parent, vec![child], Vec::new()));
    }

    /// Detach `node` from its parent; returns false if it was not attached to one
    pub fn remove(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return false;
        };

        self.nodes[parent.index()].children.retain(|c| *c != node);
        self.nodes[node.index()].parent = None;
        self.record(MutationRecord::child_list(parent, Vec::new(), vec![node]));
        true
    }

    /// Change the text of `node` in place (character data change)
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        data.text = text.into();
        self.record(MutationRecord::character_data(node));
    }

    /// Replace the text children of `node` (reported as a child list change on it)
    pub fn replace_text(&mut self, node: NodeId, text: impl Into<String>) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        data.text = text.into();
        self.record(MutationRecord::child_list(node, Vec::new(), Vec::new()));
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        data.attributes.insert(name.to_string(), value.into());
        self.record(MutationRecord::attribute(node, name));
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        if data.attributes.remove(name).is_some() {
            self.record(MutationRecord::attribute(node, name));
        }
    }

    /// Take `node` out of layout, or put it back
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if hidden {
            self.set_attribute(node, HIDDEN_ATTR, "");
        } else {
            self.remove_attribute(node, HIDDEN_ATTR);
        }
    }

    /// First attached node carrying element id `id`
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.walk(self.root())
            .into_iter()
            .find(|n| self.nodes[n.index()].element_id.as_deref() == Some(id))
    }

    /// Node named by `reference`: an element id, or `#n` for a raw index
    ///
    /// Raw indexes also resolve detached nodes.
    pub fn lookup(&self, reference: &str) -> Option<NodeId> {
        if let Some(index) = reference.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
            return (index < self.nodes.len()).then(|| NodeId::new(index));
        }
        self.element_by_id(reference)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.element_id.as_deref())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// `node` and its descendants in document order
    pub fn walk(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(data) = self.node(current) else {
                continue;
            };
            out.push(current);
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    /// Depth of `node` below the root (root = 0)
    pub fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(node);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn is_suppressed(&self, node: NodeId) -> bool {
        self.has_class(node, SUPPRESSED_CLASS)
    }

    /// Activations dispatched so far, oldest first
    pub fn activations(&self) -> &[NodeId] {
        &self.activations
    }

    pub fn take_activations(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.activations)
    }

    /// Number of live observer registrations
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Records queued for delivery across all observers
    pub fn pending_records(&self) -> usize {
        self.observers.iter().map(|r| r.queue.len()).sum()
    }

    /// Deliver queued records, one batch per observer; returns batches sent
    pub fn checkpoint(&mut self) -> usize {
        let mut delivered = 0;
        self.observers.retain_mut(|reg| {
            if reg.queue.is_empty() {
                return true;
            }
            let batch = std::mem::take(&mut reg.queue);
            trace!(observer = ?reg.id, records = batch.len(), "delivering mutation batch");
            if reg.sender.send(batch).is_ok() {
                delivered += 1;
                true
            } else {
                debug!(observer = ?reg.id, "observer dropped, pruning registration");
                false
            }
        });
        delivered
    }

    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.index())
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.index())
    }

    fn record(&mut self, record: MutationRecord) {
        let nodes = &self.nodes;
        for reg in &mut self.observers {
            let in_scope = reg.target == record.target
                || (reg.options.subtree && is_inclusive_ancestor(nodes, reg.target, record.target));
            if in_scope && reg.options.wants(&record) {
                reg.queue.push(record.clone());
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn is_inclusive_ancestor(nodes: &[NodeData], ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        current = nodes.get(n.index()).and_then(|d| d.parent);
    }
    false
}

impl ViewTree for Document {
    fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some() && is_inclusive_ancestor(&self.nodes, self.root(), node)
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        if !self.contains(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(n) = current {
            if self.nodes[n.index()].attributes.contains_key(HIDDEN_ATTR) {
                return false;
            }
            current = self.nodes[n.index()].parent;
        }
        true
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.text.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    fn find_nodes_with_accelerator(&self, accelerator: &str) -> Vec<NodeId> {
        self.walk(self.root())
            .into_iter()
            .filter(|n| self.accelerator(*n) == Some(accelerator))
            .collect()
    }

    fn menu_source(&self, menu_ref: &str) -> Option<MenuSource> {
        let menu = self.element_by_id(menu_ref)?;
        Some(MenuSource {
            header: self.attribute(menu, HEADER_ATTR).map(str::to_string),
            items: self.children(menu).to_vec(),
        })
    }

    fn set_suppressed(&mut self, node: NodeId, suppressed: bool) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        let present = data.classes.iter().any(|c| c == SUPPRESSED_CLASS);
        if suppressed == present {
            return;
        }
        if suppressed {
            data.classes.push(SUPPRESSED_CLASS.to_string());
        } else {
            data.classes.retain(|c| c != SUPPRESSED_CLASS);
        }
        self.record(MutationRecord::attribute(node, "class"));
    }

    fn activate(&mut self, node: NodeId) {
        if self.node(node).is_some() {
            debug!(%node, "activate");
            self.activations.push(node);
        }
    }

    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> Option<Observer> {
        if !self.observable {
            return None;
        }
        let (sender, receiver) = unbounded();
        let id = ObserverId::new(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Registration {
            id,
            target,
            options,
            queue: Vec::new(),
            sender,
        });
        Some(Observer::new(id, receiver))
    }

    fn disconnect(&mut self, observer: ObserverId) {
        self.observers.retain(|reg| reg.id != observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MutationKind;

    fn observe_all(doc: &mut Document) -> Observer {
        let root = doc.root();
        doc.observe(
            root,
            ObserveOptions {
                child_list: true,
                character_data: true,
                attributes: true,
                attribute_filter: vec![ACCESSKEY_ATTR.into()],
                subtree: true,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let mut doc = Document::new();
        let root = doc.root();
        let send = doc.append(root, NodeSpec::new("button").id("send"));
        let plain = doc.append(root, NodeSpec::new("span"));

        assert_eq!(doc.lookup("send"), Some(send));
        assert_eq!(doc.lookup(&plain.to_string()), Some(plain));
        assert_eq!(doc.lookup("#0"), Some(root));
        assert_eq!(doc.lookup("#99"), None);
        assert_eq!(doc.lookup("nope"), None);
    }

    #[test]
    fn test_find_accelerator_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let section = doc.append(root, NodeSpec::new("section"));
        let first = doc.append(section, NodeSpec::new("button").accesskey("F1"));
        let second = doc.append(root, NodeSpec::new("button").accesskey("F1"));
        doc.append(root, NodeSpec::new("button").accesskey("F2"));

        assert_eq!(doc.find_nodes_with_accelerator("F1"), vec![first, second]);
    }

    #[test]
    fn test_detached_nodes_are_not_found() {
        let mut doc = Document::new();
        let root = doc.root();
        let button = doc.append(root, NodeSpec::new("button").accesskey("F1"));
        doc.remove(button);

        assert!(!doc.contains(button));
        assert!(doc.find_nodes_with_accelerator("F1").is_empty());
        assert_eq!(doc.text(button), Some(String::new()));
    }

    #[test]
    fn test_hidden_ancestor_hides_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let menu = doc.append(root, NodeSpec::new("menu").hidden());
        let item = doc.append(menu, NodeSpec::new("button").text("Item"));

        assert!(doc.contains(item));
        assert!(!doc.is_rendered(item));
        doc.set_hidden(menu, false);
        assert!(doc.is_rendered(item));
    }

    #[test]
    fn test_records_are_coalesced_until_checkpoint() {
        let mut doc = Document::new();
        let observer = observe_all(&mut doc);
        let root = doc.root();

        let button = doc.append(root, NodeSpec::new("button").text("Ok"));
        doc.set_text(button, "Done");
        doc.set_attribute(button, ACCESSKEY_ATTR, "F1");
        assert!(observer.drain().is_empty());

        assert_eq!(doc.checkpoint(), 1);
        let batches = observer.drain();
        assert_eq!(batches.len(), 1);
        let kinds: Vec<_> = batches[0].iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MutationKind::ChildList,
                MutationKind::CharacterData,
                MutationKind::Attributes
            ]
        );
    }

    #[test]
    fn test_attribute_filter_applies() {
        let mut doc = Document::new();
        let root = doc.root();
        let button = doc.append(root, NodeSpec::new("button"));
        let observer = observe_all(&mut doc);

        doc.set_attribute(button, "title", "x");
        doc.set_suppressed(button, true);
        doc.checkpoint();
        assert!(observer.drain().is_empty());
        assert!(doc.is_suppressed(button));
    }

    #[test]
    fn test_detached_subtree_is_not_reported() {
        let mut doc = Document::new();
        let root = doc.root();
        let button = doc.append(root, NodeSpec::new("button"));
        doc.remove(button);
        let observer = observe_all(&mut doc);

        doc.set_text(button, "ghost");
        doc.checkpoint();
        assert!(observer.drain().is_empty());
    }

    #[test]
    fn test_disconnect_drops_registration() {
        let mut doc = Document::new();
        let observer = observe_all(&mut doc);
        assert_eq!(doc.observer_count(), 1);

        let root = doc.root();
        doc.append(root, NodeSpec::new("p"));
        doc.disconnect(observer.id());
        assert_eq!(doc.observer_count(), 0);
        assert_eq!(doc.pending_records(), 0);
    }

    #[test]
    fn test_dropped_observer_is_pruned_at_checkpoint() {
        let mut doc = Document::new();
        let observer = observe_all(&mut doc);
        drop(observer);

        let root = doc.root();
        doc.append(root, NodeSpec::new("p"));
        assert_eq!(doc.checkpoint(), 0);
        assert_eq!(doc.observer_count(), 0);
    }

    #[test]
    fn test_without_observation() {
        let mut doc = Document::without_observation();
        let root = doc.root();
        assert!(doc.observe(root, ObserveOptions::default()).is_none());
    }

    #[test]
    fn test_menu_source() {
        let mut doc = Document::new();
        let root = doc.root();
        let menu = doc.append(root, NodeSpec::new("menu").id("opts").header("Options"));
        let a = doc.append(menu, NodeSpec::new("button").text("Reply"));
        let b = doc.append(menu, NodeSpec::new("button").text("Delete"));

        let source = doc.menu_source("opts").unwrap();
        assert_eq!(source.header.as_deref(), Some("Options"));
        assert_eq!(source.items, vec![a, b]);
        assert!(doc.menu_source("missing").is_none());
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::new();
        let root = doc.root();
        let left = doc.append(root, NodeSpec::new("div"));
        let right = doc.append(root, NodeSpec::new("div"));
        let child = doc.append(left, NodeSpec::new("span"));

        doc.append_child(right, child);
        assert!(doc.children(left).is_empty());
        assert_eq!(doc.children(right), &[child]);

        // cycles are refused
        doc.append_child(child, right);
        assert_eq!(doc.parent(right), Some(root));
    }
}
