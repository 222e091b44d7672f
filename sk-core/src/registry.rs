//! Logical key to physical key and bound node lookup

use sk_tree::NodeId;

use crate::keys::{KeyMap, LogicalKey};

/// What a [`KeyRegistry::bind`] call changed for the key being bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// Same node was already bound to this key
    Unchanged,
    /// Key had no binding
    Bound,
    /// Key was bound to another node, which is now superseded
    Replaced { previous: NodeId },
}

/// Result of a bind, including any key that lost the node to this one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindChange {
    pub outcome: BindOutcome,
    /// Key that was bound to the same node and has been unbound
    pub displaced: Option<LogicalKey>,
}

/// Current soft-key bindings
///
/// Holds at most one node per key and at most one key per node.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keymap: KeyMap,
    bound: [Option<NodeId>; 3],
}

impl KeyRegistry {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            bound: [None; 3],
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Logical key for a physical identifier; unknown identifiers resolve to none
    pub fn resolve(&self, physical: &str) -> Option<LogicalKey> {
        self.keymap.resolve(physical)
    }

    pub fn bound_node(&self, key: LogicalKey) -> Option<NodeId> {
        self.bound[key.index()]
    }

    /// Key currently bound to `node`
    pub fn key_for_node(&self, node: NodeId) -> Option<LogicalKey> {
        LogicalKey::ALL
            .into_iter()
            .find(|key| self.bound[key.index()] == Some(node))
    }

    pub fn bind(&mut self, key: LogicalKey, node: NodeId) -> BindChange {
        if self.bound[key.index()] == Some(node) {
            return BindChange {
                outcome: BindOutcome::Unchanged,
                displaced: None,
            };
        }

        let displaced = self.key_for_node(node);
        if let Some(other) = displaced {
            self.bound[other.index()] = None;
        }

        let outcome = match self.bound[key.index()].replace(node) {
            Some(previous) => BindOutcome::Replaced { previous },
            None => BindOutcome::Bound,
        };

        BindChange { outcome, displaced }
    }

    /// Clear a binding, returning the node it held
    pub fn unbind(&mut self, key: LogicalKey) -> Option<NodeId> {
        self.bound[key.index()].take()
    }

    /// Clear every binding, returning what was bound
    pub fn clear(&mut self) -> Vec<(LogicalKey, NodeId)> {
        LogicalKey::ALL
            .into_iter()
            .filter_map(|key| self.unbind(key).map(|node| (key, node)))
            .collect()
    }

    /// Bound keys in scan order
    pub fn bindings(&self) -> impl Iterator<Item = (LogicalKey, NodeId)> + '_ {
        LogicalKey::ALL
            .into_iter()
            .filter_map(|key| self.bound_node(key).map(|node| (key, node)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_tree::{Document, NodeSpec, ViewTree};

    fn nodes(count: usize) -> Vec<NodeId> {
        let mut doc = Document::new();
        let root = doc.root();
        (0..count)
            .map(|_| doc.append(root, NodeSpec::new("button")))
            .collect()
    }

    #[test]
    fn test_bind_is_idempotent() {
        let n = nodes(1);
        let mut registry = KeyRegistry::default();

        assert_eq!(registry.bind(LogicalKey::Lsk, n[0]).outcome, BindOutcome::Bound);
        assert_eq!(
            registry.bind(LogicalKey::Lsk, n[0]).outcome,
            BindOutcome::Unchanged
        );
        assert_eq!(registry.bound_node(LogicalKey::Lsk), Some(n[0]));
    }

    #[test]
    fn test_bind_replaces() {
        let n = nodes(2);
        let mut registry = KeyRegistry::default();
        registry.bind(LogicalKey::Csk, n[0]);

        let change = registry.bind(LogicalKey::Csk, n[1]);
        assert_eq!(change.outcome, BindOutcome::Replaced { previous: n[0] });
        assert_eq!(registry.bound_node(LogicalKey::Csk), Some(n[1]));
        assert_eq!(registry.key_for_node(n[0]), None);
    }

    #[test]
    fn test_node_moves_between_keys() {
        let n = nodes(1);
        let mut registry = KeyRegistry::default();
        registry.bind(LogicalKey::Lsk, n[0]);

        let change = registry.bind(LogicalKey::Rsk, n[0]);
        assert_eq!(change.displaced, Some(LogicalKey::Lsk));
        assert_eq!(registry.bound_node(LogicalKey::Lsk), None);
        assert_eq!(registry.key_for_node(n[0]), Some(LogicalKey::Rsk));
    }

    #[test]
    fn test_resolve_and_clear() {
        let n = nodes(2);
        let mut registry = KeyRegistry::default();
        assert_eq!(registry.resolve("F2"), Some(LogicalKey::Rsk));
        assert_eq!(registry.resolve("Escape"), None);

        registry.bind(LogicalKey::Lsk, n[0]);
        registry.bind(LogicalKey::Rsk, n[1]);
        assert_eq!(registry.bindings().count(), 2);

        let cleared = registry.clear();
        assert_eq!(cleared, vec![(LogicalKey::Lsk, n[0]), (LogicalKey::Rsk, n[1])]);
        assert_eq!(registry.bindings().count(), 0);
        assert_eq!(registry.unbind(LogicalKey::Csk), None);
    }
}
