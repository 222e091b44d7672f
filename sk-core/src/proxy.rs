//! On-screen proxy buttons standing in for bound nodes
//!
//! The renderer is driven only by binding transitions. It never looks at
//! mutation records.

use sk_tree::{NodeId, ViewTree};
use tracing::debug;

use crate::keys::LogicalKey;

/// Container subtype tag
pub const CONTAINER_SUBTYPE: &str = "softkey-container";

/// Visual stand-in for the node bound to one soft key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyButton {
    key: LogicalKey,
    source: NodeId,
    text: String,
}

impl ProxyButton {
    pub fn key(&self) -> LogicalKey {
        self.key
    }

    /// Node this proxy represents
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Style class (`LSK`, `CSK`, `RSK`)
    pub fn class_name(&self) -> &'static str {
        self.key.class_name()
    }
}

/// The single region holding every proxy button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyContainer {
    buttons: Vec<ProxyButton>,
}

impl ProxyContainer {
    fn new() -> Self {
        Self {
            buttons: Vec::with_capacity(LogicalKey::ALL.len()),
        }
    }

    pub fn subtype(&self) -> &'static str {
        CONTAINER_SUBTYPE
    }

    /// Auxiliary region, never in the focus order
    pub fn tab_index(&self) -> i32 {
        -1
    }

    /// Buttons in creation order
    pub fn buttons(&self) -> &[ProxyButton] {
        &self.buttons
    }

    pub fn button(&self, key: LogicalKey) -> Option<&ProxyButton> {
        self.buttons.iter().find(|b| b.key == key)
    }

    fn button_mut(&mut self, key: LogicalKey) -> Option<&mut ProxyButton> {
        self.buttons.iter_mut().find(|b| b.key == key)
    }
}

/// What a [`ProxyRenderer::sync`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyChange {
    Created,
    /// Existing proxy now represents a different node
    Retargeted,
    TextUpdated,
    Unchanged,
    Removed,
    /// No node and no proxy, nothing to do
    Absent,
}

/// Owner of the proxy container and its buttons
#[derive(Debug, Default)]
pub struct ProxyRenderer {
    container: Option<ProxyContainer>,
}

impl ProxyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the container if it does not exist yet
    pub fn ensure_container(&mut self) -> &mut ProxyContainer {
        self.container.get_or_insert_with(|| {
            debug!("proxy container attached");
            ProxyContainer::new()
        })
    }

    pub fn container(&self) -> Option<&ProxyContainer> {
        self.container.as_ref()
    }

    pub fn container_attached(&self) -> bool {
        self.container.is_some()
    }

    pub fn proxy(&self, key: LogicalKey) -> Option<&ProxyButton> {
        self.container.as_ref().and_then(|c| c.button(key))
    }

    pub fn proxy_count(&self) -> usize {
        self.container.as_ref().map_or(0, |c| c.buttons.len())
    }

    /// Bring the proxy for `key` in line with its binding
    pub fn sync<T: ViewTree + ?Sized>(
        &mut self,
        tree: &mut T,
        key: LogicalKey,
        node: Option<NodeId>,
    ) -> ProxyChange {
        let Some(node) = node else {
            return self.remove(tree, key);
        };

        let text = tree.text(node).unwrap_or_default();
        let container = self.ensure_container();

        match container.button_mut(key) {
            Some(button) if button.source == node => {
                if button.text == text {
                    ProxyChange::Unchanged
                } else {
                    debug!(%key, text = %text, "proxy text updated");
                    button.text = text;
                    ProxyChange::TextUpdated
                }
            }
            Some(button) => {
                let previous = std::mem::replace(&mut button.source, node);
                button.text = text;
                tree.set_suppressed(previous, false);
                tree.set_suppressed(node, true);
                debug!(%key, %previous, %node, "proxy retargeted");
                ProxyChange::Retargeted
            }
            None => {
                debug!(%key, %node, text = %text, "proxy created");
                container.buttons.push(ProxyButton {
                    key,
                    source: node,
                    text,
                });
                tree.set_suppressed(node, true);
                ProxyChange::Created
            }
        }
    }

    /// Remove every proxy and detach the container
    pub fn teardown<T: ViewTree + ?Sized>(&mut self, tree: &mut T) {
        let Some(container) = self.container.take() else {
            return;
        };
        for button in container.buttons {
            tree.set_suppressed(button.source, false);
        }
        debug!("proxy container detached");
    }

    fn remove<T: ViewTree + ?Sized>(&mut self, tree: &mut T, key: LogicalKey) -> ProxyChange {
        let Some(container) = self.container.as_mut() else {
            return ProxyChange::Absent;
        };
        let Some(pos) = container.buttons.iter().position(|b| b.key == key) else {
            return ProxyChange::Absent;
        };

        let button = container.buttons.remove(pos);
        tree.set_suppressed(button.source, false);
        debug!(%key, node = %button.source, "proxy removed");
        ProxyChange::Removed
    }
}
