//! Keeps bindings and proxies correct while the host mutates its tree
//!
//! Each batch is reconciled in three passes over the records, in report
//! order: text refresh, removals, accelerator attribute changes. Reading
//! current tree state (not record payloads) makes a replayed batch a no-op
//! and makes the last record for a key win.
//!
//! Newly inserted nodes carrying an accelerator are not bound here; they
//! need an accelerator attribute change or a rescan.

use sk_tree::{
    MutationBatch, MutationKind, MutationRecord, NodeId, ObserveOptions, Observer, ViewTree,
    ACCESSKEY_ATTR,
};
use tracing::{debug, info};

use crate::error::{Result, SoftKeyError};
use crate::keys::LogicalKey;
use crate::proxy::{ProxyChange, ProxyRenderer};
use crate::registry::{BindOutcome, KeyRegistry};

/// Keys touched while reconciling one or more batches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Proxy text refreshed from the bound node
    pub refreshed: Vec<LogicalKey>,
    /// Binding cleared (node removed, detached or retagged away)
    pub cleared: Vec<LogicalKey>,
    /// Binding established or moved to another node
    pub rebound: Vec<LogicalKey>,
    pub batches: usize,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.refreshed.is_empty() && self.cleared.is_empty() && self.rebound.is_empty()
    }

    fn merge(&mut self, other: SyncReport) {
        self.refreshed.extend(other.refreshed);
        self.cleared.extend(other.cleared);
        self.rebound.extend(other.rebound);
        self.batches += other.batches;
    }
}

/// Mutation observation for the soft-key bindings
#[derive(Debug, Default)]
pub struct TreeSynchronizer {
    observer: Option<Observer>,
}

impl TreeSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the synchronizer asks the tree to report
    pub fn observe_options() -> ObserveOptions {
        ObserveOptions {
            child_list: true,
            character_data: true,
            attributes: true,
            attribute_filter: vec![ACCESSKEY_ATTR.to_string()],
            subtree: true,
        }
    }

    /// Begin observing `root` and its subtree
    pub fn start<T: ViewTree + ?Sized>(&mut self, tree: &mut T, root: NodeId) -> Result<()> {
        self.stop(tree);
        let observer = tree
            .observe(root, Self::observe_options())
            .ok_or(SoftKeyError::ObservationUnsupported)?;
        debug!(observer = ?observer.id(), %root, "observing view tree");
        self.observer = Some(observer);
        Ok(())
    }

    /// Stop observing and drop undelivered batches
    pub fn stop<T: ViewTree + ?Sized>(&mut self, tree: &mut T) {
        if let Some(observer) = self.observer.take() {
            tree.disconnect(observer.id());
            debug!(observer = ?observer.id(), "stopped observing view tree");
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_some()
    }

    /// Batches delivered since the last call
    pub fn take_batches(&self) -> Vec<MutationBatch> {
        self.observer
            .as_ref()
            .map(Observer::drain)
            .unwrap_or_default()
    }

    /// Reconcile every delivered batch, in delivery order
    pub fn process<T: ViewTree + ?Sized>(
        &self,
        tree: &mut T,
        registry: &mut KeyRegistry,
        renderer: &mut ProxyRenderer,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        for batch in self.take_batches() {
            report.merge(Self::apply_batch(tree, registry, renderer, &batch));
        }
        report
    }

    /// Reconcile bindings and proxies against one batch
    pub fn apply_batch<T: ViewTree + ?Sized>(
        tree: &mut T,
        registry: &mut KeyRegistry,
        renderer: &mut ProxyRenderer,
        batch: &[MutationRecord],
    ) -> SyncReport {
        let mut report = SyncReport {
            batches: 1,
            ..Default::default()
        };

        // Text changes on bound nodes only refresh the proxy.
        for record in batch {
            let text_change = matches!(
                record.kind,
                MutationKind::CharacterData | MutationKind::ChildList
            );
            if !text_change {
                continue;
            }
            if let Some(key) = registry.key_for_node(record.target) {
                if renderer.sync(tree, key, Some(record.target)) == ProxyChange::TextUpdated {
                    report.refreshed.push(key);
                }
            }
        }

        // Removed bound nodes, and bound nodes gone by the time we run.
        for record in batch {
            for removed in &record.removed_nodes {
                if let Some(key) = registry.key_for_node(*removed) {
                    Self::clear(tree, registry, renderer, key, &mut report);
                }
            }
        }
        let detached: Vec<_> = registry
            .bindings()
            .filter(|(_, node)| !tree.contains(*node))
            .map(|(key, _)| key)
            .collect();
        for key in detached {
            Self::clear(tree, registry, renderer, key, &mut report);
        }

        // Accelerator changes bind the key to the retagged node.
        for record in batch.iter().filter(|r| r.is_attribute(ACCESSKEY_ATTR)) {
            let node = record.target;
            if !tree.contains(node) {
                continue;
            }

            let wanted = tree.accelerator(node).and_then(|a| registry.resolve(a));
            match wanted {
                Some(key) => {
                    let change = registry.bind(key, node);
                    if let Some(other) = change.displaced {
                        renderer.sync(tree, other, None);
                        report.cleared.push(other);
                    }
                    if change.outcome != BindOutcome::Unchanged {
                        if let BindOutcome::Replaced { previous } = change.outcome {
                            info!(%key, %previous, %node, "soft key binding moved");
                        } else {
                            info!(%key, %node, "soft key bound");
                        }
                        renderer.sync(tree, key, Some(node));
                        report.rebound.push(key);
                    }
                }
                None => {
                    if let Some(key) = registry.key_for_node(node) {
                        Self::clear(tree, registry, renderer, key, &mut report);
                    }
                }
            }
        }

        report
    }

    fn clear<T: ViewTree + ?Sized>(
        tree: &mut T,
        registry: &mut KeyRegistry,
        renderer: &mut ProxyRenderer,
        key: LogicalKey,
        report: &mut SyncReport,
    ) {
        if let Some(node) = registry.unbind(key) {
            info!(%key, %node, "soft key unbound");
            renderer.sync(tree, key, None);
            report.cleared.push(key);
        }
    }
}
