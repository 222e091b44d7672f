//! The soft-key context object owned by the host
//!
//! Holds every component. The host passes its view tree into each call, so
//! several independent instances can coexist and teardown needs no global
//! reset.

use sk_tree::{NodeId, ViewTree};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, SoftKeyError};
use crate::keys::LogicalKey;
use crate::menu::MenuModel;
use crate::overlay::{ActivatedItem, MenuPlacement, OverlayController};
use crate::proxy::ProxyRenderer;
use crate::registry::KeyRegistry;
use crate::router::{InputRouter, Routed};
use crate::sync::{SyncReport, TreeSynchronizer};

pub struct SoftKeys {
    registry: KeyRegistry,
    renderer: ProxyRenderer,
    synchronizer: TreeSynchronizer,
    router: InputRouter,
    overlay: OverlayController,
    initialized: bool,
}

impl SoftKeys {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: KeyRegistry::new(config.keymap.clone()),
            renderer: ProxyRenderer::new(),
            synchronizer: TreeSynchronizer::new(),
            router: InputRouter::new(config.cancel_key),
            overlay: OverlayController::new(
                config.cancel_key,
                config.cancel_label.clone(),
                config.menu_placement,
            ),
            initialized: false,
        }
    }

    /// Start observing `tree`, create the proxy container and run discovery
    ///
    /// Re-initializing tears the previous state down first. Fails without side
    /// effects if the tree cannot report mutations.
    pub fn init<T: ViewTree + ?Sized>(&mut self, tree: &mut T) -> Result<()> {
        if self.initialized {
            self.destroy(tree);
        }

        let root = tree.root();
        self.synchronizer.start(tree, root)?;
        self.renderer.ensure_container();
        self.discover(tree);
        self.initialized = true;

        info!(
            bound = self.registry.bindings().count(),
            "soft keys initialized"
        );
        Ok(())
    }

    /// Release bindings, proxies, the open menu and the observer; no-op when not initialized
    pub fn destroy<T: ViewTree + ?Sized>(&mut self, tree: &mut T) {
        if !self.initialized {
            return;
        }

        self.overlay.teardown();
        self.renderer.teardown(tree);
        self.registry.clear();
        self.synchronizer.stop(tree);
        self.initialized = false;
        info!("soft keys destroyed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Re-run discovery, picking up accelerator nodes inserted since init
    pub fn rescan<T: ViewTree + ?Sized>(&mut self, tree: &mut T) -> Result<()> {
        self.ensure_initialized()?;
        self.discover(tree);
        Ok(())
    }

    /// Reconcile every mutation batch the tree has delivered
    pub fn process_mutations<T: ViewTree + ?Sized>(&mut self, tree: &mut T) -> SyncReport {
        if !self.initialized {
            return SyncReport::default();
        }
        self.synchronizer
            .process(tree, &mut self.registry, &mut self.renderer)
    }

    /// Route a physical key press; ignored when not initialized
    pub fn on_physical_key<T: ViewTree + ?Sized>(
        &mut self,
        tree: &mut T,
        physical: &str,
    ) -> Result<Routed> {
        if !self.initialized {
            return Ok(Routed::Ignored);
        }
        self.router
            .on_physical_key(tree, &self.registry, &mut self.overlay, physical)
    }

    /// Open a host-built menu; false when it has no items
    pub fn open_menu(&mut self, model: MenuModel) -> Result<bool> {
        self.ensure_initialized()?;
        Ok(self.overlay.open(model))
    }

    pub fn close_menu(&mut self) -> Result<()> {
        self.overlay.close()
    }

    pub fn activate_item<T: ViewTree + ?Sized>(
        &mut self,
        tree: &mut T,
        index: usize,
    ) -> Result<Option<ActivatedItem>> {
        self.overlay.activate(tree, index)
    }

    pub fn activate_selected<T: ViewTree + ?Sized>(
        &mut self,
        tree: &mut T,
    ) -> Result<Option<ActivatedItem>> {
        self.overlay.activate_selected(tree)
    }

    pub fn select_next(&mut self) {
        self.overlay.select_next();
    }

    pub fn select_prev(&mut self) {
        self.overlay.select_prev();
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &ProxyRenderer {
        &self.renderer
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn placement(&self) -> MenuPlacement {
        self.overlay.placement()
    }

    pub fn is_observing(&self) -> bool {
        self.synchronizer.is_observing()
    }

    pub fn bound_node(&self, key: LogicalKey) -> Option<NodeId> {
        self.registry.bound_node(key)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(SoftKeyError::NotInitialized)
        }
    }

    /// Bind each key, in scan order, to the first node declaring its accelerator
    ///
    /// The first match only counts if it is rendered; a hidden first match
    /// leaves the key unbound.
    fn discover<T: ViewTree + ?Sized>(&mut self, tree: &mut T) {
        for key in LogicalKey::ALL {
            let physical = self.registry.keymap().physical(key).to_string();
            let candidate = tree
                .find_nodes_with_accelerator(&physical)
                .into_iter()
                .next()
                .filter(|node| tree.is_rendered(*node));

            match candidate {
                Some(node) => {
                    let change = self.registry.bind(key, node);
                    if let Some(other) = change.displaced {
                        self.renderer.sync(tree, other, None);
                    }
                    self.renderer.sync(tree, key, Some(node));
                    debug!(%key, %node, accelerator = %physical, "discovered soft key");
                }
                None => {
                    if self.registry.unbind(key).is_some() {
                        self.renderer.sync(tree, key, None);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{ItemHandle, ItemOutcome, MenuItem};
    use crate::overlay::OverlayState;
    use sk_tree::{Document, NodeSpec, ACCESSKEY_ATTR};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Page {
        doc: Document,
        options: NodeId,
        select: NodeId,
        back: NodeId,
        reply: NodeId,
    }

    fn page() -> Page {
        let mut doc = Document::new();
        let root = doc.root();
        let menu = doc.append(root, NodeSpec::new("menu").id("msg-opts").header("Message").hidden());
        let reply = doc.append(menu, NodeSpec::new("button").text("Reply"));
        doc.append(menu, NodeSpec::new("button").text("Delete"));
        let footer = doc.append(root, NodeSpec::new("footer"));
        let options = doc.append(
            footer,
            NodeSpec::new("button")
                .text("Options")
                .accesskey("F1")
                .contextmenu("msg-opts"),
        );
        let select = doc.append(footer, NodeSpec::new("button").text("Select").accesskey("Enter"));
        let back = doc.append(footer, NodeSpec::new("button").text("Back").accesskey("F2"));
        Page {
            doc,
            options,
            select,
            back,
            reply,
        }
    }

    fn engine() -> SoftKeys {
        SoftKeys::new(&Config::default())
    }

    fn flush(keys: &mut SoftKeys, doc: &mut Document) -> SyncReport {
        doc.checkpoint();
        keys.process_mutations(doc)
    }

    #[test]
    fn test_init_discovers_bindings() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();

        assert_eq!(keys.bound_node(LogicalKey::Lsk), Some(p.options));
        assert_eq!(keys.bound_node(LogicalKey::Csk), Some(p.select));
        assert_eq!(keys.bound_node(LogicalKey::Rsk), Some(p.back));
        let texts: Vec<_> = keys
            .renderer()
            .container()
            .unwrap()
            .buttons()
            .iter()
            .map(|b| (b.class_name(), b.text()))
            .collect();
        assert_eq!(texts, vec![("LSK", "Options"), ("CSK", "Select"), ("RSK", "Back")]);
        assert!(p.doc.is_suppressed(p.options));
    }

    #[test]
    fn test_hidden_first_match_is_not_bound() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append(root, NodeSpec::new("button").accesskey("F1").hidden());
        doc.append(root, NodeSpec::new("button").accesskey("F1"));
        let mut keys = engine();
        keys.init(&mut doc).unwrap();
        assert_eq!(keys.bound_node(LogicalKey::Lsk), None);
        assert_eq!(keys.renderer().proxy_count(), 0);
        assert!(keys.renderer().container_attached());
    }

    #[test]
    fn test_init_requires_observation() {
        let mut doc = Document::without_observation();
        let root = doc.root();
        doc.append(root, NodeSpec::new("button").accesskey("F1"));
        let mut keys = engine();

        assert!(matches!(
            keys.init(&mut doc),
            Err(SoftKeyError::ObservationUnsupported)
        ));
        assert!(!keys.is_initialized());
        assert!(!keys.renderer().container_attached());
        assert_eq!(keys.bound_node(LogicalKey::Lsk), None);
    }

    #[test]
    fn test_init_then_destroy_leaves_nothing() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();
        keys.on_physical_key(&mut p.doc, "F1").unwrap();
        assert!(keys.overlay().is_open());

        keys.destroy(&mut p.doc);
        assert!(!keys.is_initialized());
        assert!(!keys.renderer().container_attached());
        assert_eq!(keys.renderer().proxy_count(), 0);
        assert_eq!(keys.overlay().state(), OverlayState::Closed);
        assert_eq!(keys.overlay().listener_count(), 0);
        assert_eq!(p.doc.observer_count(), 0);
        assert!(!keys.is_observing());
        assert_eq!(keys.registry().bindings().count(), 0);
        assert!(!p.doc.is_suppressed(p.options));

        // keys no longer reach the tree
        assert_eq!(keys.on_physical_key(&mut p.doc, "F2").unwrap(), Routed::Ignored);
        assert!(p.doc.activations().is_empty());

        // second destroy is a no-op
        keys.destroy(&mut p.doc);
    }

    #[test]
    fn test_reinit_tears_down_first() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();
        keys.init(&mut p.doc).unwrap();

        assert_eq!(p.doc.observer_count(), 1);
        assert_eq!(keys.renderer().proxy_count(), 3);
        assert!(keys.is_initialized());
    }

    #[test]
    fn test_removal_clears_binding_and_proxy() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();

        p.doc.remove(p.select);
        flush(&mut keys, &mut p.doc);
        assert_eq!(keys.bound_node(LogicalKey::Csk), None);
        assert!(keys.renderer().proxy(LogicalKey::Csk).is_none());
        assert_eq!(keys.on_physical_key(&mut p.doc, "Enter").unwrap(), Routed::Unbound(LogicalKey::Csk));
    }

    #[test]
    fn test_attribute_move_rebinds() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();
        let root = p.doc.root();
        let edit = p.doc.append(root, NodeSpec::new("button").text("Edit"));
        flush(&mut keys, &mut p.doc);
        assert_eq!(keys.bound_node(LogicalKey::Lsk), Some(p.options));

        p.doc.set_attribute(edit, ACCESSKEY_ATTR, "F1");
        flush(&mut keys, &mut p.doc);
        assert_eq!(keys.bound_node(LogicalKey::Lsk), Some(edit));
        assert_eq!(keys.registry().key_for_node(p.options), None);
        assert_eq!(keys.renderer().proxy(LogicalKey::Lsk).unwrap().text(), "Edit");
    }

    #[test]
    fn test_rescan_binds_inserted_nodes() {
        let mut doc = Document::new();
        let mut keys = engine();
        keys.init(&mut doc).unwrap();
        let root = doc.root();
        let send = doc.append(root, NodeSpec::new("button").text("Send").accesskey("F2"));
        flush(&mut keys, &mut doc);
        assert_eq!(keys.bound_node(LogicalKey::Rsk), None);

        keys.rescan(&mut doc).unwrap();
        assert_eq!(keys.bound_node(LogicalKey::Rsk), Some(send));
        assert_eq!(keys.renderer().proxy(LogicalKey::Rsk).unwrap().text(), "Send");
    }

    #[test]
    fn test_rescan_requires_init() {
        let mut doc = Document::new();
        let mut keys = engine();
        assert!(matches!(keys.rescan(&mut doc), Err(SoftKeyError::NotInitialized)));
        assert!(matches!(
            keys.open_menu(MenuModel::new(vec![])),
            Err(SoftKeyError::NotInitialized)
        ));
    }

    #[test]
    fn test_menu_round_trip() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();

        assert!(matches!(
            keys.on_physical_key(&mut p.doc, "F1").unwrap(),
            Routed::MenuOpened { .. }
        ));
        let form = keys.overlay().form().unwrap();
        assert_eq!(form.header(), Some("Message"));
        assert_eq!(form.rows().len(), 2);

        // background keys are swallowed
        assert_eq!(
            keys.on_physical_key(&mut p.doc, "F2").unwrap(),
            Routed::Swallowed(LogicalKey::Rsk)
        );

        let activated = keys.activate_item(&mut p.doc, 0).unwrap().unwrap();
        assert_eq!(activated.label, "Reply");
        assert_eq!(p.doc.take_activations(), vec![p.reply]);
        assert!(keys.overlay().is_open());

        assert_eq!(keys.on_physical_key(&mut p.doc, "F1").unwrap(), Routed::MenuClosed);
        assert!(p.doc.activations().is_empty());
        assert!(matches!(keys.close_menu(), Err(SoftKeyError::OverlayNotOpen)));
    }

    #[test]
    fn test_programmatic_menu_replaces_open_one() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();
        keys.on_physical_key(&mut p.doc, "F1").unwrap();

        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let model = MenuModel::new(vec![MenuItem::new(
            "Mark read",
            ItemHandle::callback(move || counter.set(counter.get() + 1)),
        )]);
        assert!(keys.open_menu(model).unwrap());
        assert_eq!(keys.overlay().form().unwrap().rows().len(), 1);

        keys.activate_selected(&mut p.doc).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(p.doc.activations().is_empty());
    }

    #[test]
    fn test_closing_item_returns_to_bound_keys() {
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();

        let model = MenuModel::new(vec![MenuItem::new(
            "Save",
            ItemHandle::action(|| ItemOutcome::Close),
        )]);
        assert!(keys.open_menu(model).unwrap());

        let activated = keys.activate_item(&mut p.doc, 0).unwrap().unwrap();
        assert_eq!(activated.outcome, ItemOutcome::Close);
        assert_eq!(keys.overlay().state(), OverlayState::Closed);
        assert!(matches!(keys.close_menu(), Err(SoftKeyError::OverlayNotOpen)));

        // With the menu gone the soft keys reach their bound nodes again.
        assert!(matches!(
            keys.on_physical_key(&mut p.doc, "F2").unwrap(),
            Routed::Activated { .. }
        ));
        assert_eq!(p.doc.activations(), &[p.back]);
    }

    #[test]
    fn test_key_press_sees_unprocessed_removal_as_still_bound() {
        // Until the batch is delivered, routing uses the current registry.
        let mut p = page();
        let mut keys = engine();
        keys.init(&mut p.doc).unwrap();
        p.doc.remove(p.back);

        assert!(matches!(
            keys.on_physical_key(&mut p.doc, "F2").unwrap(),
            Routed::Activated { .. }
        ));
        flush(&mut keys, &mut p.doc);
        assert_eq!(keys.on_physical_key(&mut p.doc, "F2").unwrap(), Routed::Unbound(LogicalKey::Rsk));
    }

    #[test]
    fn test_independent_instances() {
        let mut first = page();
        let mut second = page();
        let mut a = engine();
        let mut b = engine();
        a.init(&mut first.doc).unwrap();
        b.init(&mut second.doc).unwrap();

        a.destroy(&mut first.doc);
        assert!(b.is_initialized());
        assert_eq!(b.renderer().proxy_count(), 3);
        assert_eq!(second.doc.observer_count(), 1);
    }
}
