//! Physical key events to soft-key actions
//!
//! While the options menu is open it intercepts every soft key except the
//! cancel key, so nothing behind the modal can be activated.

use sk_tree::{NodeId, ViewTree};
use tracing::debug;

use crate::error::Result;
use crate::keys::LogicalKey;
use crate::menu::MenuModel;
use crate::overlay::OverlayController;
use crate::registry::KeyRegistry;

/// What a key press turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Not a soft key
    Ignored,
    /// Soft key with nothing bound to it
    Unbound(LogicalKey),
    /// Bound node received a synthetic activation
    Activated { key: LogicalKey, node: NodeId },
    /// Bound node's menu is now showing
    MenuOpened { key: LogicalKey, menu: String },
    /// Bound node's menu had no items, nothing opened
    MenuEmpty { key: LogicalKey, menu: String },
    /// Cancel key closed the options menu
    MenuClosed,
    /// Soft key consumed by the open options menu
    Swallowed(LogicalKey),
}

/// Stateless router; every call reads the current bindings
#[derive(Debug, Clone, Copy)]
pub struct InputRouter {
    cancel_key: LogicalKey,
}

impl InputRouter {
    pub fn new(cancel_key: LogicalKey) -> Self {
        Self { cancel_key }
    }

    pub fn cancel_key(&self) -> LogicalKey {
        self.cancel_key
    }

    /// Route one physical key press
    ///
    /// Errors only when a bound node names a menu collection that does not exist.
    pub fn on_physical_key<T: ViewTree + ?Sized>(
        &self,
        tree: &mut T,
        registry: &KeyRegistry,
        overlay: &mut OverlayController,
        physical: &str,
    ) -> Result<Routed> {
        let Some(key) = registry.resolve(physical) else {
            return Ok(Routed::Ignored);
        };

        if overlay.is_open() {
            if key == self.cancel_key {
                overlay.close()?;
                return Ok(Routed::MenuClosed);
            }
            debug!(%key, "soft key swallowed by options menu");
            return Ok(Routed::Swallowed(key));
        }

        let Some(node) = registry.bound_node(key) else {
            return Ok(Routed::Unbound(key));
        };

        if let Some(menu) = tree.overlay_trigger(node).map(str::to_string) {
            let model = MenuModel::from_tree(tree, &menu)?;
            return Ok(if overlay.open(model) {
                Routed::MenuOpened { key, menu }
            } else {
                Routed::MenuEmpty { key, menu }
            });
        }

        tree.activate(node);
        Ok(Routed::Activated { key, node })
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(LogicalKey::Lsk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SoftKeyError;
    use crate::menu::{ItemHandle, MenuItem};
    use sk_tree::{Document, NodeSpec};

    struct Fixture {
        doc: Document,
        registry: KeyRegistry,
        overlay: OverlayController,
        router: InputRouter,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                doc: Document::new(),
                registry: KeyRegistry::default(),
                overlay: OverlayController::default(),
                router: InputRouter::default(),
            }
        }

        fn press(&mut self, physical: &str) -> Result<Routed> {
            self.router
                .on_physical_key(&mut self.doc, &self.registry, &mut self.overlay, physical)
        }
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let mut fx = Fixture::new();
        assert_eq!(fx.press("F9").unwrap(), Routed::Ignored);
        assert_eq!(fx.press("Enter").unwrap(), Routed::Unbound(LogicalKey::Csk));
    }

    #[test]
    fn test_activates_bound_node() {
        let mut fx = Fixture::new();
        let root = fx.doc.root();
        let send = fx.doc.append(root, NodeSpec::new("button").accesskey("F2"));
        fx.registry.bind(LogicalKey::Rsk, send);

        assert_eq!(
            fx.press("F2").unwrap(),
            Routed::Activated {
                key: LogicalKey::Rsk,
                node: send
            }
        );
        assert_eq!(fx.doc.activations(), &[send]);
    }

    #[test]
    fn test_trigger_opens_menu() {
        let mut fx = Fixture::new();
        let root = fx.doc.root();
        let menu = fx.doc.append(root, NodeSpec::new("menu").id("opts").hidden());
        fx.doc.append(menu, NodeSpec::new("button").text("Reply"));
        let options = fx
            .doc
            .append(root, NodeSpec::new("button").accesskey("F1").contextmenu("opts"));
        fx.registry.bind(LogicalKey::Lsk, options);

        let routed = fx.press("F1").unwrap();
        assert_eq!(
            routed,
            Routed::MenuOpened {
                key: LogicalKey::Lsk,
                menu: "opts".into()
            }
        );
        assert!(fx.overlay.is_open());
        assert!(fx.doc.activations().is_empty());
    }

    #[test]
    fn test_empty_trigger_menu() {
        let mut fx = Fixture::new();
        let root = fx.doc.root();
        fx.doc.append(root, NodeSpec::new("menu").id("none"));
        let options = fx
            .doc
            .append(root, NodeSpec::new("button").accesskey("F1").contextmenu("none"));
        fx.registry.bind(LogicalKey::Lsk, options);

        assert!(matches!(fx.press("F1").unwrap(), Routed::MenuEmpty { .. }));
        assert!(!fx.overlay.is_open());
    }

    #[test]
    fn test_missing_menu_is_reported() {
        let mut fx = Fixture::new();
        let root = fx.doc.root();
        let options = fx
            .doc
            .append(root, NodeSpec::new("button").accesskey("F1").contextmenu("ghost"));
        fx.registry.bind(LogicalKey::Lsk, options);

        assert!(matches!(
            fx.press("F1"),
            Err(SoftKeyError::MenuNotFound(ref m)) if m == "ghost"
        ));
    }

    #[test]
    fn test_open_menu_swallows_all_but_cancel() {
        let mut fx = Fixture::new();
        let root = fx.doc.root();
        let select = fx.doc.append(root, NodeSpec::new("button").accesskey("Enter"));
        let back = fx.doc.append(root, NodeSpec::new("button").accesskey("F2"));
        fx.registry.bind(LogicalKey::Csk, select);
        fx.registry.bind(LogicalKey::Rsk, back);
        fx.overlay.open(MenuModel::new(vec![MenuItem::new(
            "Reply",
            ItemHandle::Node(select),
        )]));

        assert_eq!(fx.press("Enter").unwrap(), Routed::Swallowed(LogicalKey::Csk));
        assert_eq!(fx.press("F2").unwrap(), Routed::Swallowed(LogicalKey::Rsk));
        assert_eq!(fx.press("x").unwrap(), Routed::Ignored);
        assert!(fx.overlay.is_open());

        assert_eq!(fx.press("F1").unwrap(), Routed::MenuClosed);
        assert!(!fx.overlay.is_open());
        assert!(fx.doc.activations().is_empty());
    }

    #[test]
    fn test_configured_cancel_key() {
        let mut fx = Fixture::new();
        fx.router = InputRouter::new(LogicalKey::Rsk);
        let root = fx.doc.root();
        let item = fx.doc.append(root, NodeSpec::new("button"));
        fx.overlay = OverlayController::new(
            LogicalKey::Rsk,
            "Back",
            crate::overlay::MenuPlacement::Append,
        );
        fx.overlay
            .open(MenuModel::new(vec![MenuItem::new("Reply", ItemHandle::Node(item))]));

        assert_eq!(fx.press("F1").unwrap(), Routed::Swallowed(LogicalKey::Lsk));
        assert_eq!(fx.press("F2").unwrap(), Routed::MenuClosed);
    }
}
