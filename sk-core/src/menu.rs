//! Options menu model - one value per overlay invocation

use std::fmt;
use std::rc::Rc;

use sk_tree::{NodeId, ViewTree, ICON_ATTR};

use crate::error::{Result, SoftKeyError};

/// What an activated item asks of the menu that showed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemOutcome {
    #[default]
    KeepOpen,
    Close,
}

/// What runs when a menu item is selected
#[derive(Clone)]
pub enum ItemHandle {
    /// Dispatch an activation on a view tree node; the menu stays open
    Node(NodeId),
    /// Host-supplied callback, invoked with no arguments
    Callback(Rc<dyn Fn() -> ItemOutcome>),
}

impl ItemHandle {
    /// Callback that leaves the menu open
    pub fn callback(f: impl Fn() + 'static) -> Self {
        ItemHandle::Callback(Rc::new(move || {
            f();
            ItemOutcome::KeepOpen
        }))
    }

    /// Callback whose return value decides whether the menu closes
    pub fn action(f: impl Fn() -> ItemOutcome + 'static) -> Self {
        ItemHandle::Callback(Rc::new(f))
    }

    pub(crate) fn invoke<T: ViewTree + ?Sized>(&self, tree: &mut T) -> ItemOutcome {
        match self {
            ItemHandle::Node(node) => {
                tree.activate(*node);
                ItemOutcome::KeepOpen
            }
            ItemHandle::Callback(f) => f(),
        }
    }
}

impl fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemHandle::Node(node) => f.debug_tuple("Node").field(node).finish(),
            ItemHandle::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// One selectable action
#[derive(Debug, Clone)]
pub struct MenuItem {
    label: String,
    icon: Option<String>,
    handle: ItemHandle,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, handle: ItemHandle) -> Self {
        Self {
            label: label.into(),
            icon: None,
            handle,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn handle(&self) -> &ItemHandle {
        &self.handle
    }

    /// Items without a label are never rendered
    pub fn is_renderable(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Menu kind recorded on the rendered form
pub const DEFAULT_MENU_KIND: &str = "action";

/// Ordered items plus an optional header
///
/// Built once, then only read; the overlay drops it on close.
#[derive(Debug, Clone)]
pub struct MenuModel {
    kind: String,
    header: Option<String>,
    items: Vec<MenuItem>,
}

impl MenuModel {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            kind: DEFAULT_MENU_KIND.to_string(),
            header: None,
            items,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Build the model for an overlay-trigger reference
    ///
    /// Fails with [`SoftKeyError::MenuNotFound`] if the collection does not exist.
    pub fn from_tree<T: ViewTree + ?Sized>(tree: &T, menu_ref: &str) -> Result<Self> {
        let source = tree
            .menu_source(menu_ref)
            .ok_or_else(|| SoftKeyError::MenuNotFound(menu_ref.to_string()))?;

        let items = source
            .items
            .into_iter()
            .map(|node| MenuItem {
                label: tree.text(node).unwrap_or_default(),
                icon: tree.attribute(node, ICON_ATTR).map(str::to_string),
                handle: ItemHandle::Node(node),
            })
            .collect();

        Ok(Self {
            kind: DEFAULT_MENU_KIND.to_string(),
            header: source.header,
            items,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
