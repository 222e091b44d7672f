//! Modal options menu state machine
//!
//! `Closed -> Open` on [`OverlayController::open`], `Open -> Closed` on
//! [`OverlayController::close`]. Opening while open replaces the current
//! menu; menus never stack.

use sk_tree::ViewTree;
use tracing::{debug, info};

use crate::error::{Result, SoftKeyError};
use crate::keys::LogicalKey;
use crate::menu::{ItemHandle, ItemOutcome, MenuModel};

/// Localization id carried by the cancel row
pub const CANCEL_L10N_ID: &str = "cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

/// Where the menu layer sits relative to the soft-key bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPlacement {
    /// Inserted after the proxy container, drawn over it
    #[default]
    Append,
    /// Inserted before the proxy container, which stays visible
    Prepend,
}

impl MenuPlacement {
    pub fn name(self) -> &'static str {
        match self {
            MenuPlacement::Append => "append",
            MenuPlacement::Prepend => "prepend",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Some(MenuPlacement::Append),
            "prepend" => Some(MenuPlacement::Prepend),
            _ => None,
        }
    }
}

/// Trailing row closing the menu, bound to the cancel key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRow {
    key: LogicalKey,
    label: String,
}

impl CancelRow {
    pub fn key(&self) -> LogicalKey {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn l10n_id(&self) -> &'static str {
        CANCEL_L10N_ID
    }
}

/// An actionable row of the rendered menu
#[derive(Debug, Clone)]
pub struct MenuRow {
    label: String,
    icon: Option<String>,
    handle: ItemHandle,
}

impl MenuRow {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

/// The rendered menu, owned by the controller while open
#[derive(Debug)]
pub struct OverlayForm {
    kind: String,
    header: Option<String>,
    rows: Vec<MenuRow>,
    item_count: usize,
    cancel: CancelRow,
    visible: bool,
    selected: usize,
}

impl OverlayForm {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn role(&self) -> &'static str {
        "dialog"
    }

    pub fn subtype(&self) -> &'static str {
        "menu"
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[MenuRow] {
        &self.rows
    }

    /// Items in the model, rendered or not
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn cancel(&self) -> &CancelRow {
        &self.cancel
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Highlighted row, if there are any rows
    pub fn selected(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.selected)
    }
}

/// A row that was activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedItem {
    pub index: usize,
    pub label: String,
    /// What the item's handle returned; `Close` has already closed the menu
    pub outcome: ItemOutcome,
}

/// Owner of the single overlay slot
#[derive(Debug)]
pub struct OverlayController {
    cancel_key: LogicalKey,
    cancel_label: String,
    placement: MenuPlacement,
    form: Option<OverlayForm>,
    model: Option<MenuModel>,
}

impl OverlayController {
    pub fn new(cancel_key: LogicalKey, cancel_label: impl Into<String>, placement: MenuPlacement) -> Self {
        Self {
            cancel_key,
            cancel_label: cancel_label.into(),
            placement,
            form: None,
            model: None,
        }
    }

    pub fn state(&self) -> OverlayState {
        if self.form.is_some() {
            OverlayState::Open
        } else {
            OverlayState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&OverlayForm> {
        self.form.as_ref()
    }

    /// Model the open menu was built from
    pub fn model(&self) -> Option<&MenuModel> {
        self.model.as_ref()
    }

    pub fn placement(&self) -> MenuPlacement {
        self.placement
    }

    pub fn cancel_key(&self) -> LogicalKey {
        self.cancel_key
    }

    /// Activation handlers attached to the open form (rows plus cancel row)
    pub fn listener_count(&self) -> usize {
        self.form.as_ref().map_or(0, |f| f.rows.len() + 1)
    }

    /// Show `model`; returns false (and changes nothing) when it has no items
    pub fn open(&mut self, model: MenuModel) -> bool {
        if model.is_empty() {
            debug!("ignoring options menu without items");
            return false;
        }

        if self.form.is_some() {
            debug!("replacing open options menu");
            self.release();
        }

        // Attach fully populated, then mark visible so nothing partial is shown.
        self.form = Some(self.render(&model));
        if let Some(form) = self.form.as_mut() {
            form.visible = true;
            info!(
                rows = form.rows.len(),
                header = form.header.as_deref().unwrap_or(""),
                "options menu opened"
            );
        }
        self.model = Some(model);
        true
    }

    /// Close the open menu; closing when nothing is open is a caller error
    pub fn close(&mut self) -> Result<()> {
        if self.form.is_none() {
            return Err(SoftKeyError::OverlayNotOpen);
        }
        self.release();
        info!("options menu closed");
        Ok(())
    }

    /// Activate row `index`; out-of-range indexes are ignored
    ///
    /// The menu stays open unless the item's handle returns
    /// [`ItemOutcome::Close`].
    pub fn activate<T: ViewTree + ?Sized>(
        &mut self,
        tree: &mut T,
        index: usize,
    ) -> Result<Option<ActivatedItem>> {
        let form = self.form.as_mut().ok_or(SoftKeyError::OverlayNotOpen)?;
        if index >= form.rows.len() {
            return Ok(None);
        }

        form.selected = index;
        let row = &form.rows[index];
        debug!(index, label = %row.label, "options menu item activated");
        let outcome = row.handle.invoke(tree);
        let activated = ActivatedItem {
            index,
            label: row.label.clone(),
            outcome,
        };

        if outcome == ItemOutcome::Close {
            self.close()?;
        }
        Ok(Some(activated))
    }

    pub fn activate_selected<T: ViewTree + ?Sized>(
        &mut self,
        tree: &mut T,
    ) -> Result<Option<ActivatedItem>> {
        let index = self
            .form
            .as_ref()
            .ok_or(SoftKeyError::OverlayNotOpen)?
            .selected;
        self.activate(tree, index)
    }

    /// Activate the cancel row (touch path); same as the cancel key
    pub fn activate_cancel(&mut self) -> Result<()> {
        self.close()
    }

    pub fn select_next(&mut self) {
        if let Some(form) = self.form.as_mut().filter(|f| !f.rows.is_empty()) {
            form.selected = (form.selected + 1) % form.rows.len();
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(form) = self.form.as_mut().filter(|f| !f.rows.is_empty()) {
            form.selected = form
                .selected
                .checked_sub(1)
                .unwrap_or(form.rows.len() - 1);
        }
    }

    /// Drop any open menu without the closed-state check (used on destroy)
    pub fn teardown(&mut self) {
        if self.form.is_some() {
            debug!("options menu torn down");
        }
        self.release();
    }

    fn release(&mut self) {
        self.form = None;
        self.model = None;
    }

    fn render(&self, model: &MenuModel) -> OverlayForm {
        let header = model
            .header()
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        let rows = model
            .items()
            .iter()
            .filter(|item| item.is_renderable())
            .map(|item| MenuRow {
                label: item.label().to_string(),
                icon: item.icon().map(str::to_string),
                handle: item.handle().clone(),
            })
            .collect();

        OverlayForm {
            kind: model.kind().to_string(),
            header,
            rows,
            item_count: model.items().len(),
            cancel: CancelRow {
                key: self.cancel_key,
                label: self.cancel_label.clone(),
            },
            visible: false,
            selected: 0,
        }
    }
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(LogicalKey::Lsk, "Cancel", MenuPlacement::default())
    }
}
