use std::sync::Arc;

use catalog_model::{CatalogItem, ItemId};

/// Single-slot focus for the quick view overlay.
///
/// Opening replaces the current focus; there is no stack.
#[derive(Debug, Clone, Default)]
pub struct QuickView {
    focus: Option<Arc<CatalogItem>>,
}

impl QuickView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus `item`, returning the item it replaced.
    pub fn open(&mut self, item: Arc<CatalogItem>) -> Option<Arc<CatalogItem>> {
        self.focus.replace(item)
    }

    /// Clear the focus. Returns whether anything was open.
    pub fn close(&mut self) -> bool {
        self.focus.take().is_some()
    }

    pub fn focused(&self) -> Option<&Arc<CatalogItem>> {
        self.focus.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.focus.is_some()
    }

    pub fn is_focused(&self, id: &ItemId) -> bool {
        self.focus.as_ref().is_some_and(|item| item.id() == id)
    }
}
