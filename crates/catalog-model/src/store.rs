use std::collections::HashMap;
use std::sync::Arc;

use crate::{CatalogItem, ItemId, ModelError};

/// Immutable, ordered collection of catalog items.
///
/// Store order is the "featured" order and the tie-breaker for every sort.
/// Items are shared behind `Arc` so result views and the quick view can hold
/// them without copying.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    items: Vec<Arc<CatalogItem>>,
    positions: HashMap<ItemId, usize>,
}

impl RecordStore {
    /// Build a store, rejecting duplicate ids.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, ModelError> {
        let mut positions = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if positions.insert(item.id().clone(), position).is_some() {
                return Err(ModelError::DuplicateItemId(item.id().to_string()));
            }
        }
        Ok(Self {
            items: items.into_iter().map(Arc::new).collect(),
            positions,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Arc<CatalogItem>> {
        self.positions.get(id).map(|&position| &self.items[position])
    }

    /// Look up an item by its raw id string. Invalid ids are simply absent.
    pub fn get_str(&self, id: &str) -> Option<&Arc<CatalogItem>> {
        ItemId::new(id).ok().and_then(|id| self.get(&id))
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.positions.contains_key(id)
    }

    /// Position of an item in store order.
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn items(&self) -> &[Arc<CatalogItem>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().map(AsRef::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> CatalogItem {
        CatalogItem::builder(id, id.to_uppercase())
            .price(10.0)
            .build()
            .unwrap()
    }

    #[test]
    fn preserves_order_and_indexes_ids() {
        let store = RecordStore::new(vec![item("b"), item("a"), item("c")]).unwrap();
        let order: Vec<&str> = store.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(store.position(&ItemId::new("a").unwrap()), Some(1));
        assert_eq!(store.get_str("c").map(|i| i.name()), Some("C"));
        assert!(store.get_str("missing").is_none());
        assert!(store.get_str("not valid").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = RecordStore::new(vec![item("a"), item("b"), item("a")]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateItemId("a".to_string()));
    }

    #[test]
    fn empty_store() {
        let store = RecordStore::empty();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }
}
