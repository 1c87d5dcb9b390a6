//! Wishlist and compare sets.
//!
//! Both sets are cheap-clone handles: every clone observes the same members,
//! so a compare tray and an item card built from clones of one `CompareSet`
//! always agree. Each mutation takes a single write guard, which keeps the
//! compare capacity check and the insert atomic.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use catalog_model::{ItemId, RecordStore};
use tracing::{debug, warn};

/// Maximum number of items in the compare set.
pub const COMPARE_LIMIT: usize = 3;

/// Result of a toggle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleOutcome {
    /// The id was absent and is now a member.
    Added,
    /// The id was a member and has been removed.
    Removed,
    /// The id was absent and the set is full; nothing changed.
    Rejected,
}

impl ToggleOutcome {
    /// Membership of the toggled id after the call.
    pub fn is_member(self) -> bool {
        matches!(self, Self::Added)
    }

    pub fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Toggle/query contract shared by the wishlist and the compare set.
pub trait SelectionSet {
    fn toggle(&self, id: &ItemId) -> ToggleOutcome;

    fn contains(&self, id: &ItemId) -> bool;

    /// Remove every member. The only remove-all operation.
    fn clear(&self);

    /// Members in insertion order.
    fn ids(&self) -> Vec<ItemId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// SHARED MEMBERS
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Members(Arc<RwLock<Vec<ItemId>>>);

impl Members {
    fn read(&self) -> RwLockReadGuard<'_, Vec<ItemId>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ItemId>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove if present, otherwise add when `capacity` allows.
    fn toggle(&self, id: &ItemId, capacity: Option<usize>) -> ToggleOutcome {
        let mut members = self.write();
        if let Some(index) = members.iter().position(|member| member == id) {
            members.remove(index);
            return ToggleOutcome::Removed;
        }
        if capacity.is_some_and(|limit| members.len() >= limit) {
            return ToggleOutcome::Rejected;
        }
        members.push(id.clone());
        ToggleOutcome::Added
    }

    fn retain_known(&self, store: &RecordStore) -> usize {
        let mut members = self.write();
        let before = members.len();
        members.retain(|id| store.contains(id));
        before - members.len()
    }
}

// =============================================================================
// WISHLIST
// =============================================================================

/// Unbounded selection of items to revisit.
#[derive(Debug, Clone, Default)]
pub struct Wishlist {
    members: Members,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop ids that no longer exist in `store`. Returns how many were dropped.
    pub fn retain_known(&self, store: &RecordStore) -> usize {
        let dropped = self.members.retain_known(store);
        if dropped > 0 {
            warn!(dropped, "dropped stale wishlist ids");
        }
        dropped
    }
}

impl SelectionSet for Wishlist {
    fn toggle(&self, id: &ItemId) -> ToggleOutcome {
        let outcome = self.members.toggle(id, None);
        debug!(id = %id, ?outcome, "wishlist toggled");
        outcome
    }

    fn contains(&self, id: &ItemId) -> bool {
        self.members.read().contains(id)
    }

    fn clear(&self) {
        self.members.write().clear();
    }

    fn ids(&self) -> Vec<ItemId> {
        self.members.read().clone()
    }

    fn len(&self) -> usize {
        self.members.read().len()
    }
}

// =============================================================================
// COMPARE SET
// =============================================================================

/// Selection of at most [`COMPARE_LIMIT`] items for side-by-side viewing.
///
/// Adding to a full set is rejected, never an eviction.
#[derive(Debug, Clone, Default)]
pub struct CompareSet {
    members: Members,
}

impl CompareSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= COMPARE_LIMIT
    }

    /// Free slots left.
    pub fn remaining(&self) -> usize {
        COMPARE_LIMIT.saturating_sub(self.len())
    }

    /// Replace all members, keeping the first [`COMPARE_LIMIT`] distinct ids.
    pub fn replace(&self, ids: impl IntoIterator<Item = ItemId>) {
        let mut members = self.members.write();
        members.clear();
        for id in ids {
            if members.len() >= COMPARE_LIMIT {
                break;
            }
            if !members.contains(&id) {
                members.push(id);
            }
        }
    }

    /// Drop ids that no longer exist in `store`. Returns how many were dropped.
    pub fn retain_known(&self, store: &RecordStore) -> usize {
        let dropped = self.members.retain_known(store);
        if dropped > 0 {
            warn!(dropped, "dropped stale compare ids");
        }
        dropped
    }
}

impl SelectionSet for CompareSet {
    fn toggle(&self, id: &ItemId) -> ToggleOutcome {
        let outcome = self.members.toggle(id, Some(COMPARE_LIMIT));
        if outcome.is_rejected() {
            warn!(id = %id, limit = COMPARE_LIMIT, "compare set is full");
        } else {
            debug!(id = %id, ?outcome, "compare toggled");
        }
        outcome
    }

    fn contains(&self, id: &ItemId) -> bool {
        self.members.read().contains(id)
    }

    fn clear(&self) {
        self.members.write().clear();
    }

    fn ids(&self) -> Vec<ItemId> {
        self.members.read().clone()
    }

    fn len(&self) -> usize {
        self.members.read().len()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use catalog_model::CatalogItem;

    use super::*;

    fn id(value: &str) -> ItemId {
        ItemId::new(value).unwrap()
    }

    #[test]
    fn wishlist_toggle_is_idempotent_in_pairs() {
        let wishlist = Wishlist::new();
        assert_eq!(wishlist.toggle(&id("a")), ToggleOutcome::Added);
        assert!(wishlist.contains(&id("a")));
        assert_eq!(wishlist.toggle(&id("a")), ToggleOutcome::Removed);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn wishlist_has_no_upper_bound() {
        let wishlist = Wishlist::new();
        for n in 0..50 {
            assert!(wishlist.toggle(&id(&format!("item-{n}"))).is_member());
        }
        assert_eq!(wishlist.len(), 50);
    }

    #[test]
    fn compare_rejects_fourth_member() {
        let compare = CompareSet::new();
        for value in ["a", "b", "c"] {
            assert_eq!(compare.toggle(&id(value)), ToggleOutcome::Added);
        }
        assert!(compare.is_full());
        assert_eq!(compare.toggle(&id("d")), ToggleOutcome::Rejected);
        assert_eq!(compare.ids(), vec![id("a"), id("b"), id("c")]);

        // Removal still works at capacity and frees a slot.
        assert_eq!(compare.toggle(&id("b")), ToggleOutcome::Removed);
        assert_eq!(compare.remaining(), 1);
        assert_eq!(compare.toggle(&id("d")), ToggleOutcome::Added);
        assert_eq!(compare.ids(), vec![id("a"), id("c"), id("d")]);
    }

    #[test]
    fn clones_share_membership() {
        let tray = CompareSet::new();
        let card = tray.clone();
        card.toggle(&id("a"));
        assert!(tray.contains(&id("a")));
        tray.clear();
        assert!(card.is_empty());
    }

    #[test]
    fn concurrent_toggles_never_exceed_limit() {
        let compare = CompareSet::new();
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let compare = compare.clone();
                thread::spawn(move || compare.toggle(&id(&format!("item-{n}"))))
            })
            .collect();
        let outcomes: Vec<ToggleOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(compare.len(), COMPARE_LIMIT);
        assert_eq!(
            outcomes.iter().filter(|o| **o == ToggleOutcome::Added).count(),
            COMPARE_LIMIT
        );
        assert_eq!(
            outcomes.iter().filter(|o| o.is_rejected()).count(),
            8 - COMPARE_LIMIT
        );
    }

    #[test]
    fn replace_keeps_first_distinct_ids() {
        let compare = CompareSet::new();
        compare.replace([id("a"), id("a"), id("b"), id("c"), id("d")]);
        assert_eq!(compare.ids(), vec![id("a"), id("b"), id("c")]);
    }

    #[test]
    fn retain_known_drops_stale_ids() {
        let store = RecordStore::new(vec![
            CatalogItem::builder("a", "A").build().unwrap(),
        ])
        .unwrap();
        let wishlist = Wishlist::new();
        wishlist.toggle(&id("a"));
        wishlist.toggle(&id("gone"));
        assert_eq!(wishlist.retain_known(&store), 1);
        assert_eq!(wishlist.ids(), vec![id("a")]);
    }
}
