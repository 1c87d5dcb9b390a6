//! Browsing session - the state behind one catalog view.
//!
//! # Architecture
//!
//! The session owns the filter state, the reveal window and the quick view
//! focus, and holds handles to the wishlist and compare set (which may be
//! shared with other sessions or views). Every mutation goes through a
//! method here, which recomputes what depends on it and then notifies
//! subscribers:
//!
//! ```text
//! filter change ──► FilterEngine::filter_ids ──► RevealController::sync
//!                                              └► close quick view of a dropped item
//!                                              └► CatalogEvent::ResultsChanged
//! ```
//!
//! The filter engine is pure and cheap, so results are recomputed in full
//! after each change rather than maintained incrementally.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog_model::{
    CatalogItem, CatalogSchema, FacetName, ItemId, RecordStore, SelectionMode, SortKey,
};
use tracing::{debug, info};

use crate::compare_link::{decode_compare_param, encode_compare_param};
use crate::filter::{FilterEngine, FilterState, NumericRange};
use crate::observe::{Observers, SubscriptionId};
use crate::options::BrowseOptions;
use crate::quick_view::QuickView;
use crate::reveal::{RevealController, RevealPhase};
use crate::selection::{CompareSet, SelectionSet, ToggleOutcome, Wishlist};

/// How a selection set changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// One id was toggled; `Rejected` outcomes are reported too so the view
    /// can show a "compare is full" hint.
    Toggled { id: ItemId, outcome: ToggleOutcome },
    /// Every member was removed.
    Cleared,
    /// Members were replaced wholesale (compare link applied).
    Replaced { len: usize },
}

/// Published to subscribers after each state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// The filter state changed and results were recomputed. `reset` is set
    /// when the result sequence differs and the reveal window went back to
    /// one page.
    ResultsChanged {
        total: usize,
        visible: usize,
        reset: bool,
    },
    /// More results became visible.
    RevealAdvanced { total: usize, visible: usize },
    WishlistChanged(SelectionChange),
    CompareChanged(SelectionChange),
    /// Quick view focus moved to an item or was cleared.
    FocusChanged(Option<ItemId>),
}

#[derive(Debug)]
pub struct CatalogSession {
    store: Arc<RecordStore>,
    engine: FilterEngine,
    filters: FilterState,
    results: Vec<ItemId>,
    reveal: RevealController,
    wishlist: Wishlist,
    compare: CompareSet,
    quick_view: QuickView,
    observers: Observers<CatalogEvent>,
}

impl CatalogSession {
    /// Mount a session with fresh, empty selection sets.
    pub fn new(store: Arc<RecordStore>, engine: FilterEngine, options: BrowseOptions) -> Self {
        Self::with_selections(store, engine, options, Wishlist::new(), CompareSet::new())
    }

    /// Mount a session over existing selection handles. Ids the store does
    /// not know are dropped from both sets.
    pub fn with_selections(
        store: Arc<RecordStore>,
        engine: FilterEngine,
        options: BrowseOptions,
        wishlist: Wishlist,
        compare: CompareSet,
    ) -> Self {
        wishlist.retain_known(&store);
        compare.retain_known(&store);

        let filters = FilterState::new(options.default_sort);
        let results = engine.filter_ids(&store, &filters);
        let mut reveal = RevealController::new(options.page_size);
        reveal.sync(&results);
        info!(
            items = store.len(),
            page_size = options.page_size.get(),
            sort = %options.default_sort,
            "catalog session mounted"
        );

        Self {
            store,
            engine,
            filters,
            results,
            reveal,
            wishlist,
            compare,
            quick_view: QuickView::new(),
            observers: Observers::new(),
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn schema(&self) -> &CatalogSchema {
        self.engine.schema()
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Apply `change` to the filter state, recompute results and notify
    /// subscribers. Returns whether the result sequence changed.
    pub fn update_filters(&mut self, change: impl FnOnce(&mut FilterState)) -> bool {
        change(&mut self.filters);
        self.refresh()
    }

    pub fn set_query(&mut self, query: &str) -> bool {
        self.update_filters(|filters| filters.set_query(query))
    }

    /// Click on a facet chip: replaces the value of a single-select facet,
    /// toggles the value of a multi-select facet.
    pub fn choose(&mut self, facet: &FacetName, value: &str) -> bool {
        let mode = self.selection_mode(facet);
        let facet = facet.clone();
        self.update_filters(|filters| match mode {
            SelectionMode::Single => filters.select(facet, value),
            SelectionMode::Multi => {
                filters.toggle_value(facet, value);
            }
        })
    }

    /// Like [`choose`](Self::choose), but a multi-select value that is
    /// already selected stays selected. Used for filters given up front.
    pub fn require(&mut self, facet: &FacetName, value: &str) -> bool {
        let mode = self.selection_mode(facet);
        let facet = facet.clone();
        self.update_filters(|filters| match mode {
            SelectionMode::Single => filters.select(facet, value),
            SelectionMode::Multi => filters.include_value(facet, value),
        })
    }

    pub fn select_any(&mut self, facet: &FacetName) -> bool {
        self.update_filters(|filters| filters.select_any(facet))
    }

    pub fn set_range(&mut self, facet: &FacetName, range: NumericRange) -> bool {
        let facet = facet.clone();
        self.update_filters(|filters| filters.set_range(facet, range))
    }

    pub fn set_sort(&mut self, sort: SortKey) -> bool {
        self.update_filters(|filters| filters.set_sort(sort))
    }

    /// "Clear filters": every constraint removed, default sort restored.
    pub fn clear_filters(&mut self) -> bool {
        self.update_filters(FilterState::reset)
    }

    fn selection_mode(&self, facet: &FacetName) -> SelectionMode {
        self.schema()
            .facet(facet)
            .map(|definition| definition.selection)
            .unwrap_or_default()
    }

    /// Tag counts for one facet with its own constraint relaxed.
    pub fn facet_counts(&self, facet: &FacetName) -> BTreeMap<String, usize> {
        self.engine.facet_counts(&self.store, &self.filters, facet)
    }

    fn refresh(&mut self) -> bool {
        self.results = self.engine.filter_ids(&self.store, &self.filters);
        let reset = self.reveal.sync(&self.results);
        if reset {
            self.close_dropped_focus();
        }
        self.observers.notify(&CatalogEvent::ResultsChanged {
            total: self.total(),
            visible: self.visible_ids().len(),
            reset,
        });
        reset
    }

    /// The focused item stays open while it is anywhere in the results, even
    /// past the reveal window.
    fn close_dropped_focus(&mut self) {
        let dropped = self
            .quick_view
            .focused()
            .is_some_and(|item| !self.results.contains(item.id()));
        if dropped {
            debug!("quick view item left the results");
            self.close_quick_view();
        }
    }

    // =========================================================================
    // Results and reveal window
    // =========================================================================

    pub fn result_ids(&self) -> &[ItemId] {
        &self.results
    }

    pub fn results(&self) -> Vec<&Arc<CatalogItem>> {
        self.resolve(&self.results)
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn visible_ids(&self) -> &[ItemId] {
        self.reveal.visible_slice(&self.results)
    }

    pub fn visible(&self) -> Vec<&Arc<CatalogItem>> {
        self.resolve(self.visible_ids())
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase(self.total())
    }

    /// Reveal the next page. Returns whether anything new became visible.
    pub fn load_more(&mut self) -> bool {
        let total = self.total();
        if !self.reveal.load_more(total) {
            return false;
        }
        self.observers.notify(&CatalogEvent::RevealAdvanced {
            total,
            visible: self.reveal.visible_len(total),
        });
        true
    }

    fn resolve(&self, ids: &[ItemId]) -> Vec<&Arc<CatalogItem>> {
        ids.iter().filter_map(|id| self.store.get(id)).collect()
    }

    // =========================================================================
    // Selection sets
    // =========================================================================

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn compare(&self) -> &CompareSet {
        &self.compare
    }

    /// Toggle an item on the wishlist. `None` when the store does not know
    /// the id.
    pub fn toggle_wishlist(&self, id: &ItemId) -> Option<ToggleOutcome> {
        if !self.store.contains(id) {
            debug!(id = %id, "ignoring wishlist toggle for unknown item");
            return None;
        }
        let outcome = self.wishlist.toggle(id);
        self.observers
            .notify(&CatalogEvent::WishlistChanged(SelectionChange::Toggled {
                id: id.clone(),
                outcome,
            }));
        Some(outcome)
    }

    /// Toggle an item in the compare set. `None` when the store does not
    /// know the id; `Some(Rejected)` when the set is full.
    pub fn toggle_compare(&self, id: &ItemId) -> Option<ToggleOutcome> {
        if !self.store.contains(id) {
            debug!(id = %id, "ignoring compare toggle for unknown item");
            return None;
        }
        let outcome = self.compare.toggle(id);
        self.observers
            .notify(&CatalogEvent::CompareChanged(SelectionChange::Toggled {
                id: id.clone(),
                outcome,
            }));
        Some(outcome)
    }

    pub fn clear_wishlist(&self) {
        self.wishlist.clear();
        self.observers
            .notify(&CatalogEvent::WishlistChanged(SelectionChange::Cleared));
    }

    pub fn clear_compare(&self) {
        self.compare.clear();
        self.observers
            .notify(&CatalogEvent::CompareChanged(SelectionChange::Cleared));
    }

    pub fn wishlist_items(&self) -> Vec<&Arc<CatalogItem>> {
        self.resolve(&self.wishlist.ids())
    }

    pub fn compared_items(&self) -> Vec<&Arc<CatalogItem>> {
        self.resolve(&self.compare.ids())
    }

    /// `compare=<ids>` for the current compare set.
    pub fn compare_link(&self) -> String {
        encode_compare_param(&self.compare)
    }

    /// Replace the compare set with the ids of a compare link. Unknown ids
    /// are dropped silently. Returns the resulting set size.
    pub fn apply_compare_link(&self, raw: &str) -> usize {
        let ids = decode_compare_param(raw, &self.store);
        self.compare.replace(ids);
        let len = self.compare.len();
        self.observers
            .notify(&CatalogEvent::CompareChanged(SelectionChange::Replaced {
                len,
            }));
        len
    }

    // =========================================================================
    // Quick view
    // =========================================================================

    /// Focus an item in the quick view. Returns `false` for unknown ids.
    pub fn inspect(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.store.get(id) else {
            debug!(id = %id, "ignoring quick view for unknown item");
            return false;
        };
        self.quick_view.open(Arc::clone(item));
        self.observers
            .notify(&CatalogEvent::FocusChanged(Some(id.clone())));
        true
    }

    /// Close the quick view. Returns whether it was open.
    pub fn close_quick_view(&mut self) -> bool {
        if !self.quick_view.close() {
            return false;
        }
        self.observers.notify(&CatalogEvent::FocusChanged(None));
        true
    }

    pub fn quick_view(&self) -> Option<&Arc<CatalogItem>> {
        self.quick_view.focused()
    }

    // =========================================================================
    // Observers
    // =========================================================================

    pub fn subscribe(
        &mut self,
        callback: impl Fn(&CatalogEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}
