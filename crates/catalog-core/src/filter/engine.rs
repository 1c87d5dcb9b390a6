//! Filter engine: `(RecordStore, FilterState) -> ordered results`.
//!
//! The engine is pure. Facets are evaluated in a fixed order (categorical,
//! numeric ranges, free-text query) and the survivors are stably sorted by
//! the active sort key, so store order breaks every tie.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use catalog_model::{CatalogItem, CatalogSchema, FacetName, ItemId, RecordStore, SortKey};
use tracing::debug;

use super::state::{FilterState, NumericRange};

/// Filters and sorts a record store.
///
/// Carries the catalog schema because the broadening rule of a facet (for
/// example "unisex satisfies any gender") is defined per facet there.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    schema: CatalogSchema,
}

impl FilterEngine {
    pub fn new(schema: CatalogSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    /// Items matching `state`, ordered by its sort key.
    ///
    /// An empty store or a combination that matches nothing yields an empty
    /// vector.
    pub fn filter<'a>(
        &self,
        store: &'a RecordStore,
        state: &FilterState,
    ) -> Vec<&'a CatalogItem> {
        let query = state.normalized_query();
        let mut matched: Vec<&CatalogItem> = store
            .iter()
            .filter(|item| self.matches_with_query(item, state, query.as_deref()))
            .collect();
        sort_items(&mut matched, state.sort());
        debug!(
            total = store.len(),
            matched = matched.len(),
            sort = %state.sort(),
            constraints = state.constraint_count(),
            "filtered catalog"
        );
        matched
    }

    /// Ids of [`FilterEngine::filter`]'s result, in result order.
    pub fn filter_ids(&self, store: &RecordStore, state: &FilterState) -> Vec<ItemId> {
        self.filter(store, state)
            .into_iter()
            .map(|item| item.id().clone())
            .collect()
    }

    /// Whether a single item passes every active constraint.
    pub fn matches(&self, item: &CatalogItem, state: &FilterState) -> bool {
        self.matches_with_query(item, state, state.normalized_query().as_deref())
    }

    /// Per-tag counts for one facet, computed with that facet's own
    /// constraint relaxed and every other constraint applied.
    pub fn facet_counts(
        &self,
        store: &RecordStore,
        state: &FilterState,
        facet: &FacetName,
    ) -> BTreeMap<String, usize> {
        let mut relaxed = state.clone();
        relaxed.select_any(facet);
        let query = relaxed.normalized_query();

        let mut counts = BTreeMap::new();
        for item in store
            .iter()
            .filter(|item| self.matches_with_query(item, &relaxed, query.as_deref()))
        {
            for tag in item.tags(facet).into_iter().flatten() {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    fn matches_with_query(
        &self,
        item: &CatalogItem,
        state: &FilterState,
        query: Option<&str>,
    ) -> bool {
        self.matches_categorical(item, state)
            && matches_ranges(item, state)
            && query.is_none_or(|needle| matches_query(item, needle))
    }

    fn matches_categorical(&self, item: &CatalogItem, state: &FilterState) -> bool {
        state.selections().all(|(facet, selection)| {
            let Some(tags) = item.tags(facet) else {
                return false;
            };
            if tags.iter().any(|tag| selection.contains(tag)) {
                return true;
            }
            self.schema.facet(facet).is_some_and(|definition| {
                tags.iter().any(|tag| definition.is_broadening(tag))
            })
        })
    }
}

/// Filter with no broadening rules.
pub fn filter<'a>(store: &'a RecordStore, state: &FilterState) -> Vec<&'a CatalogItem> {
    FilterEngine::default().filter(store, state)
}

fn matches_ranges(item: &CatalogItem, state: &FilterState) -> bool {
    state
        .ranges()
        .all(|(facet, range)| matches_range(item.numeric_value(facet), range))
}

fn matches_range(value: Option<f64>, range: &NumericRange) -> bool {
    match value {
        Some(value) => range.contains(value),
        None => range.is_unbounded(),
    }
}

/// Whole-query substring match against the search text or any token.
///
/// `needle` is already trimmed and lower-cased. Multi-word queries are not
/// split into terms.
fn matches_query(item: &CatalogItem, needle: &str) -> bool {
    item.searchable_text().contains(needle)
        || item
            .search_tokens()
            .any(|token| token.to_lowercase().contains(needle))
}

fn sort_items(items: &mut [&CatalogItem], key: SortKey) {
    match key {
        SortKey::Featured => {}
        SortKey::PriceHighToLow => items.sort_by(|a, b| b.price().total_cmp(&a.price())),
        SortKey::PriceLowToHigh => items.sort_by(|a, b| a.price().total_cmp(&b.price())),
        SortKey::Newest => items.sort_by_key(|item| !item.is_new()),
        SortKey::Largest => items.sort_by(|a, b| {
            descending_present_first(a.size(), b.size(), |x, y| x.total_cmp(y))
        }),
        SortKey::RecentlyListed => items.sort_by(|a, b| {
            descending_present_first(a.listed_on(), b.listed_on(), Ord::cmp)
        }),
    }
}

/// Larger values first; items without a value after every item with one.
fn descending_present_first<T>(
    a: Option<T>,
    b: Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&b, &a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use catalog_model::{FacetDefinition, SelectionMode};

    use super::*;

    fn facet(name: &str) -> FacetName {
        FacetName::new(name).unwrap()
    }

    fn store() -> RecordStore {
        RecordStore::new(vec![
            CatalogItem::builder("sauvage", "Sauvage")
                .brand("Dior")
                .notable("Bergamot")
                .tag("gender", "men")
                .tag("season", "summer")
                .price(155.0)
                .size(100.0)
                .build()
                .unwrap(),
            CatalogItem::builder("santal-33", "Santal 33")
                .brand("Le Labo")
                .notable("Sandalwood")
                .tag("gender", "unisex")
                .tag("season", "fall")
                .price(310.0)
                .new_arrival(true)
                .build()
                .unwrap(),
            CatalogItem::builder("la-vie-est-belle", "La Vie Est Belle")
                .brand("Lancome")
                .notable("Iris")
                .tag("gender", "women")
                .tag("season", "spring")
                .tag("season", "summer")
                .price(155.0)
                .size(75.0)
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    fn ids(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn broadening_is_explicit_per_facet() {
        let store = store();
        let mut state = FilterState::default();
        state.select(facet("gender"), "men");

        assert_eq!(ids(&filter(&store, &state)), vec!["sauvage"]);

        let engine = FilterEngine::new(CatalogSchema::new().with_facet(
            FacetDefinition::new(facet("gender"), SelectionMode::Single).broadened_by("unisex"),
        ));
        assert_eq!(
            ids(&engine.filter(&store, &state)),
            vec!["sauvage", "santal-33"]
        );
    }

    #[test]
    fn multi_select_matches_any_selected_value() {
        let store = store();
        let mut state = FilterState::default();
        state.toggle_value(facet("season"), "spring");
        state.toggle_value(facet("season"), "fall");
        assert_eq!(
            ids(&filter(&store, &state)),
            vec!["santal-33", "la-vie-est-belle"]
        );
    }

    #[test]
    fn missing_numeric_attribute_fails_a_bounded_range() {
        let store = store();
        let mut state = FilterState::default();
        state.set_range(facet("size"), NumericRange::at_least(50.0));
        assert_eq!(
            ids(&filter(&store, &state)),
            vec!["sauvage", "la-vie-est-belle"]
        );
    }

    #[test]
    fn query_matches_whole_substring_case_insensitively() {
        let store = store();
        let mut state = FilterState::default();
        state.set_query("LE LABO");
        assert_eq!(ids(&filter(&store, &state)), vec!["santal-33"]);

        // The whole query must appear contiguously; word order matters.
        state.set_query("labo sandal");
        assert_eq!(ids(&filter(&store, &state)), vec!["santal-33"]);
        state.set_query("sandal labo");
        assert!(filter(&store, &state).is_empty());
    }

    #[test]
    fn sorts_are_stable() {
        let store = store();
        let mut state = FilterState::default();

        state.set_sort(SortKey::PriceHighToLow);
        assert_eq!(
            ids(&filter(&store, &state)),
            vec!["santal-33", "sauvage", "la-vie-est-belle"]
        );
        state.set_sort(SortKey::PriceLowToHigh);
        assert_eq!(
            ids(&filter(&store, &state)),
            vec!["sauvage", "la-vie-est-belle", "santal-33"]
        );
        state.set_sort(SortKey::Newest);
        assert_eq!(
            ids(&filter(&store, &state)),
            vec!["santal-33", "sauvage", "la-vie-est-belle"]
        );
        state.set_sort(SortKey::Largest);
        assert_eq!(
            ids(&filter(&store, &state)),
            vec!["sauvage", "la-vie-est-belle", "santal-33"]
        );
    }

    #[test]
    fn facet_counts_relax_their_own_facet() {
        let store = store();
        let mut state = FilterState::default();
        state.select(facet("gender"), "men");
        state.set_range(facet("price"), NumericRange::at_most(200.0));

        let counts = FilterEngine::default().facet_counts(&store, &state, &facet("gender"));
        assert_eq!(counts.get("men"), Some(&1));
        assert_eq!(counts.get("women"), Some(&1));
        assert_eq!(counts.get("unisex"), None);
    }

    #[test]
    fn empty_store_yields_empty_result() {
        let store = RecordStore::empty();
        let mut state = FilterState::default();
        state.set_query("anything");
        assert!(filter(&store, &state).is_empty());
    }
}
