//! Tests for browsing sessions over a small fragrance catalog.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use catalog_core::{
    BrowseOptions, CatalogEvent, CatalogSession, FilterEngine, FilterState, NumericRange,
    RevealPhase, SelectionChange, SelectionSet, ToggleOutcome, Wishlist, filter,
};
use catalog_model::{
    CatalogItem, CatalogSchema, FacetDefinition, FacetName, ItemId, RecordStore, SelectionMode,
    SortKey,
};

fn facet(name: &str) -> FacetName {
    FacetName::new(name).unwrap()
}

fn id(value: &str) -> ItemId {
    ItemId::new(value).unwrap()
}

fn fragrance(id: &str, name: &str, gender: &str, price: f64) -> CatalogItem {
    CatalogItem::builder(id, name)
        .brand("House")
        .tag("gender", gender)
        .price(price)
        .build()
        .unwrap()
}

fn numbered_store(count: usize) -> Arc<RecordStore> {
    let items = (0..count)
        .map(|n| fragrance(&format!("item-{n}"), &format!("Item {n}"), "women", n as f64))
        .collect();
    Arc::new(RecordStore::new(items).unwrap())
}

fn fragrance_store() -> Arc<RecordStore> {
    let aventus = CatalogItem::builder("aventus", "Aventus")
        .brand("Creed")
        .notable("Pineapple")
        .notable("Bergamot")
        .tag("gender", "men")
        .tag("season", "spring")
        .price(500.0)
        .build()
        .unwrap();
    Arc::new(
        RecordStore::new(vec![
            aventus,
            fragrance("santal-33", "Santal 33", "unisex", 310.0),
            fragrance("black-opium", "Black Opium", "women", 135.0),
            fragrance("sauvage", "Sauvage", "men", 120.0),
        ])
        .unwrap(),
    )
}

fn schema() -> CatalogSchema {
    CatalogSchema::new()
        .with_facet(
            FacetDefinition::new(facet("gender"), SelectionMode::Single).broadened_by("unisex"),
        )
        .with_facet(FacetDefinition::new(facet("season"), SelectionMode::Multi))
}

fn session(store: Arc<RecordStore>, page_size: usize) -> CatalogSession {
    let options =
        BrowseOptions::default().with_page_size(NonZeroUsize::new(page_size).unwrap());
    CatalogSession::new(store, FilterEngine::new(schema()), options)
}

fn strs(ids: &[ItemId]) -> Vec<&str> {
    ids.iter().map(ItemId::as_str).collect()
}

#[test]
fn empty_query_returns_every_item() {
    let store = fragrance_store();
    let mut state = FilterState::default();
    state.set_query("");
    assert_eq!(filter(&store, &state).len(), store.len());
}

#[test]
fn partial_note_matches_searchable_text() {
    let store = fragrance_store();
    let mut state = FilterState::default();
    state.set_query("bergam");
    let ids: Vec<&str> = filter(&store, &state)
        .iter()
        .map(|item| item.id().as_str())
        .collect();
    assert_eq!(ids, vec!["aventus"]);
}

#[test]
fn price_range_is_inclusive_and_excludes_outside_items() {
    let mut session = session(fragrance_store(), 6);
    let price = facet("price");

    session.set_range(&price, NumericRange::between(0.0, 400.0));
    assert!(!session.result_ids().contains(&id("aventus")));

    session.set_range(&price, NumericRange::between(0.0, 600.0));
    assert!(session.result_ids().contains(&id("aventus")));

    session.set_range(&price, NumericRange::between(500.0, 500.0));
    assert_eq!(strs(session.result_ids()), vec!["aventus"]);
}

#[test]
fn compare_overflow_rejects_the_fourth_item() {
    let session = session(fragrance_store(), 6);
    let outcomes: Vec<_> = ["aventus", "santal-33", "black-opium", "sauvage"]
        .into_iter()
        .map(|value| session.toggle_compare(&id(value)).unwrap())
        .collect();

    assert_eq!(
        outcomes,
        vec![
            ToggleOutcome::Added,
            ToggleOutcome::Added,
            ToggleOutcome::Added,
            ToggleOutcome::Rejected,
        ]
    );
    assert_eq!(
        strs(&session.compare().ids()),
        vec!["aventus", "santal-33", "black-opium"]
    );
}

#[test]
fn reveal_resets_when_results_change() {
    let mut session = session(numbered_store(20), 6);
    assert_eq!(session.visible_ids().len(), 6);

    session.load_more();
    assert_eq!(session.visible_ids().len(), 12);

    // Prices are 0..20, so this keeps nine items.
    session.set_range(&facet("price"), NumericRange::at_most(8.0));
    assert_eq!(session.total(), 9);
    assert_eq!(session.visible_ids().len(), 6);
    assert_eq!(session.reveal_phase(), RevealPhase::Partial);

    assert!(session.load_more());
    assert_eq!(session.visible_ids().len(), 9);
    assert_eq!(session.reveal_phase(), RevealPhase::Complete);
    assert!(!session.load_more());
}

#[test]
fn resorting_the_same_members_also_resets_reveal() {
    let mut session = session(numbered_store(10), 3);
    session.load_more();
    assert_eq!(session.visible_ids().len(), 6);

    assert!(session.set_sort(SortKey::PriceHighToLow));
    assert_eq!(session.visible_ids().len(), 3);
    assert_eq!(strs(session.visible_ids()), vec!["item-9", "item-8", "item-7"]);
}

#[test]
fn unchanged_results_keep_the_reveal_window() {
    let mut session = session(numbered_store(10), 3);
    session.load_more();

    // Every item is sold for women, so the sequence is unchanged.
    assert!(!session.choose(&facet("gender"), "women"));
    assert_eq!(session.visible_ids().len(), 6);
}

#[test]
fn single_select_facet_replaces_and_broadens() {
    let mut session = session(fragrance_store(), 6);
    let gender = facet("gender");

    session.choose(&gender, "women");
    assert_eq!(strs(session.result_ids()), vec!["santal-33", "black-opium"]);

    session.choose(&gender, "men");
    assert_eq!(
        strs(session.result_ids()),
        vec!["aventus", "santal-33", "sauvage"]
    );

    session.select_any(&gender);
    assert_eq!(session.total(), 4);
}

#[test]
fn multi_select_facet_toggles_values() {
    let mut session = session(fragrance_store(), 6);
    let season = facet("season");

    session.choose(&season, "spring");
    assert_eq!(strs(session.result_ids()), vec!["aventus"]);

    session.choose(&season, "spring");
    assert_eq!(session.total(), 4);
}

#[test]
fn repeated_required_values_stay_selected() {
    let mut session = session(fragrance_store(), 6);
    let season = facet("season");

    session.require(&season, "spring");
    session.require(&season, "Spring");
    assert_eq!(strs(session.result_ids()), vec!["aventus"]);

    session.require(&facet("gender"), "men");
    session.require(&facet("gender"), "men");
    assert_eq!(strs(session.result_ids()), vec!["aventus"]);
}

#[test]
fn clear_filters_restores_the_default_sort() {
    let options = BrowseOptions::default().with_default_sort(SortKey::PriceLowToHigh);
    let mut session = CatalogSession::new(fragrance_store(), FilterEngine::new(schema()), options);
    assert_eq!(session.result_ids()[0].as_str(), "sauvage");

    session.set_sort(SortKey::PriceHighToLow);
    session.set_query("santal");
    assert_eq!(session.total(), 1);

    session.clear_filters();
    assert!(session.filters().is_unconstrained());
    assert_eq!(session.filters().sort(), SortKey::PriceLowToHigh);
    assert_eq!(session.total(), 4);
}

#[test]
fn selections_ignore_unknown_ids() {
    let session = session(fragrance_store(), 6);
    assert_eq!(session.toggle_wishlist(&id("discontinued")), None);
    assert_eq!(session.toggle_compare(&id("discontinued")), None);
    assert!(session.wishlist().is_empty());
}

#[test]
fn shared_wishlist_is_seen_by_every_session() {
    let store = fragrance_store();
    let wishlist = Wishlist::new();
    let first = CatalogSession::with_selections(
        Arc::clone(&store),
        FilterEngine::new(schema()),
        BrowseOptions::default(),
        wishlist.clone(),
        Default::default(),
    );
    let second = CatalogSession::with_selections(
        store,
        FilterEngine::default(),
        BrowseOptions::default(),
        wishlist.clone(),
        Default::default(),
    );

    first.toggle_wishlist(&id("sauvage"));
    assert!(second.wishlist().contains(&id("sauvage")));
    assert_eq!(wishlist.len(), 1);

    second.clear_wishlist();
    assert!(first.wishlist().is_empty());
}

#[test]
fn stale_selection_ids_are_dropped_on_mount() {
    let wishlist = Wishlist::new();
    wishlist.toggle(&id("sauvage"));
    wishlist.toggle(&id("discontinued"));

    let session = CatalogSession::with_selections(
        fragrance_store(),
        FilterEngine::default(),
        BrowseOptions::default(),
        wishlist,
        Default::default(),
    );
    assert_eq!(strs(&session.wishlist().ids()), vec!["sauvage"]);
}

#[test]
fn compare_link_round_trips_through_a_session() {
    let source = session(fragrance_store(), 6);
    source.toggle_compare(&id("sauvage"));
    source.toggle_compare(&id("aventus"));
    let link = source.compare_link();
    assert_eq!(link, "compare=sauvage,aventus");

    let target = session(fragrance_store(), 6);
    assert_eq!(target.apply_compare_link(&format!("?{link},gone")), 2);
    let names: Vec<&str> = target
        .compared_items()
        .iter()
        .map(|item| item.name())
        .collect();
    assert_eq!(names, vec!["Sauvage", "Aventus"]);
}

#[test]
fn quick_view_closes_when_its_item_is_filtered_out() {
    let mut session = session(fragrance_store(), 1);
    assert!(session.inspect(&id("black-opium")));
    assert!(!session.inspect(&id("discontinued")));
    assert_eq!(session.quick_view().unwrap().name(), "Black Opium");

    session.choose(&facet("gender"), "women");
    assert!(session.quick_view().is_some());

    session.choose(&facet("gender"), "men");
    assert!(session.quick_view().is_none());
    assert!(!session.close_quick_view());
}

#[test]
fn quick_view_survives_a_resort_past_the_window() {
    let mut session = session(fragrance_store(), 1);
    session.inspect(&id("black-opium"));

    assert!(session.set_sort(SortKey::PriceLowToHigh));
    assert_eq!(strs(session.visible_ids()), vec!["sauvage"]);
    assert_eq!(session.quick_view().unwrap().id(), &id("black-opium"));
}

#[test]
fn observers_see_every_change() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut session = session(numbered_store(8), 3);
    let subscription = {
        let events = Arc::clone(&events);
        session.subscribe(move |event| events.lock().unwrap().push(event.clone()))
    };

    session.load_more();
    session.set_query("item 1");
    session.toggle_wishlist(&id("item-1"));
    session.inspect(&id("item-1"));
    session.close_quick_view();
    session.clear_compare();

    assert!(session.unsubscribe(subscription));
    session.load_more();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            CatalogEvent::RevealAdvanced {
                total: 8,
                visible: 6
            },
            CatalogEvent::ResultsChanged {
                total: 1,
                visible: 1,
                reset: true,
            },
            CatalogEvent::WishlistChanged(SelectionChange::Toggled {
                id: id("item-1"),
                outcome: ToggleOutcome::Added,
            }),
            CatalogEvent::FocusChanged(Some(id("item-1"))),
            CatalogEvent::FocusChanged(None),
            CatalogEvent::CompareChanged(SelectionChange::Cleared),
        ]
    );
}

#[test]
fn filter_changes_notify_even_when_results_stay_the_same() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut session = session(numbered_store(8), 3);
    {
        let events = Arc::clone(&events);
        session.subscribe(move |event| events.lock().unwrap().push(event.clone()));
    }

    assert!(!session.set_query("   "));
    assert!(!session.set_sort(SortKey::PriceLowToHigh));
    assert!(!session.set_range(&facet("price"), NumericRange::at_most(1000.0)));

    assert_eq!(session.filters().sort(), SortKey::PriceLowToHigh);
    let unchanged = CatalogEvent::ResultsChanged {
        total: 8,
        visible: 3,
        reset: false,
    };
    assert_eq!(*events.lock().unwrap(), vec![unchanged.clone(), unchanged.clone(), unchanged]);
}

#[test]
fn empty_store_is_an_empty_session() {
    let mut session = session(Arc::new(RecordStore::empty()), 6);
    assert_eq!(session.total(), 0);
    assert_eq!(session.reveal_phase(), RevealPhase::Empty);
    assert!(!session.load_more());
    assert!(session.visible().is_empty());
}
