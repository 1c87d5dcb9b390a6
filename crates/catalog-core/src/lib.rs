//! Catalog browsing core: faceted filtering, wishlist and compare sets,
//! progressive reveal and quick view focus over a [`catalog_model::RecordStore`].

pub mod compare_link;
pub mod filter;
pub mod observe;
pub mod options;
pub mod quick_view;
pub mod reveal;
pub mod selection;
pub mod session;

pub use compare_link::{
    COMPARE_PARAM, decode_compare_param, encode_compare_ids, encode_compare_param,
};
pub use filter::{FacetSelection, FilterEngine, FilterState, NumericRange, filter};
pub use observe::{Observers, SubscriptionId};
pub use options::{BrowseOptions, DEFAULT_PAGE_SIZE};
pub use quick_view::QuickView;
pub use reveal::{RevealController, RevealPhase};
pub use selection::{COMPARE_LIMIT, CompareSet, SelectionSet, ToggleOutcome, Wishlist};
pub use session::{CatalogEvent, CatalogSession, SelectionChange};
