//! Data model for catalog browsing: items, the record store and the facet
//! schema of a product line.

pub mod error;
pub mod ids;
pub mod item;
pub mod schema;
pub mod sort;
pub mod store;

pub use error::{ModelError, Result};
pub use ids::{FacetName, ItemId};
pub use item::{CatalogItem, CatalogItemBuilder, PRICE_FACET, SIZE_FACET, normalize_tag};
pub use schema::{CatalogSchema, FacetDefinition, RangeDefinition, SelectionMode};
pub use sort::SortKey;
pub use store::RecordStore;
