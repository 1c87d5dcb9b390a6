use std::num::NonZeroUsize;

use catalog_model::SortKey;
use serde::{Deserialize, Serialize};

/// Results revealed per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(6) {
    Some(size) => size,
    None => panic!("default page size must be non-zero"),
};

/// Options for a browsing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseOptions {
    /// Results revealed initially and per `load_more`.
    pub page_size: NonZeroUsize,
    /// Sort key on mount and after "clear filters".
    pub default_sort: SortKey,
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortKey::default(),
        }
    }
}

impl BrowseOptions {
    #[must_use]
    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_default_sort(mut self, sort: SortKey) -> Self {
        self.default_sort = sort;
        self
    }
}
