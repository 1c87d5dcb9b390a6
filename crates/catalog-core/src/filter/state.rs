//! Filter state - the current value of every facet plus the sort key.
//!
//! One `FilterState` exists per browsing session. It is created when the
//! view mounts, mutated through the methods below, and reset by an explicit
//! "clear filters" action.

use std::collections::{BTreeMap, BTreeSet};

use catalog_model::{FacetName, SortKey, normalize_tag};

// =============================================================================
// FACET SELECTION
// =============================================================================

/// Constraint on one categorical facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FacetSelection {
    /// No constraint; always satisfiable.
    #[default]
    Any,
    /// Single-select facet with one chosen value.
    One(String),
    /// Multi-select facet with a remembered, non-empty set of values.
    Many(BTreeSet<String>),
}

impl FacetSelection {
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Any => false,
            Self::One(selected) => selected == value,
            Self::Many(selected) => selected.contains(value),
        }
    }

    /// Selected values; empty for `Any`.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Any => Vec::new(),
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

// =============================================================================
// NUMERIC RANGE
// =============================================================================

/// Inclusive numeric range; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

// =============================================================================
// FILTER STATE
// =============================================================================

/// Current facet constraints, free-text query and sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    categorical: BTreeMap<FacetName, FacetSelection>,
    ranges: BTreeMap<FacetName, NumericRange>,
    query: String,
    sort: SortKey,
    default_sort: SortKey,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(SortKey::default())
    }
}

impl FilterState {
    /// Empty state using `default_sort` now and after every reset.
    pub fn new(default_sort: SortKey) -> Self {
        Self {
            categorical: BTreeMap::new(),
            ranges: BTreeMap::new(),
            query: String::new(),
            sort: default_sort,
            default_sort,
        }
    }

    /// Constrain a single-select facet to one value, replacing any previous
    /// choice. An empty value clears the constraint.
    pub fn select(&mut self, facet: FacetName, value: &str) {
        let value = normalize_tag(value);
        if value.is_empty() {
            self.categorical.remove(&facet);
        } else {
            self.categorical.insert(facet, FacetSelection::One(value));
        }
    }

    /// Add or remove one value of a multi-select facet. Removing the last
    /// value returns the facet to "any". Returns whether the value is now
    /// selected.
    pub fn toggle_value(&mut self, facet: FacetName, value: &str) -> bool {
        let value = normalize_tag(value);
        if value.is_empty() {
            return false;
        }
        let mut values = match self.categorical.remove(&facet) {
            Some(FacetSelection::Many(values)) => values,
            Some(FacetSelection::One(single)) => BTreeSet::from([single]),
            Some(FacetSelection::Any) | None => BTreeSet::new(),
        };
        let selected = if values.remove(&value) {
            false
        } else {
            values.insert(value);
            true
        };
        if !values.is_empty() {
            self.categorical.insert(facet, FacetSelection::Many(values));
        }
        selected
    }

    /// Add a value to a multi-select facet, leaving it selected if it
    /// already was.
    pub fn include_value(&mut self, facet: FacetName, value: &str) {
        if !self.selection(&facet).contains(&normalize_tag(value)) {
            self.toggle_value(facet, value);
        }
    }

    /// Return a facet to "any".
    pub fn select_any(&mut self, facet: &FacetName) {
        self.categorical.remove(facet);
    }

    pub fn selection(&self, facet: &FacetName) -> &FacetSelection {
        const ANY: &FacetSelection = &FacetSelection::Any;
        self.categorical.get(facet).unwrap_or(ANY)
    }

    /// Active categorical constraints, in facet-name order.
    pub fn selections(&self) -> impl Iterator<Item = (&FacetName, &FacetSelection)> {
        self.categorical.iter().filter(|(_, s)| !s.is_any())
    }

    /// Set a numeric range. An unbounded range removes the constraint.
    pub fn set_range(&mut self, facet: FacetName, range: NumericRange) {
        if range.is_unbounded() {
            self.ranges.remove(&facet);
        } else {
            self.ranges.insert(facet, range);
        }
    }

    pub fn clear_range(&mut self, facet: &FacetName) {
        self.ranges.remove(facet);
    }

    pub fn range(&self, facet: &FacetName) -> NumericRange {
        self.ranges.get(facet).copied().unwrap_or_default()
    }

    pub fn ranges(&self) -> impl Iterator<Item = (&FacetName, &NumericRange)> {
        self.ranges.iter()
    }

    /// Store the raw query text. Matching uses the trimmed, lower-cased query
    /// as one substring, so `" oud"` and `"oud"` match the same items and a
    /// blank query is no constraint.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The query as matched: trimmed and lower-cased. `None` when blank.
    pub fn normalized_query(&self) -> Option<String> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Number of active constraints (facets, ranges and a non-blank query).
    pub fn constraint_count(&self) -> usize {
        self.selections().count()
            + self.ranges.len()
            + usize::from(self.normalized_query().is_some())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.constraint_count() == 0
    }

    /// Clear every constraint and restore the default sort.
    pub fn reset(&mut self) {
        *self = Self::new(self.default_sort);
    }
}
