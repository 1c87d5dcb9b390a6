//! Attribute schema for a product line.
//!
//! The schema names the facets a catalog can be filtered by. It is supplied
//! alongside the items and, like them, is never mutated while browsing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::item::normalize_tag;
use crate::{FacetName, ModelError};

/// How many values of a categorical facet may be selected at once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Exactly one value or "any" (gender, property type).
    #[default]
    Single,
    /// A remembered set of values (seasons, occasions).
    Multi,
}

/// A categorical filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetDefinition {
    pub name: FacetName,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub selection: SelectionMode,
    /// Tags that satisfy every selection on this facet, such as `unisex`
    /// for a gender facet.
    #[serde(default)]
    pub broadening_tags: BTreeSet<String>,
}

impl FacetDefinition {
    pub fn new(name: FacetName, selection: SelectionMode) -> Self {
        Self {
            name,
            label: None,
            selection,
            broadening_tags: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn broadened_by(mut self, tag: &str) -> Self {
        self.broadening_tags.insert(normalize_tag(tag));
        self
    }

    /// Display label, falling back to the facet name.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.name.as_str())
    }

    pub fn is_broadening(&self, tag: &str) -> bool {
        self.broadening_tags
            .iter()
            .any(|broad| normalize_tag(broad) == tag)
    }
}

/// A numeric filter dimension with its natural bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeDefinition {
    pub name: FacetName,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl RangeDefinition {
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.name.as_str())
    }
}

/// Facets and ranges available for a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSchema {
    #[serde(default)]
    pub facets: Vec<FacetDefinition>,
    #[serde(default)]
    pub ranges: Vec<RangeDefinition>,
}

impl CatalogSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_facet(mut self, facet: FacetDefinition) -> Self {
        self.facets.push(facet);
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: RangeDefinition) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn facet(&self, name: &FacetName) -> Option<&FacetDefinition> {
        self.facets.iter().find(|f| &f.name == name)
    }

    pub fn range(&self, name: &FacetName) -> Option<&RangeDefinition> {
        self.ranges.iter().find(|r| &r.name == name)
    }

    /// Check that facet names are unique and range bounds are ordered.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = BTreeSet::new();
        for name in self
            .facets
            .iter()
            .map(|f| &f.name)
            .chain(self.ranges.iter().map(|r| &r.name))
        {
            if !seen.insert(name) {
                return Err(ModelError::Message(format!(
                    "facet {name} is defined more than once"
                )));
            }
        }
        for range in &self.ranges {
            if let (Some(min), Some(max)) = (range.min, range.max)
                && min > max
            {
                return Err(ModelError::InvalidRange {
                    facet: range.name.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
        Ok(())
    }
}
