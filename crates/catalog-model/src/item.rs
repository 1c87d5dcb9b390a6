//! Catalog item definition.
//!
//! A [`CatalogItem`] is created once when the catalog is loaded and never
//! mutated afterwards. Every field is private; the derived search text is
//! computed at construction so the filter engine never rebuilds it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{FacetName, ItemId, ModelError};

/// Facet name under which the price is exposed to range filters.
pub const PRICE_FACET: &str = "price";

/// Facet name under which the size is exposed to range filters.
pub const SIZE_FACET: &str = "size";

/// An immutable, richly attributed catalog entry (a fragrance, a listing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct CatalogItem {
    id: ItemId,
    name: String,
    brand: String,
    notable: Vec<String>,
    description: Option<String>,
    categorical: BTreeMap<FacetName, BTreeSet<String>>,
    numeric: BTreeMap<FacetName, f64>,
    price: f64,
    is_new: bool,
    size: Option<f64>,
    listed_on: Option<NaiveDate>,
    searchable_text: String,
}

impl CatalogItem {
    /// Start building an item with its id and display name.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> CatalogItemBuilder {
        CatalogItemBuilder::new(id, name)
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Brand for products, agent for listings.
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Notable sub-attributes: ingredient notes or listing features.
    pub fn notable(&self) -> &[String] {
        &self.notable
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Tag values carried for a categorical facet, lower-cased.
    pub fn tags(&self, facet: &FacetName) -> Option<&BTreeSet<String>> {
        self.categorical.get(facet)
    }

    pub fn categorical(&self) -> &BTreeMap<FacetName, BTreeSet<String>> {
        &self.categorical
    }

    pub fn numeric_value(&self, facet: &FacetName) -> Option<f64> {
        self.numeric.get(facet).copied()
    }

    pub fn numeric(&self) -> &BTreeMap<FacetName, f64> {
        &self.numeric
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn size(&self) -> Option<f64> {
        self.size
    }

    pub fn listed_on(&self) -> Option<NaiveDate> {
        self.listed_on
    }

    /// Lower-cased concatenation of name, brand and notable names.
    pub fn searchable_text(&self) -> &str {
        &self.searchable_text
    }

    /// Constituent search tokens (name, brand, notable names) in original case.
    pub fn search_tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(std::iter::once(self.brand.as_str()))
            .chain(self.notable.iter().map(String::as_str))
            .filter(|token| !token.is_empty())
    }
}

/// Builder for [`CatalogItem`]; validation happens in [`CatalogItemBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CatalogItemBuilder {
    id: String,
    name: String,
    brand: String,
    notable: Vec<String>,
    description: Option<String>,
    categorical: Vec<(String, String)>,
    numeric: Vec<(String, f64)>,
    price: f64,
    is_new: bool,
    size: Option<f64>,
    listed_on: Option<NaiveDate>,
}

impl CatalogItemBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    #[must_use]
    pub fn notable(mut self, note: impl Into<String>) -> Self {
        self.notable.push(note.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, facet: impl Into<String>, value: impl Into<String>) -> Self {
        self.categorical.push((facet.into(), value.into()));
        self
    }

    #[must_use]
    pub fn numeric(mut self, facet: impl Into<String>, value: f64) -> Self {
        self.numeric.push((facet.into(), value));
        self
    }

    #[must_use]
    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn new_arrival(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn listed_on(mut self, date: NaiveDate) -> Self {
        self.listed_on = Some(date);
        self
    }

    pub fn build(self) -> Result<CatalogItem, ModelError> {
        let id = ItemId::new(self.id)?;

        let mut categorical: BTreeMap<FacetName, BTreeSet<String>> = BTreeMap::new();
        for (facet, value) in self.categorical {
            let value = normalize_tag(&value);
            if value.is_empty() {
                continue;
            }
            categorical
                .entry(FacetName::new(facet)?)
                .or_default()
                .insert(value);
        }

        let mut numeric = BTreeMap::new();
        for (facet, value) in self.numeric {
            let facet = FacetName::new(facet)?;
            if matches!(facet.as_str(), PRICE_FACET | SIZE_FACET) {
                return Err(ModelError::Message(format!(
                    "item {id}: {facet} is a dedicated field and cannot be set as a numeric attribute"
                )));
            }
            ensure_finite(&id, facet.as_str(), value)?;
            numeric.insert(facet, value);
        }
        ensure_finite(&id, PRICE_FACET, self.price)?;
        numeric.insert(FacetName::new(PRICE_FACET)?, self.price);
        if let Some(size) = self.size {
            ensure_finite(&id, SIZE_FACET, size)?;
            numeric.insert(FacetName::new(SIZE_FACET)?, size);
        }

        let notable: Vec<String> = self
            .notable
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        let searchable_text = build_search_text(&self.name, &self.brand, &notable);

        Ok(CatalogItem {
            id,
            name: self.name,
            brand: self.brand,
            notable,
            description: self.description,
            categorical,
            numeric,
            price: self.price,
            is_new: self.is_new,
            size: self.size,
            listed_on: self.listed_on,
            searchable_text,
        })
    }
}

/// Tags are compared case-insensitively; store them trimmed and lower-cased.
pub fn normalize_tag(value: &str) -> String {
    value.trim().to_lowercase()
}

fn ensure_finite(id: &ItemId, facet: &str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::Message(format!(
            "item {id}: {facet} must be a finite number, got {value}"
        )))
    }
}

fn build_search_text(name: &str, brand: &str, notable: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(notable.len() + 2);
    parts.push(name);
    parts.push(brand);
    parts.extend(notable.iter().map(String::as_str));
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// =============================================================================
// SERDE RECORD
// =============================================================================

/// Wire shape of an item in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    id: String,
    name: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    notable: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    categorical: BTreeMap<String, TagValues>,
    #[serde(default)]
    numeric: BTreeMap<String, f64>,
    price: f64,
    #[serde(default)]
    is_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    listed_on: Option<NaiveDate>,
}

/// A facet may be given a single tag or a list of tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValues {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<ItemRecord> for CatalogItem {
    type Error = ModelError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let mut builder = CatalogItem::builder(record.id, record.name)
            .brand(record.brand)
            .price(record.price)
            .new_arrival(record.is_new);
        for note in record.notable {
            builder = builder.notable(note);
        }
        if let Some(description) = record.description {
            builder = builder.description(description);
        }
        for (facet, values) in record.categorical {
            match values {
                TagValues::One(value) => builder = builder.tag(facet, value),
                TagValues::Many(values) => {
                    for value in values {
                        builder = builder.tag(facet.clone(), value);
                    }
                }
            }
        }
        for (facet, value) in record.numeric {
            builder = builder.numeric(facet, value);
        }
        if let Some(size) = record.size {
            builder = builder.size(size);
        }
        if let Some(date) = record.listed_on {
            builder = builder.listed_on(date);
        }
        builder.build()
    }
}

impl From<CatalogItem> for ItemRecord {
    fn from(item: CatalogItem) -> Self {
        let price_facet = FacetName::new(PRICE_FACET).ok();
        let size_facet = FacetName::new(SIZE_FACET).ok();
        Self {
            id: item.id.into(),
            name: item.name,
            brand: item.brand,
            notable: item.notable,
            description: item.description,
            categorical: item
                .categorical
                .into_iter()
                .map(|(facet, tags)| {
                    (facet.into(), TagValues::Many(tags.into_iter().collect()))
                })
                .collect(),
            numeric: item
                .numeric
                .into_iter()
                .filter(|(facet, _)| {
                    Some(facet) != price_facet.as_ref() && Some(facet) != size_facet.as_ref()
                })
                .map(|(facet, value)| (facet.into(), value))
                .collect(),
            price: item.price,
            is_new: item.is_new,
            size: item.size,
            listed_on: item.listed_on,
        }
    }
}
