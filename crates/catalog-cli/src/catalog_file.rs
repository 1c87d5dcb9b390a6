//! Catalog files: a JSON document with the facet schema and the items.
//!
//! ```json
//! { "schema": { "facets": [...], "ranges": [...] }, "items": [...] }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_core::FilterEngine;
use catalog_model::{CatalogItem, CatalogSchema, RecordStore};
use serde::Deserialize;
use tracing::{info, info_span};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    schema: CatalogSchema,
    items: Vec<CatalogItem>,
}

/// A loaded catalog, ready to mount sessions over.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub schema: CatalogSchema,
    pub store: Arc<RecordStore>,
}

impl Catalog {
    pub fn engine(&self) -> FilterEngine {
        FilterEngine::new(self.schema.clone())
    }
}

/// Read and validate a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let span = info_span!("load_catalog", path = %path.display());
    let _guard = span.enter();
    let content =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let catalog =
        parse_catalog(&content).with_context(|| format!("load catalog {}", path.display()))?;
    info!(
        items = catalog.store.len(),
        facets = catalog.schema.facets.len(),
        ranges = catalog.schema.ranges.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Parse catalog JSON; rejects invalid items, duplicate ids and an
/// inconsistent schema.
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let document: CatalogDocument = serde_json::from_str(content).context("parse catalog JSON")?;
    document.schema.validate().context("validate schema")?;
    let store = RecordStore::new(document.items).context("index items")?;
    Ok(Catalog {
        schema: document.schema,
        store: Arc::new(store),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_optional() {
        let catalog = parse_catalog(r#"{ "items": [{ "id": "a", "name": "A", "price": 1 }] }"#)
            .unwrap();
        assert_eq!(catalog.store.len(), 1);
        assert!(catalog.schema.facets.is_empty());
    }

    #[test]
    fn duplicate_ids_fail_with_context() {
        let error = parse_catalog(
            r#"{ "items": [
                { "id": "a", "name": "A", "price": 1 },
                { "id": "a", "name": "B", "price": 2 }
            ] }"#,
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "index items");
        assert!(format!("{error:#}").contains("duplicate"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = parse_catalog("{ \"items\": [").unwrap_err();
        assert_eq!(error.to_string(), "parse catalog JSON");
    }
}
