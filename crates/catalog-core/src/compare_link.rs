//! Compare link codec.
//!
//! The compare set travels between pages as a query parameter holding a
//! comma-separated id list (`compare=a,b,c`). Ids are URL-safe, so no
//! escaping is applied. Decoding never fails: malformed, unknown and
//! duplicate ids are dropped.

use std::collections::HashSet;

use catalog_model::{ItemId, RecordStore};
use tracing::{debug, warn};

use crate::selection::{COMPARE_LIMIT, CompareSet, SelectionSet};

/// Query parameter name carrying the compare ids.
pub const COMPARE_PARAM: &str = "compare";

const DELIMITER: char = ',';

/// Join ids with the list delimiter.
pub fn encode_compare_ids<'a>(ids: impl IntoIterator<Item = &'a ItemId>) -> String {
    ids.into_iter()
        .map(ItemId::as_str)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// `compare=<ids>` for the current members of `set`.
pub fn encode_compare_param(set: &CompareSet) -> String {
    format!("{COMPARE_PARAM}={}", encode_compare_ids(&set.ids()))
}

/// Decode a compare link against `store`.
///
/// Accepts a full query string (`?compare=a,b&x=1`), a single
/// `compare=a,b` pair, or a bare `a,b` list. Keeps at most
/// [`COMPARE_LIMIT`] known, distinct ids in link order.
pub fn decode_compare_param(raw: &str, store: &RecordStore) -> Vec<ItemId> {
    let list = extract_list(raw);
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let tokens = list.split(DELIMITER).map(str::trim).filter(|t| !t.is_empty());
    for token in tokens {
        let Ok(id) = ItemId::new(token) else {
            debug!(token, "ignoring malformed compare id");
            continue;
        };
        if !store.contains(&id) {
            warn!(id = %id, "dropping stale compare id");
            continue;
        }
        if seen.insert(id.clone()) {
            ids.push(id);
        }
        if ids.len() == COMPARE_LIMIT {
            break;
        }
    }
    ids
}

fn extract_list(raw: &str) -> &str {
    let raw = raw.trim().trim_start_matches('?');
    if !raw.contains('=') {
        return raw;
    }
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == COMPARE_PARAM)
        .map_or("", |(_, value)| value)
}
