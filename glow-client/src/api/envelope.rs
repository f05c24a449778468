//! Response envelope normalization
//!
//! The backend is inconsistent about where it puts payloads: a list may
//! arrive bare, nested under `data`, or under `data.data`. These helpers are
//! the single place that branches on response shape; everything past this
//! boundary sees plain values. Anything unrecognized normalizes to empty.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract a list payload, trying the bare body, `data`, then `data.data`
pub(crate) fn normalize_list<T: DeserializeOwned>(body: &Value) -> Vec<T> {
    for candidate in [body, &body["data"], &body["data"]["data"]] {
        if candidate.is_array()
            && let Ok(items) = serde_json::from_value(candidate.clone())
        {
            return items;
        }
    }
    Vec::new()
}

/// Extract a string-keyed map payload, trying the same nesting levels
pub(crate) fn normalize_map<T: DeserializeOwned>(
    body: &Value,
) -> std::collections::HashMap<String, T> {
    for candidate in [body, &body["data"], &body["data"]["data"]] {
        if candidate.is_object()
            && let Ok(map) = serde_json::from_value(candidate.clone())
        {
            return map;
        }
    }
    std::collections::HashMap::new()
}

/// Extract a single object payload, trying the same nesting levels
pub(crate) fn normalize_item<T: DeserializeOwned>(body: &Value) -> Option<T> {
    for candidate in [body, &body["data"], &body["data"]["data"]] {
        if candidate.is_object()
            && let Ok(item) = serde_json::from_value(candidate.clone())
        {
            return Some(item);
        }
    }
    None
}
