//! Paged result cache keyed by query shape.

use std::collections::HashMap;

use resource_query::{clamp_first, PageResult, ResourceKind, ResourceQuery};

/// Cache key for `(kind, query)`.
///
/// Built from the kind, the effective page size and the canonical filters, so
/// two queries that differ only in key order or in `after` share a key.
pub fn key_of(kind: ResourceKind, query: &ResourceQuery) -> String {
    format!(
        "{}:{}:{}",
        kind,
        clamp_first(query.first),
        query.filters.canonical_string()
    )
}

/// Pages fetched so far for each query shape, in fetch order.
#[derive(Debug, Clone)]
pub struct PageCache<T> {
    entries: HashMap<String, Vec<PageResult<T>>>,
}

impl<T> PageCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Cached pages for this query, empty on a miss
    pub fn get(&self, kind: ResourceKind, query: &ResourceQuery) -> &[PageResult<T>] {
        self.entries
            .get(&key_of(kind, query))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the cached pages for this query
    pub fn set(&mut self, kind: ResourceKind, query: &ResourceQuery, pages: Vec<PageResult<T>>) {
        self.entries.insert(key_of(kind, query), pages);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
