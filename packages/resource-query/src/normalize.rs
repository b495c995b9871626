//! Query normalization rules.
//!
//! Page size is defaulted and clamped rather than rejected. Project facets are
//! parsed per key from whichever shape the caller sent. Blog and video
//! filters pass through untouched; their adapters read them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::ResourceKind;
use crate::query::{FilterValue, Filters, ResourceQuery};

pub const DEFAULT_PAGE_SIZE: u32 = 24;
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 50;

pub const SEARCH_KEY: &str = "search";
pub const SEARCH_ALIAS: &str = "q";

pub const MATERIAL_TYPE_KEY: &str = "materialTypeSlugs";
pub const ROOF_COLOR_KEY: &str = "roofColorSlugs";
pub const SERVICE_AREA_KEY: &str = "serviceAreaSlugs";

/// Project facet keys paired with their short aliases. The canonical key
/// wins when both are present.
pub const PROJECT_FACETS: [(&str, &str); 3] = [
    (MATERIAL_TYPE_KEY, "mt"),
    (ROOF_COLOR_KEY, "rc"),
    (SERVICE_AREA_KEY, "sa"),
];

/// Default to 24 and clamp into `[1, 50]`.
pub fn clamp_first(first: Option<i64>) -> u32 {
    first
        .unwrap_or(DEFAULT_PAGE_SIZE as i64)
        .clamp(MIN_PAGE_SIZE as i64, MAX_PAGE_SIZE as i64) as u32
}

/// Parse a facet value into slugs.
///
/// Arrays have each element coerced to a trimmed string; comma-delimited
/// text is split and trimmed. Empty entries are dropped in both cases and
/// every other shape yields nothing.
pub fn to_slug_array(value: Option<&FilterValue>) -> Vec<String> {
    match value {
        Some(FilterValue::List(items)) => items
            .iter()
            .filter_map(coerce_slug)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(FilterValue::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(FilterValue::Other(_)) | None => Vec::new(),
    }
}

fn coerce_slug(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// First string-valued entry among `keys`, trimmed.
///
/// A key holding a non-string value is skipped in favor of the next one; a
/// key holding an empty string still ends the lookup.
pub fn text_filter(filters: &Filters, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| filters.get(key).and_then(FilterValue::as_text))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Free-text search term: `search`, falling back to `q`.
pub fn search_term(filters: &Filters) -> Option<String> {
    text_filter(filters, &[SEARCH_KEY, SEARCH_ALIAS])
}

fn facet<'a>(filters: &'a Filters, key: &str, alias: &str) -> Option<&'a FilterValue> {
    filters
        .get(key)
        .filter(|v| !v.is_null())
        .or_else(|| filters.get(alias))
}

/// Normalized filter set for the project archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsArchiveFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub material_type_slugs: Vec<String>,
    pub roof_color_slugs: Vec<String>,
    pub service_area_slugs: Vec<String>,
}

impl ProjectsArchiveFilters {
    pub fn from_filters(filters: &Filters) -> Self {
        let [material, color, area] =
            PROJECT_FACETS.map(|(key, alias)| to_slug_array(facet(filters, key, alias)));

        ProjectsArchiveFilters {
            search: search_term(filters),
            material_type_slugs: material,
            roof_color_slugs: color,
            service_area_slugs: area,
        }
    }

    pub fn has_facets(&self) -> bool {
        !(self.material_type_slugs.is_empty()
            && self.roof_color_slugs.is_empty()
            && self.service_area_slugs.is_empty())
    }
}

/// A page request after defaults and clamping are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    pub kind: ResourceKind,
    pub first: u32,
    pub after: Option<String>,
    pub filters: Filters,
}

impl NormalizedQuery {
    pub fn new(kind: ResourceKind, query: ResourceQuery) -> Self {
        NormalizedQuery {
            kind,
            first: clamp_first(query.first),
            after: query.after,
            filters: query.filters,
        }
    }

    pub fn project_filters(&self) -> ProjectsArchiveFilters {
        ProjectsArchiveFilters::from_filters(&self.filters)
    }
}
