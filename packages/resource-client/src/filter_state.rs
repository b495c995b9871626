//! Current search and facet selections, and their URL form.

use std::collections::BTreeMap;

use resource_query::{
    FilterValue, Filters, ResourceKind, ResourceQuery, MATERIAL_TYPE_KEY, ROOF_COLOR_KEY,
    SEARCH_KEY, SERVICE_AREA_KEY,
};

/// Query-string keys an archive page uses for its filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlKeys {
    pub search: String,
    /// `(filter name, url key)` pairs in the order they appear in URLs.
    pub facets: Vec<(String, String)>,
}

impl UrlKeys {
    pub fn for_kind(kind: ResourceKind) -> Self {
        let facets: &[(&str, &str)] = match kind {
            ResourceKind::Project => &[
                (MATERIAL_TYPE_KEY, "mt"),
                (ROOF_COLOR_KEY, "rc"),
                (SERVICE_AREA_KEY, "sa"),
            ],
            ResourceKind::Blog | ResourceKind::Video => &[("category", "cat")],
        };

        Self {
            search: "q".to_string(),
            facets: facets
                .iter()
                .map(|(name, key)| (name.to_string(), key.to_string()))
                .collect(),
        }
    }
}

/// What the user has typed and selected on an archive page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub facets: BTreeMap<String, Vec<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a facet's selection. An empty selection removes the facet.
    pub fn set_facet(&mut self, name: &str, values: Vec<String>) {
        let values = clean_slugs(values);
        if values.is_empty() {
            self.facets.remove(name);
        } else {
            self.facets.insert(name.to_string(), values);
        }
    }

    /// Add `slug` to the facet, or remove it if already selected
    pub fn toggle(&mut self, name: &str, slug: &str) {
        let slug = slug.trim();
        if slug.is_empty() {
            return;
        }

        let mut values = self.facets.get(name).cloned().unwrap_or_default();
        match values.iter().position(|v| v == slug) {
            Some(index) => {
                values.remove(index);
            }
            None => values.push(slug.to_string()),
        }
        self.set_facet(name, values);
    }

    /// Request body for the first page of this selection.
    ///
    /// Facets go out comma-delimited, which every kind's normalizer accepts.
    pub fn to_query(&self, first: u32) -> ResourceQuery {
        let mut filters = Filters::new();
        let search = self.search.trim();
        if !search.is_empty() {
            filters.insert(SEARCH_KEY, FilterValue::text(search));
        }
        for (name, values) in &self.facets {
            filters.insert(name.clone(), FilterValue::text(values.join(",")));
        }

        ResourceQuery::new(i64::from(first)).with_filters(filters)
    }

    /// Restore state from a query string such as `?q=cedar&mt=tile,metal`.
    /// Keys not named in `keys` are ignored.
    pub fn from_url_query(keys: &UrlKeys, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::new();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == keys.search.as_str() {
                state.search = value.trim().to_string();
                continue;
            }
            if let Some((name, _)) = keys.facets.iter().find(|(_, url_key)| *url_key == key) {
                let mut values = state.facets.get(name).cloned().unwrap_or_default();
                values.extend(value.split(',').map(str::to_string));
                state.set_facet(name, values);
            }
        }

        state
    }

    /// Query string (without `?`) for sharing this state. Empty when nothing
    /// is selected.
    pub fn to_url_query(&self, keys: &UrlKeys) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());

        if !self.search.trim().is_empty() {
            serializer.append_pair(&keys.search, self.search.trim());
        }
        for (name, url_key) in &keys.facets {
            if let Some(values) = self.facets.get(name) {
                serializer.append_pair(url_key, &values.join(","));
            }
        }
        serializer.finish()
    }
}

/// Trim, drop empties and duplicates, keep first-seen order
fn clean_slugs(values: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !cleaned.iter().any(|v| v == value) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_query::{NormalizedQuery, ProjectsArchiveFilters};

    #[test]
    fn toggle_adds_then_removes() {
        let mut state = FilterState::new();
        state.toggle(ROOF_COLOR_KEY, "slate-gray");
        state.toggle(ROOF_COLOR_KEY, "charcoal");
        assert_eq!(state.facets[ROOF_COLOR_KEY], vec!["slate-gray", "charcoal"]);

        state.toggle(ROOF_COLOR_KEY, "slate-gray");
        state.toggle(ROOF_COLOR_KEY, "charcoal");
        assert!(!state.facets.contains_key(ROOF_COLOR_KEY));
    }

    #[test]
    fn project_query_normalizes_to_facets() {
        let mut state = FilterState::new();
        state.search = "  cedar ".into();
        state.set_facet(MATERIAL_TYPE_KEY, vec!["tile".into(), " metal".into(), "tile".into()]);

        let normalized = NormalizedQuery::new(ResourceKind::Project, state.to_query(12));

        assert_eq!(normalized.first, 12);
        assert_eq!(
            normalized.project_filters(),
            ProjectsArchiveFilters {
                search: Some("cedar".into()),
                material_type_slugs: vec!["tile".into(), "metal".into()],
                roof_color_slugs: vec![],
                service_area_slugs: vec![],
            }
        );
    }

    #[test]
    fn url_round_trip_uses_short_keys() {
        let keys = UrlKeys::for_kind(ResourceKind::Project);
        let state = FilterState::from_url_query(&keys, "?q=cedar+shake&mt=tile,metal&sa=austin&utm_source=x");

        assert_eq!(state.search, "cedar shake");
        assert_eq!(state.facets[MATERIAL_TYPE_KEY], vec!["tile", "metal"]);
        assert_eq!(state.facets[SERVICE_AREA_KEY], vec!["austin"]);
        assert_eq!(state.facets.len(), 2);

        assert_eq!(state.to_url_query(&keys), "q=cedar+shake&mt=tile%2Cmetal&sa=austin");
    }

    #[test]
    fn repeated_url_keys_accumulate() {
        let keys = UrlKeys::for_kind(ResourceKind::Blog);
        let state = FilterState::from_url_query(&keys, "cat=gutters&cat=repairs,,gutters");

        assert_eq!(state.facets["category"], vec!["gutters", "repairs"]);
    }

    #[test]
    fn empty_state_has_empty_url_and_filters() {
        let keys = UrlKeys::for_kind(ResourceKind::Video);
        let state = FilterState::from_url_query(&keys, "");

        assert_eq!(state, FilterState::new());
        assert_eq!(state.to_url_query(&keys), "");
        assert!(state.to_query(24).filters.is_empty());
    }
}
