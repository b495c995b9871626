//! Resource archive query model.
//!
//! Shared by the HTTP service and the archive client: the `(kind, query)`
//! request shape, the `PageResult` response shape, the per-kind filter
//! normalization rules, and the opaque offset cursor used by adapters that
//! paginate locally.
//!
//! # Usage
//!
//! ```rust
//! use resource_query::{NormalizedQuery, ResourceKind, ResourceQuery};
//!
//! let kind: ResourceKind = "project".parse().unwrap();
//! let query: ResourceQuery =
//!     serde_json::from_str(r#"{"first": 100, "filters": {"mt": "tile,metal"}}"#).unwrap();
//!
//! let normalized = NormalizedQuery::new(kind, query);
//! assert_eq!(normalized.first, 50);
//! assert_eq!(
//!     normalized.project_filters().material_type_slugs,
//!     vec!["tile".to_string(), "metal".to_string()]
//! );
//! ```

pub mod cursor;
pub mod kind;
pub mod normalize;
pub mod page;
pub mod query;

pub use cursor::{CursorError, OffsetCursor};
pub use kind::{ResourceKind, UnknownKind};
pub use normalize::{
    clamp_first, search_term, text_filter, to_slug_array, NormalizedQuery, ProjectsArchiveFilters,
    DEFAULT_PAGE_SIZE, MATERIAL_TYPE_KEY, MAX_PAGE_SIZE, MIN_PAGE_SIZE, ROOF_COLOR_KEY,
    SEARCH_ALIAS, SEARCH_KEY, SERVICE_AREA_KEY,
};
pub use page::{paginate_offset, trim_results, PageInfo, PageResult};
pub use query::{FilterValue, Filters, ResourceQuery};
