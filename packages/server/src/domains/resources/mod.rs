//! Resources domain - paginated archive listings
//!
//! Blog posts, project galleries and videos come from different CMS
//! collections with different filter shapes. This domain puts them behind a
//! single `(kind, query) -> page` contract:
//!
//! - `actions` normalizes the raw request and dispatches to the right source
//! - `models` holds the item shapes each archive returns
//! - `error` maps failures onto HTTP statuses

pub mod actions;
pub mod error;
pub mod models;

pub use actions::{list_resources, ResourcePage};
pub use error::ResourceError;
pub use models::{BlogPost, FeaturedImage, Project, ProjectSearchResult, Term, VideoItem, VideoOrigin};
