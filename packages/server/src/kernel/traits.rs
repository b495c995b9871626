// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only: each wraps one content collection in
// the headless CMS. Filter interpretation beyond what is passed in lives in
// the implementations.
//
// Naming convention: Base* for trait names (e.g., BaseBlogSource)

use anyhow::Result;
use async_trait::async_trait;
use resource_query::{Filters, PageResult, ProjectsArchiveFilters};

use crate::domains::resources::{BlogPost, ProjectSearchResult, VideoItem};

/// Forward page request handed to a source. `first` is already clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<F> {
    pub first: u32,
    pub after: Option<String>,
    pub filters: F,
}

// =============================================================================
// Blog Source Trait
// =============================================================================

#[async_trait]
pub trait BaseBlogSource: Send + Sync {
    /// List published posts, newest first. Filters: `search`/`q`, `category`.
    async fn list_posts_paged(&self, request: PageRequest<Filters>) -> Result<PageResult<BlogPost>>;
}

// =============================================================================
// Project Source Trait
// =============================================================================

#[async_trait]
pub trait BaseProjectSource: Send + Sync {
    /// List projects, newest first, narrowed by normalized facets.
    async fn list_projects_paged(
        &self,
        request: PageRequest<ProjectsArchiveFilters>,
    ) -> Result<ProjectSearchResult>;
}

// =============================================================================
// Video Source Trait
// =============================================================================

#[async_trait]
pub trait BaseVideoSource: Send + Sync {
    /// List videos from both collections as one merged sequence.
    ///
    /// Cursors are only meaningful to the implementation that issued them; a
    /// cursor it cannot read is reported as [`resource_query::CursorError`].
    async fn list_video_items_paged(
        &self,
        request: PageRequest<Filters>,
    ) -> Result<PageResult<VideoItem>>;
}
