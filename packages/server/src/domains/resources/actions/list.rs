//! Resource listing action - the single entry point behind
//! `POST /api/resources/{kind}`.

use resource_query::{NormalizedQuery, PageResult, ResourceKind, ResourceQuery};
use serde::Serialize;

use crate::domains::resources::{BlogPost, ProjectSearchResult, ResourceError, VideoItem};
use crate::kernel::{PageRequest, ServerDeps};

/// A page from whichever archive was requested. Serializes as the bare
/// `PageResult` of that archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourcePage {
    Blog(PageResult<BlogPost>),
    Project(ProjectSearchResult),
    Video(PageResult<VideoItem>),
}

impl ResourcePage {
    pub fn len(&self) -> usize {
        match self {
            ResourcePage::Blog(page) => page.items.len(),
            ResourcePage::Project(page) => page.items.len(),
            ResourcePage::Video(page) => page.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_next_page(&self) -> bool {
        match self {
            ResourcePage::Blog(page) => page.page_info.has_next_page,
            ResourcePage::Project(page) => page.page_info.has_next_page,
            ResourcePage::Video(page) => page.page_info.has_next_page,
        }
    }
}

/// Parse the raw request body. A missing body reads as an empty query.
pub fn parse_query(body: &[u8]) -> Result<ResourceQuery, ResourceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResourceQuery::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Validate `kind`, normalize the query and call the matching source.
///
/// The kind is checked before the body is read, so an unknown kind is
/// reported as such whatever the body contains, and no source is called.
pub async fn list_resources(
    kind: &str,
    body: &[u8],
    deps: &ServerDeps,
) -> Result<ResourcePage, ResourceError> {
    let kind: ResourceKind = kind.parse()?;
    let query = NormalizedQuery::new(kind, parse_query(body)?);

    tracing::debug!(
        kind = %query.kind,
        first = query.first,
        after = ?query.after,
        filters = query.filters.len(),
        "Listing resources"
    );

    let page = dispatch(query, deps).await?;

    tracing::debug!(
        kind = %kind,
        items = page.len(),
        has_next_page = page.has_next_page(),
        "Resources listed"
    );
    Ok(page)
}

async fn dispatch(query: NormalizedQuery, deps: &ServerDeps) -> Result<ResourcePage, ResourceError> {
    let page = match query.kind {
        ResourceKind::Project => {
            let filters = query.project_filters();
            ResourcePage::Project(
                deps.projects
                    .list_projects_paged(PageRequest {
                        first: query.first,
                        after: query.after,
                        filters,
                    })
                    .await?,
            )
        }
        ResourceKind::Video => ResourcePage::Video(
            deps.videos
                .list_video_items_paged(PageRequest {
                    first: query.first,
                    after: query.after,
                    filters: query.filters,
                })
                .await?,
        ),
        ResourceKind::Blog => ResourcePage::Blog(
            deps.blog
                .list_posts_paged(PageRequest {
                    first: query.first,
                    after: query.after,
                    filters: query.filters,
                })
                .await?,
        ),
    };
    Ok(page)
}
