use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use resource_query::{paginate_offset, search_term, text_filter, Filters, PageResult};
use serde::{Deserialize, Serialize};

use super::{FeaturedImageEdge, TermNodes};
use crate::domains::resources::{VideoItem, VideoOrigin};
use crate::kernel::cms_client::{CmsClient, Connection};
use crate::kernel::{BaseVideoSource, PageRequest};

/// Nodes requested per round trip while walking a collection.
const COLLECTION_BATCH: u32 = 100;

/// Round trips allowed per collection before the walk stops early.
const MAX_COLLECTION_BATCHES: usize = 50;

const LIST_VIDEOS_QUERY: &str = r#"
query ListVideos($first: Int!, $after: String) {
  videos(first: $first, after: $after, where: { status: PUBLISH, orderby: { field: DATE, order: DESC } }) {
    pageInfo { hasNextPage endCursor }
    nodes {
      databaseId
      title
      uri
      date
      videoDetails { videoUrl }
      featuredImage { node { sourceUrl altText } }
      categories { nodes { name slug } }
    }
  }
}
"#;

const LIST_PROJECT_VIDEOS_QUERY: &str = r#"
query ListProjectVideos($first: Int!, $after: String) {
  projects(first: $first, after: $after, where: { status: PUBLISH, orderby: { field: DATE, order: DESC } }) {
    pageInfo { hasNextPage endCursor }
    nodes {
      databaseId
      title
      uri
      date
      projectDetails { videoUrl }
      featuredImage { node { sourceUrl altText } }
    }
  }
}
"#;

const CATEGORY_KEYS: [&str; 2] = ["category", "cat"];

#[derive(Debug, Serialize)]
struct BatchVariables {
    first: u32,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosData {
    videos: Connection<VideoNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectVideosData {
    projects: Connection<ProjectVideoNode>,
}

/// Follow `pageInfo.endCursor` until the collection is exhausted.
///
/// `fetch` receives the cursor to resume after (`None` for the first batch).
/// After [`MAX_COLLECTION_BATCHES`] round trips the walk stops with what it
/// has and logs a warning.
async fn collect_all<N, F, Fut>(collection: &str, mut fetch: F) -> Result<Vec<N>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Connection<N>>>,
{
    let mut nodes = Vec::new();
    let mut after: Option<String> = None;

    for _ in 0..MAX_COLLECTION_BATCHES {
        let connection = fetch(after.take()).await?;
        nodes.extend(connection.nodes);

        match connection.page_info.next_cursor() {
            Some(cursor) => after = Some(cursor.to_string()),
            None => return Ok(nodes),
        }
    }

    tracing::warn!(
        collection,
        batches = MAX_COLLECTION_BATCHES,
        loaded = nodes.len(),
        "Collection still has more pages; archive truncated"
    );
    Ok(nodes)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDetails {
    video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoNode {
    database_id: i64,
    title: Option<String>,
    uri: Option<String>,
    date: Option<String>,
    video_details: Option<VideoDetails>,
    featured_image: Option<FeaturedImageEdge>,
    categories: Option<TermNodes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectVideoNode {
    database_id: i64,
    title: Option<String>,
    uri: Option<String>,
    date: Option<String>,
    project_details: Option<VideoDetails>,
    featured_image: Option<FeaturedImageEdge>,
}

fn video_url(details: Option<VideoDetails>) -> Option<String> {
    details
        .and_then(|d| d.video_url)
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
}

impl VideoNode {
    fn into_item(self) -> Option<VideoItem> {
        Some(VideoItem {
            id: format!("video-{}", self.database_id),
            origin: VideoOrigin::Video,
            video_url: video_url(self.video_details)?,
            title: self.title.unwrap_or_default(),
            thumbnail_url: self.featured_image.map(|edge| edge.node.source_url),
            uri: self.uri.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            categories: self.categories.unwrap_or_default().nodes,
        })
    }
}

impl ProjectVideoNode {
    /// Projects without a walkthrough video are not part of the archive.
    fn into_item(self) -> Option<VideoItem> {
        Some(VideoItem {
            id: format!("project-{}", self.database_id),
            origin: VideoOrigin::Project,
            video_url: video_url(self.project_details)?,
            title: self.title.unwrap_or_default(),
            thumbnail_url: self.featured_image.map(|edge| edge.node.source_url),
            uri: self.uri.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            categories: Vec::new(),
        })
    }
}

/// Merge both collections into one sequence, newest first.
///
/// Ties on date are broken by id so the order (and therefore every offset
/// cursor) is stable across requests.
pub fn merge_video_collections(videos: Vec<VideoItem>, projects: Vec<VideoItem>) -> Vec<VideoItem> {
    let mut merged: Vec<VideoItem> = videos.into_iter().chain(projects).collect();
    merged.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    merged
}

/// Apply `search`/`q` (case-insensitive title match) and `category`/`cat`.
pub fn apply_video_filters(items: Vec<VideoItem>, filters: &Filters) -> Vec<VideoItem> {
    let needle = search_term(filters).map(|s| s.to_lowercase());
    let category = text_filter(filters, &CATEGORY_KEYS);

    items
        .into_iter()
        .filter(|item| needle.as_deref().map_or(true, |n| item.matches_search(n)))
        .filter(|item| category.as_deref().map_or(true, |c| item.in_category(c)))
        .collect()
}

/// Videos merged from the standalone and project collections, paginated
/// after the merge.
pub struct CmsVideoSource {
    client: Arc<CmsClient>,
}

impl CmsVideoSource {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseVideoSource for CmsVideoSource {
    async fn list_video_items_paged(
        &self,
        request: PageRequest<Filters>,
    ) -> Result<PageResult<VideoItem>> {
        let client = &self.client;

        let videos = collect_all("videos", |after| async move {
            let data: VideosData = client
                .query(LIST_VIDEOS_QUERY, BatchVariables { first: COLLECTION_BATCH, after })
                .await?;
            Ok::<_, anyhow::Error>(data.videos)
        })
        .await?;
        let projects = collect_all("projects", |after| async move {
            let data: ProjectVideosData = client
                .query(LIST_PROJECT_VIDEOS_QUERY, BatchVariables { first: COLLECTION_BATCH, after })
                .await?;
            Ok::<_, anyhow::Error>(data.projects)
        })
        .await?;

        let videos: Vec<VideoItem> = videos.into_iter().filter_map(VideoNode::into_item).collect();
        let projects: Vec<VideoItem> = projects
            .into_iter()
            .filter_map(ProjectVideoNode::into_item)
            .collect();
        tracing::debug!(
            videos = videos.len(),
            project_videos = projects.len(),
            "Loaded video collections"
        );

        let merged = apply_video_filters(merge_video_collections(videos, projects), &request.filters);
        Ok(paginate_offset(merged, request.first, request.after.as_deref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_query::{FilterValue, PageInfo};
    use crate::domains::resources::Term;

    /// Serve `total` ids in batches of `batch`, using the last id as cursor.
    fn batch_of(total: u32, batch: u32, after: Option<String>) -> Connection<u32> {
        let start: u32 = after.map_or(0, |c| c.parse().unwrap());
        let end = (start + batch).min(total);
        let page_info = if end < total {
            PageInfo::next(end.to_string())
        } else {
            PageInfo::default()
        };
        Connection {
            page_info,
            nodes: (start..end).collect(),
        }
    }

    fn item(id: &str, date: &str, title: &str, categories: &[&str]) -> VideoItem {
        VideoItem {
            id: id.to_string(),
            origin: if id.starts_with("project") {
                VideoOrigin::Project
            } else {
                VideoOrigin::Video
            },
            title: title.to_string(),
            video_url: format!("https://www.youtube.com/watch?v={}", id),
            thumbnail_url: None,
            uri: format!("/videos/{}/", id),
            date: date.to_string(),
            categories: categories
                .iter()
                .map(|c| Term {
                    name: c.to_string(),
                    slug: c.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn merges_newest_first_with_stable_ties() {
        let merged = merge_video_collections(
            vec![
                item("video-2", "2024-01-10T00:00:00", "Storm damage", &[]),
                item("video-1", "2024-03-01T00:00:00", "Tile repair", &[]),
            ],
            vec![item("project-9", "2024-01-10T00:00:00", "Metal reroof", &[])],
        );

        let ids: Vec<&str> = merged.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["video-1", "project-9", "video-2"]);
    }

    #[test]
    fn filters_by_search_and_category() {
        let items = vec![
            item("video-1", "2024-03-01", "Tile Repair basics", &["repairs"]),
            item("video-2", "2024-02-01", "Tile inspection", &["inspections"]),
            item("video-3", "2024-01-01", "Gutter cleaning", &["repairs"]),
        ];

        let filters = Filters::new()
            .with("q", FilterValue::text("tile"))
            .with("category", FilterValue::text("repairs"));
        let filtered = apply_video_filters(items.clone(), &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "video-1");

        assert_eq!(apply_video_filters(items, &Filters::new()).len(), 3);
    }

    #[test]
    fn project_nodes_without_video_are_skipped() {
        let node: ProjectVideoNode = serde_json::from_value(serde_json::json!({
            "databaseId": 3,
            "title": "No video here",
            "uri": "/projects/no-video/",
            "date": "2024-01-01T00:00:00",
            "projectDetails": {"videoUrl": ""},
            "featuredImage": null,
        }))
        .unwrap();
        assert!(node.into_item().is_none());
    }

    #[test]
    fn merged_pages_chain_without_gaps() {
        let videos: Vec<VideoItem> = (0..7)
            .map(|i| item(&format!("video-{}", i), &format!("2024-01-{:02}", i + 1), "v", &[]))
            .collect();
        let projects: Vec<VideoItem> = (0..6)
            .map(|i| item(&format!("project-{}", i), &format!("2024-02-{:02}", i + 1), "p", &[]))
            .collect();
        let merged = merge_video_collections(videos, projects);

        let mut seen = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let page = paginate_offset(merged.clone(), 4, after.as_deref()).unwrap();
            seen.extend(page.items.into_iter().map(|v| v.id));
            match page.page_info.next_cursor() {
                Some(c) => after = Some(c.to_string()),
                None => break,
            }
        }

        let expected: Vec<String> = merged.into_iter().map(|v| v.id).collect();
        assert_eq!(seen, expected);
        assert_eq!(seen.len(), 13);
    }

    #[tokio::test]
    async fn walks_every_batch_of_a_large_collection() {
        let mut cursors = Vec::new();
        let nodes = collect_all("videos", |after| {
            cursors.push(after.clone());
            let connection = batch_of(130, COLLECTION_BATCH, after);
            async move { Ok::<_, anyhow::Error>(connection) }
        })
        .await
        .unwrap();

        assert_eq!(nodes, (0..130).collect::<Vec<u32>>());
        assert_eq!(cursors, vec![None, Some("100".to_string())]);
    }

    #[tokio::test]
    async fn endless_collection_stops_at_the_batch_cap() {
        let mut calls = 0;
        let nodes = collect_all("projects", |_| {
            calls += 1;
            let node = calls;
            async move {
                Ok::<_, anyhow::Error>(Connection {
                    page_info: PageInfo::next("again"),
                    nodes: vec![node],
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(calls, MAX_COLLECTION_BATCHES);
        assert_eq!(nodes.len(), MAX_COLLECTION_BATCHES);
    }

    #[tokio::test]
    async fn batch_errors_abort_the_walk() {
        let result = collect_all("videos", |after| async move {
            match after {
                None => Ok(batch_of(300, 100, None)),
                Some(_) => Err(anyhow::anyhow!("upstream reset")),
            }
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "upstream reset");
    }

    #[tokio::test]
    async fn archive_past_one_batch_paginates_to_the_end() {
        let ids = collect_all("videos", |after| {
            let connection = batch_of(130, COLLECTION_BATCH, after);
            async move { Ok::<_, anyhow::Error>(connection) }
        })
        .await
        .unwrap();
        let videos: Vec<VideoItem> = ids
            .into_iter()
            .map(|i| item(&format!("video-{:03}", i), "2024-01-01T00:00:00", "v", &[]))
            .collect();
        let merged = merge_video_collections(videos, Vec::new());

        let last = paginate_offset(merged, 24, Some(&resource_query::OffsetCursor::new(120).encode()))
            .unwrap();
        let ids: Vec<&str> = last.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(ids.first(), Some(&"video-120"));
        assert_eq!(ids.last(), Some(&"video-129"));
        assert!(!last.page_info.has_next_page);
    }
}
