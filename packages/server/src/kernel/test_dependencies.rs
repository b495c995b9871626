// TestDependencies - mock implementations for testing
//
// Provides recording content sources that can be injected into ServerDeps.

use anyhow::Result;
use async_trait::async_trait;
use resource_query::{Filters, PageResult, ProjectsArchiveFilters};
use std::sync::{Arc, Mutex};

use super::{BaseBlogSource, BaseProjectSource, BaseVideoSource, PageRequest, ServerDeps};
use crate::domains::resources::{BlogPost, ProjectSearchResult, VideoItem};

/// Canned outcome for the next call: a page, or a failure message.
type Canned<T> = std::result::Result<PageResult<T>, String>;

/// Shared recording state for one mock source.
struct Recorder<F, T> {
    calls: Arc<Mutex<Vec<PageRequest<F>>>>,
    responses: Arc<Mutex<Vec<Canned<T>>>>,
}

impl<F: Clone, T> Recorder<F, T> {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(&self, response: Canned<T>) {
        self.responses.lock().unwrap().push(response);
    }

    fn record(&self, request: PageRequest<F>) -> Result<PageResult<T>> {
        self.calls.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(PageResult::empty());
        }
        responses.remove(0).map_err(|message| anyhow::anyhow!(message))
    }

    fn calls(&self) -> Vec<PageRequest<F>> {
        self.calls.lock().unwrap().clone()
    }
}

// =============================================================================
// Mock Blog Source
// =============================================================================

pub struct MockBlogSource {
    recorder: Recorder<Filters, BlogPost>,
}

impl MockBlogSource {
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(),
        }
    }

    /// Queue a page to return
    pub fn with_page(self, page: PageResult<BlogPost>) -> Self {
        self.recorder.push(Ok(page));
        self
    }

    /// Queue a failure with the given message
    pub fn with_error(self, message: &str) -> Self {
        self.recorder.push(Err(message.to_string()));
        self
    }

    /// Get all requests the source received
    pub fn calls(&self) -> Vec<PageRequest<Filters>> {
        self.recorder.calls()
    }
}

impl Default for MockBlogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseBlogSource for MockBlogSource {
    async fn list_posts_paged(&self, request: PageRequest<Filters>) -> Result<PageResult<BlogPost>> {
        self.recorder.record(request)
    }
}

// =============================================================================
// Mock Project Source
// =============================================================================

pub struct MockProjectSource {
    recorder: Recorder<ProjectsArchiveFilters, crate::domains::resources::Project>,
}

impl MockProjectSource {
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(),
        }
    }

    pub fn with_page(self, page: ProjectSearchResult) -> Self {
        self.recorder.push(Ok(page));
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        self.recorder.push(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<PageRequest<ProjectsArchiveFilters>> {
        self.recorder.calls()
    }
}

impl Default for MockProjectSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseProjectSource for MockProjectSource {
    async fn list_projects_paged(
        &self,
        request: PageRequest<ProjectsArchiveFilters>,
    ) -> Result<ProjectSearchResult> {
        self.recorder.record(request)
    }
}

// =============================================================================
// Mock Video Source
// =============================================================================

pub struct MockVideoSource {
    recorder: Recorder<Filters, VideoItem>,
    fail_with_cursor_error: bool,
}

impl MockVideoSource {
    pub fn new() -> Self {
        Self {
            recorder: Recorder::new(),
            fail_with_cursor_error: false,
        }
    }

    pub fn with_page(self, page: PageResult<VideoItem>) -> Self {
        self.recorder.push(Ok(page));
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        self.recorder.push(Err(message.to_string()));
        self
    }

    /// Reject every cursor the way the merged-collection source does
    pub fn rejecting_cursors(mut self) -> Self {
        self.fail_with_cursor_error = true;
        self
    }

    pub fn calls(&self) -> Vec<PageRequest<Filters>> {
        self.recorder.calls()
    }
}

impl Default for MockVideoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseVideoSource for MockVideoSource {
    async fn list_video_items_paged(
        &self,
        request: PageRequest<Filters>,
    ) -> Result<PageResult<VideoItem>> {
        let has_cursor = request.after.is_some();
        let result = self.recorder.record(request);
        if self.fail_with_cursor_error && has_cursor {
            return Err(resource_query::CursorError::Invalid.into());
        }
        result
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock sources plus handles to inspect them after a request
pub struct TestDependencies {
    pub blog: Arc<MockBlogSource>,
    pub projects: Arc<MockProjectSource>,
    pub videos: Arc<MockVideoSource>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            blog: Arc::new(MockBlogSource::new()),
            projects: Arc::new(MockProjectSource::new()),
            videos: Arc::new(MockVideoSource::new()),
        }
    }

    pub fn with_blog(mut self, blog: MockBlogSource) -> Self {
        self.blog = Arc::new(blog);
        self
    }

    pub fn with_projects(mut self, projects: MockProjectSource) -> Self {
        self.projects = Arc::new(projects);
        self
    }

    pub fn with_videos(mut self, videos: MockVideoSource) -> Self {
        self.videos = Arc::new(videos);
        self
    }

    /// Total adapter calls across all sources
    pub fn total_calls(&self) -> usize {
        self.blog.calls().len() + self.projects.calls().len() + self.videos.calls().len()
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(self.blog.clone(), self.projects.clone(), self.videos.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
