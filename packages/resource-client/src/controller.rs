//! Resource search controller.
//!
//! Binds an archive page's search input, filter chips and results grid to
//! the resource endpoint. Every query change starts a new generation; the
//! previous in-flight request is aborted and anything it still produces is
//! dropped before it can reach the cache or the grid.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use resource_query::{PageResult, ResourceKind, ResourceQuery, DEFAULT_PAGE_SIZE};
use tokio_util::sync::CancellationToken;

use crate::cache::PageCache;
use crate::client::PageFetcher;
use crate::error::{ClientError, MountError};
use crate::filter_state::{FilterState, UrlKeys};

/// Debounce applied to query and filter changes by default
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Shortest non-empty search that is sent
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Releases whatever [`ResultsView::attach`] bound.
pub type Cleanup = Box<dyn FnOnce() -> Result<(), MountError> + Send>;

/// Element ids of one archive page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub input: String,
    pub chips: String,
    pub grid: String,
    pub skeleton: String,
    pub empty: String,
    pub count: Option<String>,
}

impl ElementIds {
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self {
            input: format!("{}-search", kind),
            chips: format!("{}-filters", kind),
            grid: format!("{}-grid", kind),
            skeleton: format!("{}-skeleton", kind),
            empty: format!("{}-empty", kind),
            count: Some(format!("{}-count", kind)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MountOptions {
    pub ids: ElementIds,
    pub url_keys: UrlKeys,
    pub min_query_len: usize,
    /// Debounce window for query and filter changes. `None` refreshes
    /// immediately.
    pub defer: Option<Duration>,
    pub page_size: u32,
}

impl MountOptions {
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self {
            ids: ElementIds::for_kind(kind),
            url_keys: UrlKeys::for_kind(kind),
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            defer: Some(DEFAULT_DEBOUNCE),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Unmounted,
    Mounting,
    Mounted,
    Unmounting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Replace the grid contents
    Replace,
    /// Add after the existing cards
    Append,
}

/// What a refresh or load-more call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Not mounted, query too short, or nothing more to load
    Ignored,
    /// Rendered from the cache without a request
    Cached,
    Fetched,
    /// A newer change took over before this one finished
    Superseded,
    /// The request failed; rendered results were left in place
    Failed,
}

/// The page elements the controller drives.
#[async_trait]
pub trait ResultsView<T>: Send + Sync {
    /// Bind to the elements named in `ids`. Fails when they are missing.
    async fn attach(&self, ids: &ElementIds) -> Result<Cleanup, MountError>;

    async fn render(&self, items: &[T], mode: RenderMode);

    async fn set_loading(&self, loading: bool);

    async fn set_empty(&self, empty: bool);

    async fn set_count(&self, count: usize);

    async fn show_load_error(&self, message: &str);
}

struct Inner<T> {
    state: ControllerState,
    cancel_requested: bool,
    cleanup: Option<Cleanup>,
    filters: FilterState,
    cache: PageCache<T>,
    generation: u64,
    pending_change: u64,
    in_flight: Option<CancellationToken>,
    rendered: usize,
}

enum Plan<T> {
    Cached(Vec<T>),
    Fetch(u64, ResourceQuery, CancellationToken),
}

pub struct ResourceSearchController<T> {
    kind: ResourceKind,
    options: MountOptions,
    fetcher: Arc<dyn PageFetcher<T>>,
    view: Arc<dyn ResultsView<T>>,
    inner: Mutex<Inner<T>>,
}

impl<T> ResourceSearchController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        kind: ResourceKind,
        fetcher: Arc<dyn PageFetcher<T>>,
        view: Arc<dyn ResultsView<T>>,
        options: MountOptions,
    ) -> Self {
        Self {
            kind,
            options,
            fetcher,
            view,
            inner: Mutex::new(Inner {
                state: ControllerState::Unmounted,
                cancel_requested: false,
                cleanup: None,
                filters: FilterState::new(),
                cache: PageCache::new(),
                generation: 0,
                pending_change: 0,
                in_flight: None,
                rendered: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn state(&self) -> ControllerState {
        self.lock().state
    }

    pub fn filters(&self) -> FilterState {
        self.lock().filters.clone()
    }

    /// Number of cards currently in the grid
    pub fn rendered_count(&self) -> usize {
        self.lock().rendered
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to the page. Returns whether the controller ended up mounted.
    ///
    /// A failed attach leaves the page as the server rendered it.
    pub async fn mount(&self) -> bool {
        {
            let mut inner = self.lock();
            if inner.state != ControllerState::Unmounted {
                return inner.state == ControllerState::Mounted;
            }
            inner.state = ControllerState::Mounting;
            inner.cancel_requested = false;
            inner.cache = PageCache::new();
        }

        let attached = self.view.attach(&self.options.ids).await;

        let cleanup = {
            let mut inner = self.lock();
            match attached {
                Ok(cleanup) if inner.cancel_requested => {
                    inner.state = ControllerState::Unmounted;
                    cleanup
                }
                Ok(cleanup) => {
                    inner.cleanup = Some(cleanup);
                    inner.state = ControllerState::Mounted;
                    tracing::debug!(kind = %self.kind, "Resource search mounted");
                    return true;
                }
                Err(e) => {
                    inner.state = ControllerState::Unmounted;
                    tracing::warn!(kind = %self.kind, error = %e, "Resource search failed to mount");
                    return false;
                }
            }
        };

        tracing::debug!(kind = %self.kind, "Unmounted while mounting");
        self.run_cleanup(cleanup);
        false
    }

    /// Detach from the page, abort any request and drop cached pages.
    pub async fn unmount(&self) {
        let cleanup = {
            let mut inner = self.lock();
            match inner.state {
                ControllerState::Mounting => {
                    inner.cancel_requested = true;
                    return;
                }
                ControllerState::Mounted => {
                    inner.state = ControllerState::Unmounting;
                    inner.generation += 1;
                    inner.pending_change += 1;
                    if let Some(token) = inner.in_flight.take() {
                        token.cancel();
                    }
                    inner.cache.clear();
                    inner.rendered = 0;
                    inner.cleanup.take()
                }
                ControllerState::Unmounted | ControllerState::Unmounting => return,
            }
        };

        if let Some(cleanup) = cleanup {
            self.run_cleanup(cleanup);
        }
        self.lock().state = ControllerState::Unmounted;
        tracing::debug!(kind = %self.kind, "Resource search unmounted");
    }

    fn run_cleanup(&self, cleanup: Cleanup) {
        if let Err(e) = cleanup() {
            tracing::warn!(kind = %self.kind, error = %e, "Resource search cleanup failed");
        }
    }

    // =========================================================================
    // Filter changes
    // =========================================================================

    /// Change the search text. Non-empty text shorter than the minimum length
    /// is not sent; empty text clears the search.
    pub async fn set_query(&self, text: &str) -> RefreshOutcome {
        let text = text.trim();
        let length = text.chars().count();
        if length > 0 && length < self.options.min_query_len {
            tracing::trace!(length, "Search text below minimum length");
            // Supersedes any debounced refresh for older text
            self.lock().pending_change += 1;
            return RefreshOutcome::Ignored;
        }

        self.lock().filters.search = text.to_string();
        self.schedule_refresh().await
    }

    pub async fn set_facet(&self, name: &str, values: Vec<String>) -> RefreshOutcome {
        self.lock().filters.set_facet(name, values);
        self.schedule_refresh().await
    }

    pub async fn toggle_facet(&self, name: &str, slug: &str) -> RefreshOutcome {
        self.lock().filters.toggle(name, slug);
        self.schedule_refresh().await
    }

    /// Replace the filter state with the one encoded in `query` and refresh.
    pub async fn restore_from_url(&self, query: &str) -> RefreshOutcome {
        self.lock().filters = FilterState::from_url_query(&self.options.url_keys, query);
        self.refresh().await
    }

    /// Query string describing the current filters
    pub fn url_query(&self) -> String {
        self.lock().filters.to_url_query(&self.options.url_keys)
    }

    async fn schedule_refresh(&self) -> RefreshOutcome {
        let Some(delay) = self.options.defer else {
            return self.refresh().await;
        };

        let token = {
            let mut inner = self.lock();
            inner.pending_change += 1;
            inner.pending_change
        };

        tokio::time::sleep(delay).await;

        let latest = self.lock().pending_change;
        if latest != token {
            return RefreshOutcome::Superseded;
        }
        self.refresh().await
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Show the first page for the current filters, from cache when possible.
    pub async fn refresh(&self) -> RefreshOutcome {
        let plan = {
            let mut inner = self.lock();
            if inner.state != ControllerState::Mounted {
                return RefreshOutcome::Ignored;
            }

            inner.generation += 1;
            if let Some(token) = inner.in_flight.take() {
                token.cancel();
            }

            let query = inner.filters.to_query(self.options.page_size);
            let pages = inner.cache.get(self.kind, &query);
            if pages.is_empty() {
                let token = CancellationToken::new();
                inner.in_flight = Some(token.clone());
                Plan::Fetch(inner.generation, query, token)
            } else {
                let cached: Vec<T> = pages.iter().flat_map(|page| page.items.iter().cloned()).collect();
                inner.rendered = cached.len();
                Plan::Cached(cached)
            }
        };

        let (generation, query, cancel) = match plan {
            Plan::Cached(items) => {
                tracing::debug!(kind = %self.kind, items = items.len(), "Rendering cached pages");
                self.view.set_loading(false).await;
                self.show(&items, RenderMode::Replace, items.len()).await;
                return RefreshOutcome::Cached;
            }
            Plan::Fetch(generation, query, cancel) => (generation, query, cancel),
        };

        self.view.set_loading(true).await;
        let result = self.fetch_cancellable(&query, &cancel).await;
        self.complete(generation, query, result, RenderMode::Replace).await
    }

    /// Fetch and append the next page when the last cached page has one.
    pub async fn load_more(&self) -> RefreshOutcome {
        let (generation, query, cancel) = {
            let mut inner = self.lock();
            if inner.state != ControllerState::Mounted || inner.in_flight.is_some() {
                return RefreshOutcome::Ignored;
            }

            let query = inner.filters.to_query(self.options.page_size);
            let cursor = match inner
                .cache
                .get(self.kind, &query)
                .last()
                .and_then(|page| page.page_info.next_cursor())
            {
                Some(cursor) => cursor.to_string(),
                None => return RefreshOutcome::Ignored,
            };

            let token = CancellationToken::new();
            inner.in_flight = Some(token.clone());
            (inner.generation, query.after(cursor), token)
        };

        self.view.set_loading(true).await;
        let result = self.fetch_cancellable(&query, &cancel).await;
        self.complete(generation, query, result, RenderMode::Append).await
    }

    async fn fetch_cancellable(
        &self,
        query: &ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<PageResult<T>, ClientError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Aborted),
            result = self.fetcher.fetch(self.kind, query) => result,
        }
    }

    /// Store and render a finished request if it still belongs to the
    /// current generation.
    async fn complete(
        &self,
        generation: u64,
        query: ResourceQuery,
        result: Result<PageResult<T>, ClientError>,
        mode: RenderMode,
    ) -> RefreshOutcome {
        let outcome = {
            let mut inner = self.lock();
            if inner.generation != generation || inner.state != ControllerState::Mounted {
                tracing::debug!(kind = %self.kind, generation, "Discarding stale page");
                return RefreshOutcome::Superseded;
            }
            inner.in_flight = None;

            result.map(|page| {
                let mut pages = match mode {
                    RenderMode::Replace => Vec::with_capacity(1),
                    RenderMode::Append => inner.cache.get(self.kind, &query).to_vec(),
                };
                pages.push(page.clone());
                inner.cache.set(self.kind, &query, pages);

                inner.rendered = match mode {
                    RenderMode::Replace => page.items.len(),
                    RenderMode::Append => inner.rendered + page.items.len(),
                };
                (page.items, inner.rendered)
            })
        };

        self.view.set_loading(false).await;
        match outcome {
            Ok((items, rendered)) => {
                self.show(&items, mode, rendered).await;
                RefreshOutcome::Fetched
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind, error = %e, "Failed to load resources");
                self.view.show_load_error(&e.to_string()).await;
                RefreshOutcome::Failed
            }
        }
    }

    async fn show(&self, items: &[T], mode: RenderMode, rendered: usize) {
        self.view.render(items, mode).await;
        self.view.set_empty(rendered == 0).await;
        if self.options.ids.count.is_some() {
            self.view.set_count(rendered).await;
        }
    }
}
