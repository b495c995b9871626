//! Archive page client.
//!
//! Consumes `POST /api/resources/{kind}` from an archive page:
//!
//! - [`ResourceClient`] issues page requests (optionally cancellable)
//! - [`PageCache`] remembers pages already fetched per query shape
//! - [`ResourceSearchController`] ties a page's search box, filter chips and
//!   results grid to the two above, one query generation at a time
//!
//! # Example
//!
//! ```rust,ignore
//! use resource_client::{MountOptions, ResourceClient, ResourceSearchController};
//! use resource_query::ResourceKind;
//!
//! let client = Arc::new(ResourceClient::new("https://www.example.com")?);
//! let controller = ResourceSearchController::new(
//!     ResourceKind::Project,
//!     client,
//!     view,
//!     MountOptions::for_kind(ResourceKind::Project),
//! );
//!
//! if controller.mount().await {
//!     controller.restore_from_url("?mt=tile,metal").await;
//!     controller.set_query("cedar").await;
//!     controller.load_more().await;
//! }
//! controller.unmount().await;
//! ```

pub mod cache;
pub mod client;
pub mod controller;
pub mod error;
pub mod filter_state;

pub use cache::{key_of, PageCache};
pub use client::{PageFetcher, ResourceClient};
pub use controller::{
    Cleanup, ControllerState, ElementIds, MountOptions, RefreshOutcome, RenderMode,
    ResourceSearchController, ResultsView,
};
pub use error::{ClientError, MountError};
pub use filter_state::{FilterState, UrlKeys};
