//! Server dependencies for request handlers (using traits for testability)
//!
//! Every content source sits behind a trait object so tests can swap in the
//! recording mocks from `test_dependencies`.

use std::sync::Arc;

use super::{
    BaseBlogSource, BaseProjectSource, BaseVideoSource, CmsBlogSource, CmsClient,
    CmsProjectSource, CmsVideoSource,
};

/// Content sources available to the resources domain
#[derive(Clone)]
pub struct ServerDeps {
    pub blog: Arc<dyn BaseBlogSource>,
    pub projects: Arc<dyn BaseProjectSource>,
    pub videos: Arc<dyn BaseVideoSource>,
}

impl ServerDeps {
    pub fn new(
        blog: Arc<dyn BaseBlogSource>,
        projects: Arc<dyn BaseProjectSource>,
        videos: Arc<dyn BaseVideoSource>,
    ) -> Self {
        Self {
            blog,
            projects,
            videos,
        }
    }

    /// Wire all three sources to the same CMS client.
    pub fn from_cms(client: CmsClient) -> Self {
        let client = Arc::new(client);
        Self::new(
            Arc::new(CmsBlogSource::new(client.clone())),
            Arc::new(CmsProjectSource::new(client.clone())),
            Arc::new(CmsVideoSource::new(client)),
        )
    }
}
