//! Kernel module - server infrastructure and dependencies.

pub mod cms_client;
pub mod deps;
pub mod sources;
pub mod test_dependencies;
pub mod traits;

pub use cms_client::{CmsClient, CmsError, Connection};
pub use deps::ServerDeps;
pub use sources::{CmsBlogSource, CmsProjectSource, CmsVideoSource};
pub use test_dependencies::{
    MockBlogSource, MockProjectSource, MockVideoSource, TestDependencies,
};
pub use traits::*;
