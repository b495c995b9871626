pub mod blog_post;
pub mod project;
pub mod video;

pub use blog_post::*;
pub use project::*;
pub use video::*;

use serde::{Deserialize, Serialize};

/// Taxonomy term attached to an archive item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub slug: String,
}

/// Featured image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedImage {
    pub source_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}
