use serde::{Deserialize, Serialize};

use super::{FeaturedImage, Term};

/// Blog archive entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub uri: String,
    /// Publish date as returned by the CMS (ISO 8601, site-local).
    pub date: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<FeaturedImage>,
    pub categories: Vec<Term>,
}
