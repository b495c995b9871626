use serde::{Deserialize, Serialize};

use super::Term;

/// Which CMS collection a video came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoOrigin {
    /// Standalone video entry
    Video,
    /// Walkthrough video attached to a project
    Project,
}

/// Video archive entry (merged across both collections)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    /// Unique across both collections, e.g. `video-12` or `project-40`.
    pub id: String,
    pub origin: VideoOrigin,
    pub title: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub uri: String,
    pub date: String,
    pub categories: Vec<Term>,
}

impl VideoItem {
    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug == slug)
    }

    pub fn matches_search(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
    }
}
