use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The archive a page request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Blog,
    Project,
    Video,
}

/// Returned when a path segment names no known archive.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown resource kind")]
pub struct UnknownKind(pub String);

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Blog, ResourceKind::Project, ResourceKind::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Blog => "blog",
            ResourceKind::Project => "project",
            ResourceKind::Video => "video",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(ResourceKind::Blog),
            "project" => Ok(ResourceKind::Project),
            "video" => Ok(ResourceKind::Video),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}
