use resource_query::PageResult;
use serde::{Deserialize, Serialize};

use super::{FeaturedImage, Term};

/// Project gallery entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub uri: String,
    pub date: String,
    pub featured_image: Option<FeaturedImage>,
    pub material_types: Vec<Term>,
    pub roof_colors: Vec<Term>,
    pub service_areas: Vec<Term>,
}

/// Page of the project archive.
pub type ProjectSearchResult = PageResult<Project>;
