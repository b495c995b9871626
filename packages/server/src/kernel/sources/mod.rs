//! CMS-backed content sources, one per archive.

pub mod blog;
pub mod projects;
pub mod videos;

pub use blog::CmsBlogSource;
pub use projects::CmsProjectSource;
pub use videos::CmsVideoSource;

use super::cms_client::{NodeEdge, Nodes};
use crate::domains::resources::{FeaturedImage, Term};

/// `featuredImage { node { sourceUrl altText } }`
pub(crate) type FeaturedImageEdge = NodeEdge<FeaturedImage>;

/// `{ nodes { name slug } }`
pub(crate) type TermNodes = Nodes<Term>;
