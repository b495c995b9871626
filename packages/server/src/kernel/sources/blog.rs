use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use resource_query::{search_term, text_filter, Filters, PageResult};
use serde::{Deserialize, Serialize};

use super::{FeaturedImageEdge, TermNodes};
use crate::domains::resources::BlogPost;
use crate::kernel::cms_client::{CmsClient, Connection};
use crate::kernel::{BaseBlogSource, PageRequest};

const LIST_POSTS_QUERY: &str = r#"
query ListPosts($first: Int!, $after: String, $search: String, $categoryName: String) {
  posts(
    first: $first
    after: $after
    where: {
      status: PUBLISH
      search: $search
      categoryName: $categoryName
      orderby: { field: DATE, order: DESC }
    }
  ) {
    pageInfo { hasNextPage endCursor }
    nodes {
      databaseId
      slug
      title
      uri
      date
      excerpt
      featuredImage { node { sourceUrl altText } }
      categories { nodes { name slug } }
    }
  }
}
"#;

/// Keys the blog archive reads a category slug from.
const CATEGORY_KEYS: [&str; 2] = ["category", "cat"];

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostsVariables {
    first: u32,
    after: Option<String>,
    search: Option<String>,
    category_name: Option<String>,
}

impl PostsVariables {
    fn from_request(request: PageRequest<Filters>) -> Self {
        PostsVariables {
            first: request.first,
            search: search_term(&request.filters),
            category_name: text_filter(&request.filters, &CATEGORY_KEYS),
            after: request.after,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: Connection<PostNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostNode {
    database_id: i64,
    slug: Option<String>,
    title: Option<String>,
    uri: Option<String>,
    date: Option<String>,
    excerpt: Option<String>,
    featured_image: Option<FeaturedImageEdge>,
    #[serde(default)]
    categories: Option<TermNodes>,
}

impl From<PostNode> for BlogPost {
    fn from(node: PostNode) -> Self {
        BlogPost {
            id: node.database_id,
            slug: node.slug.unwrap_or_default(),
            title: node.title.unwrap_or_default(),
            uri: node.uri.unwrap_or_default(),
            date: node.date.unwrap_or_default(),
            excerpt: node.excerpt.filter(|e| !e.trim().is_empty()),
            featured_image: node.featured_image.map(|edge| edge.node),
            categories: node.categories.unwrap_or_default().nodes,
        }
    }
}

/// Blog posts from the CMS, cursor-paginated by the CMS itself.
pub struct CmsBlogSource {
    client: Arc<CmsClient>,
}

impl CmsBlogSource {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseBlogSource for CmsBlogSource {
    async fn list_posts_paged(&self, request: PageRequest<Filters>) -> Result<PageResult<BlogPost>> {
        let variables = PostsVariables::from_request(request);
        tracing::debug!(
            first = variables.first,
            after = ?variables.after,
            search = ?variables.search,
            category = ?variables.category_name,
            "Listing blog posts"
        );

        let data: PostsData = self.client.query(LIST_POSTS_QUERY, &variables).await?;
        Ok(data.posts.into_page(BlogPost::from))
    }
}
