use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use resource_query::ProjectsArchiveFilters;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{FeaturedImageEdge, TermNodes};
use crate::domains::resources::{Project, ProjectSearchResult};
use crate::kernel::cms_client::{CmsClient, Connection};
use crate::kernel::{BaseProjectSource, PageRequest};

const LIST_PROJECTS_QUERY: &str = r#"
query ListProjects($first: Int!, $after: String, $search: String, $taxQuery: TaxQuery) {
  projects(
    first: $first
    after: $after
    where: {
      status: PUBLISH
      search: $search
      taxQuery: $taxQuery
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
      featuredImage { node { sourceUrl altText } }
      materialTypes { nodes { name slug } }
      roofColors { nodes { name slug } }
      serviceAreas { nodes { name slug } }
    }
  }
}
"#;

/// Build the CMS taxonomy query for the selected facets.
///
/// Facets combine with AND; slugs within one facet combine with IN. No
/// selected facets means no taxonomy restriction at all.
fn tax_query(filters: &ProjectsArchiveFilters) -> Option<Value> {
    let facets = [
        ("MATERIALTYPE", &filters.material_type_slugs),
        ("ROOFCOLOR", &filters.roof_color_slugs),
        ("SERVICEAREA", &filters.service_area_slugs),
    ];

    let clauses: Vec<Value> = facets
        .into_iter()
        .filter(|(_, slugs)| !slugs.is_empty())
        .map(|(taxonomy, slugs)| {
            json!({
                "taxonomy": taxonomy,
                "field": "SLUG",
                "terms": slugs,
                "operator": "IN",
            })
        })
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(json!({ "relation": "AND", "taxArray": clauses }))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectsVariables {
    first: u32,
    after: Option<String>,
    search: Option<String>,
    tax_query: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ProjectsData {
    projects: Connection<ProjectNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectNode {
    database_id: i64,
    slug: Option<String>,
    title: Option<String>,
    uri: Option<String>,
    date: Option<String>,
    featured_image: Option<FeaturedImageEdge>,
    material_types: Option<TermNodes>,
    roof_colors: Option<TermNodes>,
    service_areas: Option<TermNodes>,
}

impl From<ProjectNode> for Project {
    fn from(node: ProjectNode) -> Self {
        Project {
            id: node.database_id,
            slug: node.slug.unwrap_or_default(),
            title: node.title.unwrap_or_default(),
            uri: node.uri.unwrap_or_default(),
            date: node.date.unwrap_or_default(),
            featured_image: node.featured_image.map(|edge| edge.node),
            material_types: node.material_types.unwrap_or_default().nodes,
            roof_colors: node.roof_colors.unwrap_or_default().nodes,
            service_areas: node.service_areas.unwrap_or_default().nodes,
        }
    }
}

/// Project gallery from the CMS, filtered by facet taxonomies.
pub struct CmsProjectSource {
    client: Arc<CmsClient>,
}

impl CmsProjectSource {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BaseProjectSource for CmsProjectSource {
    async fn list_projects_paged(
        &self,
        request: PageRequest<ProjectsArchiveFilters>,
    ) -> Result<ProjectSearchResult> {
        let variables = ProjectsVariables {
            first: request.first,
            tax_query: tax_query(&request.filters),
            search: request.filters.search,
            after: request.after,
        };
        tracing::debug!(
            first = variables.first,
            after = ?variables.after,
            search = ?variables.search,
            faceted = variables.tax_query.is_some(),
            "Listing projects"
        );

        let data: ProjectsData = self.client.query(LIST_PROJECTS_QUERY, &variables).await?;
        Ok(data.projects.into_page(Project::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_facets_means_no_tax_query() {
        let filters = ProjectsArchiveFilters {
            search: Some("cedar".into()),
            ..Default::default()
        };
        assert_eq!(tax_query(&filters), None);
    }

    #[test]
    fn selected_facets_are_anded() {
        let filters = ProjectsArchiveFilters {
            search: None,
            material_type_slugs: vec!["tile".into(), "metal".into()],
            roof_color_slugs: vec![],
            service_area_slugs: vec!["round-rock".into()],
        };

        assert_eq!(
            tax_query(&filters),
            Some(json!({
                "relation": "AND",
                "taxArray": [
                    {"taxonomy": "MATERIALTYPE", "field": "SLUG", "terms": ["tile", "metal"], "operator": "IN"},
                    {"taxonomy": "SERVICEAREA", "field": "SLUG", "terms": ["round-rock"], "operator": "IN"},
                ],
            }))
        );
    }

    #[test]
    fn maps_project_terms() {
        let node: ProjectNode = serde_json::from_value(json!({
            "databaseId": 40,
            "slug": "hill-country-standing-seam",
            "title": "Hill Country standing seam",
            "uri": "/projects/hill-country-standing-seam/",
            "date": "2024-05-11T12:00:00",
            "featuredImage": null,
            "materialTypes": {"nodes": [{"name": "Metal", "slug": "metal"}]},
            "roofColors": null,
            "serviceAreas": {"nodes": []},
        }))
        .unwrap();

        let project = Project::from(node);
        assert_eq!(project.material_types[0].slug, "metal");
        assert!(project.roof_colors.is_empty());
        assert!(project.featured_image.is_none());
    }
}
