//! GraphQL client for the headless CMS.

use std::time::Duration;

use resource_query::{PageInfo, PageResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// GraphQL request body
#[derive(Debug, Serialize)]
struct GraphQLRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

/// Error type for CMS requests
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS request timed out after {0:?}")]
    Timeout(Duration),

    #[error("CMS request failed: {0}")]
    Network(reqwest::Error),

    #[error("CMS returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("CMS GraphQL error: {0}")]
    GraphQL(String),

    #[error("CMS returned no data")]
    NoData,
}

/// Relay-style connection as the CMS returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default = "Vec::new")]
    pub nodes: Vec<N>,
}

impl<N> Connection<N> {
    pub fn into_page<T>(self, f: impl FnMut(N) -> T) -> PageResult<T> {
        PageResult::new(self.nodes.into_iter().map(f).collect(), self.page_info)
    }
}

/// Wrapper for `{ nodes: [...] }` edges such as a post's categories.
#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<N> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<N>,
}

impl<N> Default for Nodes<N> {
    fn default() -> Self {
        Nodes { nodes: Vec::new() }
    }
}

/// Wrapper for `{ node: {...} }` edges such as a featured image.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeEdge<N> {
    pub node: N,
}

pub struct CmsClient {
    client: reqwest::Client,
    endpoint: url::Url,
    auth_token: Option<String>,
    timeout: Duration,
}

impl CmsClient {
    /// Create a new CMS client with a fixed per-request timeout
    pub fn new(endpoint: url::Url, timeout: Duration) -> Result<Self, CmsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CmsError::Network)?;

        Ok(Self {
            client,
            endpoint,
            auth_token: None,
            timeout,
        })
    }

    /// Authenticate requests with a bearer token (preview/private content)
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    /// Execute a GraphQL query
    pub async fn query<V, R>(&self, query: &str, variables: V) -> Result<R, CmsError>
    where
        V: Serialize,
        R: DeserializeOwned,
    {
        let request = GraphQLRequest { query, variables };

        let mut req = self.client.post(self.endpoint.clone()).json(&request);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CmsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let graphql_response: GraphQLResponse<R> =
            response.json().await.map_err(|e| self.classify(e))?;

        if let Some(first_error) = graphql_response.errors.and_then(|e| e.into_iter().next()) {
            return Err(CmsError::GraphQL(first_error.message));
        }

        graphql_response.data.ok_or(CmsError::NoData)
    }

    fn classify(&self, err: reqwest::Error) -> CmsError {
        if err.is_timeout() {
            tracing::warn!(endpoint = %self.endpoint, timeout = ?self.timeout, "CMS request timed out");
            CmsError::Timeout(self.timeout)
        } else {
            CmsError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[derive(Debug, Deserialize)]
    struct Node {
        id: i64,
    }

    #[test]
    fn connection_converts_to_page() {
        let connection: Connection<Node> = serde_json::from_value(json!({
            "pageInfo": {"hasNextPage": true, "endCursor": "YXJyYXk6MQ=="},
            "nodes": [{"id": 1}, {"id": 2}],
        }))
        .unwrap();

        let page = connection.into_page(|n| n.id);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.page_info, PageInfo::next("YXJyYXk6MQ=="));
    }

    #[test]
    fn connection_tolerates_missing_fields() {
        let connection: Connection<Node> = serde_json::from_value(json!({})).unwrap();
        let page = connection.into_page(|n| n.id);
        assert!(page.items.is_empty());
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn graphql_errors_take_priority() {
        let response: GraphQLResponse<serde_json::Value> = serde_json::from_value(json!({
            "data": null,
            "errors": [{"message": "Cannot query field \"projects\""}],
        }))
        .unwrap();
        assert_eq!(response.errors.unwrap()[0].message, "Cannot query field \"projects\"");
    }

    /// Serve `router` on a loopback port and return its URL.
    async fn serve(router: Router) -> url::Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        url::Url::parse(&format!("http://{}/graphql", addr)).unwrap()
    }

    async fn client_for(router: Router, timeout: Duration) -> CmsClient {
        CmsClient::new(serve(router).await, timeout).unwrap()
    }

    #[tokio::test]
    async fn slow_upstream_is_a_timeout() {
        let router = Router::new().route(
            "/graphql",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"data": {}}))
            }),
        );
        let client = client_for(router, Duration::from_millis(100)).await;

        let result: Result<Value, _> = client.query("{ posts { nodes { id } } }", json!({})).await;

        match result {
            Err(CmsError::Timeout(after)) => assert_eq!(after, Duration::from_millis(100)),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_success_status_keeps_the_body() {
        let router = Router::new().route(
            "/graphql",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = client_for(router, Duration::from_secs(5)).await;

        let result: Result<Value, _> = client.query("{ posts { nodes { id } } }", json!({})).await;

        match result {
            Err(CmsError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn graphql_error_wins_over_null_data() {
        let router = Router::new().route(
            "/graphql",
            post(|| async {
                Json(json!({"data": null, "errors": [{"message": "boom"}, {"message": "second"}]}))
            }),
        );
        let client = client_for(router, Duration::from_secs(5)).await;

        let result: Result<Value, _> = client.query("{ posts { nodes { id } } }", json!({})).await;

        assert!(matches!(result, Err(CmsError::GraphQL(message)) if message == "boom"));
    }

    #[tokio::test]
    async fn missing_data_is_no_data() {
        let router = Router::new().route("/graphql", post(|| async { Json(json!({})) }));
        let client = client_for(router, Duration::from_secs(5)).await;

        let result: Result<Value, _> = client.query("{ posts { nodes { id } } }", json!({})).await;

        assert!(matches!(result, Err(CmsError::NoData)));
    }

    #[tokio::test]
    async fn sends_bearer_token_and_variables() {
        let router = Router::new().route(
            "/graphql",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({"data": {"auth": auth, "variables": body["variables"]}}))
            }),
        );
        let client = client_for(router, Duration::from_secs(5))
            .await
            .with_token(Some("preview-token".into()));

        let data: Value = client
            .query("query($first: Int!) { posts(first: $first) { nodes { id } } }", json!({"first": 3}))
            .await
            .unwrap();

        assert_eq!(data["auth"], "Bearer preview-token");
        assert_eq!(data["variables"], json!({"first": 3}));
    }
}
