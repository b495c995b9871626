//! Test harness that drives the router in-process.
//!
//! No sockets and no CMS: every content source is a recording mock from
//! `server_core::kernel::test_dependencies`, and requests go through
//! `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::Value;
use server_core::kernel::TestDependencies;
use server_core::server::{build_app, AppOptions};
use test_context::AsyncTestContext;
use tower::ServiceExt;

/// Status and decoded JSON body of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub json: Value,
}

/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &mut TestHarness) {
///     let response = ctx.post("/api/resources/blog", "{}").await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Mock sources - inspect recorded calls after a request.
    pub deps: TestDependencies,
    app: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self::new(TestDependencies::new())
    }

    async fn teardown(self) {}
}

impl TestHarness {
    pub fn new(deps: TestDependencies) -> Self {
        let app = build_app(deps.server_deps(), AppOptions::default());
        Self { deps, app }
    }

    /// Swap in sources with canned responses.
    pub fn use_deps(&mut self, deps: TestDependencies) {
        *self = Self::new(deps);
    }

    pub async fn post(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, json }
    }
}
