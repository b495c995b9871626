//! HTTP client for the resource archive endpoint.

use std::time::Duration;

use async_trait::async_trait;
use resource_query::{PageResult, ResourceKind, ResourceQuery};
use serde::{de::DeserializeOwned, Deserialize};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::ClientError;

/// Anything that can produce a page for `(kind, query)`.
///
/// The controller only talks to this trait, so it can run against the HTTP
/// client or an in-memory double.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch(&self, kind: ResourceKind, query: &ResourceQuery) -> Result<PageResult<T>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for `POST {base}/api/resources/{kind}`
#[derive(Clone)]
pub struct ResourceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ResourceClient {
    /// Create a client for the site at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: directory_url(base_url)?,
        })
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: directory_url(base_url)?,
        })
    }

    pub fn endpoint(&self, kind: ResourceKind) -> Result<Url, ClientError> {
        Ok(self.base_url.join(&format!("api/resources/{}", kind))?)
    }

    /// Fetch one page. Non-success statuses become [`ClientError::Status`]
    /// carrying the server's `error` message when it sent one.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        query: &ResourceQuery,
    ) -> Result<PageResult<T>, ClientError> {
        let response = self.client.post(self.endpoint(kind)?).json(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::warn!(kind = %kind, status = status.as_u16(), message = %message, "Page request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch one page, giving up with [`ClientError::Aborted`] as soon as
    /// `cancel` fires. An already-cancelled token sends nothing.
    pub async fn fetch_page_cancellable<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        query: &ResourceQuery,
        cancel: &CancellationToken,
    ) -> Result<PageResult<T>, ClientError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Aborted),
            result = self.fetch_page(kind, query) => result,
        }
    }
}

#[async_trait]
impl<T> PageFetcher<T> for ResourceClient
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, kind: ResourceKind, query: &ResourceQuery) -> Result<PageResult<T>, ClientError> {
        self.fetch_page(kind, query).await
    }
}

/// Parse `base_url` so relative joins land beneath its path.
fn directory_url(base_url: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_under_base_path() {
        let client = ResourceClient::new("https://www.example.com").unwrap();
        assert_eq!(
            client.endpoint(ResourceKind::Project).unwrap().as_str(),
            "https://www.example.com/api/resources/project"
        );

        let client = ResourceClient::new("https://www.example.com/staging").unwrap();
        assert_eq!(
            client.endpoint(ResourceKind::Video).unwrap().as_str(),
            "https://www.example.com/staging/api/resources/video"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        assert!(matches!(
            ResourceClient::new("/api"),
            Err(ClientError::Url(_))
        ));
    }
}
