//! Microsoft Graph Client
//!
//! サイト・ドライブ・ドライブアイテムへのHTTPアクセス（Bearer認証とリトライ付き）

use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use super::error::{GraphError, GraphResult};
use super::models::{Drive, DriveCollection, DriveItem, Site, SiteAddress};
use super::retry::{is_retryable_error, is_retryable_status, RetryPolicy};
use crate::adapter::auth::TokenProvider;

pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

// Guards against a server that keeps returning the same nextLink
const MAX_PAGES: usize = 100;

/// Build the shared HTTP client
pub fn build_http_client(timeout_secs: u64) -> GraphResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("spsync/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(GraphError::from)
}

/// Low-level Graph API client
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenProvider,
    retry: RetryPolicy,
}

impl GraphClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: TokenProvider) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Ensure a token can be obtained before touching any resource
    pub async fn authenticate(&self) -> GraphResult<()> {
        self.tokens.token().await.map(|_| ())
    }

    /// Full URL for a Graph endpoint path (absolute URLs pass through)
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    fn item_url(&self, site_id: &str, drive_id: &str, item_path: &str) -> String {
        self.url(&format!(
            "sites/{}/drives/{}/root:/{}",
            site_id, drive_id, item_path
        ))
    }

    /// Look up a site by hostname and path. `None` when Graph answers 404.
    pub async fn get_site(&self, site: &SiteAddress) -> GraphResult<Option<Site>> {
        let url = self.url(&site.graph_path());
        let response = self.send_with_retry(|| self.http.get(&url)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(Self::parse_json(response).await?)),
            _ => Err(Self::error_from(response).await),
        }
    }

    /// All document libraries of a site, following `@odata.nextLink`
    pub async fn list_drives(&self, site_id: &str) -> GraphResult<Vec<Drive>> {
        let mut next = Some(self.url(&format!("sites/{}/drives", site_id)));
        let mut drives = Vec::new();
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(GraphError::InvalidResponse(format!(
                    "drive listing exceeded {} pages",
                    MAX_PAGES
                )));
            }

            let response = self.send_with_retry(|| self.http.get(&url)).await?;
            if !response.status().is_success() {
                return Err(Self::error_from(response).await);
            }

            let page: DriveCollection = Self::parse_json(response).await?;
            drives.extend(page.value);
            next = page.next_link;
        }

        debug!("Site {} has {} drives", site_id, drives.len());
        Ok(drives)
    }

    /// Whether an item exists at `item_path` (already percent-encoded)
    pub async fn item_exists(
        &self,
        site_id: &str,
        drive_id: &str,
        item_path: &str,
    ) -> GraphResult<bool> {
        let url = self.item_url(site_id, drive_id, item_path);
        let response = self.send_with_retry(|| self.http.get(&url)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(Self::error_from(response).await),
        }
    }

    /// Simple upload (`PUT .../content`)
    pub async fn upload_content(
        &self,
        site_id: &str,
        drive_id: &str,
        item_path: &str,
        content: Vec<u8>,
    ) -> GraphResult<DriveItem> {
        let url = format!("{}:/content", self.item_url(site_id, drive_id, item_path));
        debug!("PUT {} ({} bytes)", url, content.len());

        let response = self
            .send_with_retry(|| {
                self.http
                    .put(&url)
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .body(content.clone())
            })
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Self::parse_json(response).await
    }

    // ─── Internal ────────────────────────────────────────────────────

    async fn send_with_retry(&self, build: impl Fn() -> RequestBuilder) -> GraphResult<Response> {
        let token = self.tokens.token().await?;
        let mut retry_count = 0;

        loop {
            match build().bearer_auth(&token).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if is_retryable_status(status) && retry_count < self.retry.max_retries {
                        retry_count += 1;
                        let delay = self.retry.next_delay(retry_count, Some(response.headers()));
                        warn!(
                            "{} returned {}, retry {}/{} in {}ms",
                            response.url().path(),
                            status,
                            retry_count,
                            self.retry.max_retries,
                            delay
                        );
                        sleep(Duration::from_millis(delay)).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if is_retryable_error(&e) && retry_count < self.retry.max_retries {
                        retry_count += 1;
                        let delay = self.retry.next_delay(retry_count, None);
                        warn!(
                            "Request failed (attempt {}), retrying in {}ms: {}",
                            retry_count, delay, e
                        );
                        sleep(Duration::from_millis(delay)).await;
                        continue;
                    }
                    return Err(GraphError::Http(e));
                }
            }
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> GraphResult<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GraphError::InvalidResponse(e.to_string()))
    }

    async fn error_from(response: Response) -> GraphError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        GraphError::from_response(status, &body)
    }
}
