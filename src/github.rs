use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::types::{RepositoryRecord, SearchResponse};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

pub(crate) fn build_http_client(config: &GalleryConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.as_str());
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Unauthenticated client for the repository search endpoint.
pub struct GitHubClient {
    client: Client,
    api_base: Url,
    topic: String,
}

impl GitHubClient {
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        config.validate()?;
        let client = build_http_client(config)?;
        Self::with_client(client, config)
    }

    /// Shares an existing connection pool with the caller.
    pub fn with_client(client: Client, config: &GalleryConfig) -> Result<Self> {
        Ok(GitHubClient {
            client,
            api_base: GalleryConfig::parse_base(&config.api_base_url)?,
            topic: config.topic.clone(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// `{api_base}/search/repositories?q=topic:<topic>&sort=stars&page=<page>`
    pub fn search_url(&self, page: u32) -> Result<Url> {
        if page == 0 {
            return Err(GalleryError::InvalidPage(page));
        }

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| GalleryError::ConfigError(format!("'{}' cannot be used as a base URL", self.api_base)))?
            .pop_if_empty()
            .extend(["search", "repositories"]);
        url.query_pairs_mut()
            .append_pair("q", &format!("topic:{}", self.topic))
            .append_pair("sort", "stars")
            .append_pair("page", &page.to_string());

        Ok(url)
    }

    async fn make_request(&self, url: &Url) -> Result<Response> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", ACCEPT_HEADER)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(GalleryError::NotFound(format!("Resource not found: {}", url))),
            StatusCode::FORBIDDEN if rate_limit_exhausted(&response) => {
                let reset = response
                    .headers()
                    .get("X-RateLimit-Reset")
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                Err(GalleryError::RateLimitExceeded(format!(
                    "Search API rate limit exhausted, resets at epoch {}",
                    reset
                )))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(GalleryError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    /// Fetch one page of repositories tagged with the configured topic.
    ///
    /// Exactly one request is made; failures are returned, never retried.
    pub async fn fetch_search_page(&self, page: u32) -> Result<SearchResponse> {
        let url = self.search_url(page)?;
        debug!(page, %url, "Fetching repository search page");

        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let search: SearchResponse = serde_json::from_str(&body)?;

        if search.incomplete_results {
            warn!(page, "GitHub reported incomplete search results");
        }
        debug!(page, items = search.items.len(), total = search.total_count, "Search page received");

        Ok(search)
    }

    pub async fn fetch_repositories(&self, page: u32) -> Result<Vec<RepositoryRecord>> {
        Ok(self.fetch_search_page(page).await?.items)
    }
}

fn rate_limit_exhausted(response: &Response) -> bool {
    response
        .headers()
        .get("X-RateLimit-Remaining")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        == Some(0)
}
