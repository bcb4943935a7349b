use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::github::build_http_client;
use crate::types::ReadmeOutcome;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

/// Body served by the raw-content host for a missing file.
pub const NOT_FOUND_SENTINEL: &str = "404: Not Found";

/// Why a single candidate did not produce a README.
#[derive(Debug)]
enum CandidateFailure {
    Absent,
    Failed(GalleryError),
}

/// Looks up README files on the raw-content host.
pub struct ReadmeResolver {
    client: Client,
    raw_base: Url,
    candidates: Vec<String>,
}

impl ReadmeResolver {
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        config.validate()?;
        let client = build_http_client(config)?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &GalleryConfig) -> Result<Self> {
        Ok(ReadmeResolver {
            client,
            raw_base: GalleryConfig::parse_base(&config.raw_base_url)?,
            candidates: config.readme_candidates.clone(),
        })
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn candidate_url(&self, owner: &str, repo: &str, branch: &str, candidate: &str) -> Result<Url> {
        let mut url = self.raw_base.clone();
        url.path_segments_mut()
            .map_err(|_| GalleryError::ConfigError(format!("'{}' cannot be used as a base URL", self.raw_base)))?
            .pop_if_empty()
            .extend([owner, repo, branch, candidate]);
        Ok(url)
    }

    async fn fetch_candidate(&self, url: Url) -> std::result::Result<String, CandidateFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CandidateFailure::Failed(e.into()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(CandidateFailure::Absent),
            status if !status.is_success() => {
                return Err(CandidateFailure::Failed(GalleryError::ApiError(format!(
                    "Raw content request for {} failed with status {}",
                    url, status
                ))));
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| CandidateFailure::Failed(e.into()))?;

        // Only an exact match is absence; a README may legitimately begin with this text.
        if body == NOT_FOUND_SENTINEL {
            return Err(CandidateFailure::Absent);
        }

        Ok(body)
    }

    /// Race every candidate filename and return the first one that resolves.
    ///
    /// Returns [`ReadmeOutcome::NotFound`] when every candidate is absent. An
    /// error is returned only when nothing succeeded and at least one
    /// candidate failed for a reason other than absence.
    pub async fn resolve_readme(&self, owner: &str, repo: &str, branch: &str) -> Result<ReadmeOutcome> {
        let mut pending = FuturesUnordered::new();
        for candidate in &self.candidates {
            let url = self.candidate_url(owner, repo, branch, candidate)?;
            pending.push(async move { (candidate.as_str(), self.fetch_candidate(url).await) });
        }

        let full_name = format!("{}/{}", owner, repo);
        let mut last_error = None;
        while let Some((candidate, result)) = pending.next().await {
            match result {
                Ok(content) => {
                    debug!(repo = %full_name, candidate, "README resolved");
                    return Ok(ReadmeOutcome::Found(content));
                }
                Err(CandidateFailure::Absent) => {
                    debug!(repo = %full_name, candidate, "README candidate absent");
                }
                Err(CandidateFailure::Failed(e)) => {
                    warn!(repo = %full_name, candidate, error = %e, "README candidate failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(ReadmeOutcome::NotFound),
        }
    }
}
