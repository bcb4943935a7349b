use crate::config::GalleryConfig;
use crate::error::Result;
use crate::github::{build_http_client, GitHubClient};
use crate::page::ResultsContainer;
use crate::readme::ReadmeResolver;
use crate::render::{RenderMode, Renderer};
use crate::types::{ReadmeOutcome, RepositoryRecord};
use futures::stream::{FuturesOrdered, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of one successful page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page: u32,
    pub fetched: usize,
    pub rendered: usize,
    pub with_readme: usize,
}

/// Session state for one gallery: which page comes next and whether the
/// search has run out of results.
pub struct GalleryController {
    client: GitHubClient,
    resolver: Option<ReadmeResolver>,
    renderer: Renderer,
    current_page: u32,
    exhausted: bool,
}

impl GalleryController {
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        config.validate()?;

        let http = build_http_client(config)?;
        let client = GitHubClient::with_client(http.clone(), config)?;
        let resolver = match config.mode {
            RenderMode::Rich => Some(ReadmeResolver::with_client(http, config)?),
            RenderMode::Simple => None,
        };

        Ok(GalleryController {
            client,
            resolver,
            renderer: Renderer::with_raw_base(config.mode, GalleryConfig::parse_base(&config.raw_base_url)?),
            current_page: 1,
            exhausted: false,
        })
    }

    /// The page the next call to [`load_next_page`](Self::load_next_page) fetches.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    /// Fetch the current page, render every item and append the entries in
    /// the order the search API ranked them, each as soon as it is ready.
    ///
    /// A failed search leaves both the container and the page counter
    /// untouched. README failures only drop that entry's body.
    pub async fn load_next_page<C>(&mut self, container: &mut C) -> Result<PageSummary>
    where
        C: ResultsContainer + ?Sized,
    {
        let page = self.current_page;

        if self.exhausted {
            debug!(page, "Gallery exhausted, skipping fetch");
            return Ok(PageSummary {
                page,
                fetched: 0,
                rendered: 0,
                with_readme: 0,
            });
        }

        let records = match self.client.fetch_repositories(page).await {
            Ok(records) => records,
            Err(e) => {
                warn!(page, error = %e, "Failed to fetch repository page");
                return Err(e);
            }
        };

        let mut summary = PageSummary {
            page,
            fetched: records.len(),
            rendered: 0,
            with_readme: 0,
        };

        // Resolutions run concurrently. Each entry is appended once it and
        // every entry ranked above it are ready, so a slow README only holds
        // back the entries below it.
        let this = &*self;
        let mut pending: FuturesOrdered<_> = records
            .iter()
            .map(|record| async move { (record, this.readme_for(record).await) })
            .collect();
        while let Some((record, readme)) = pending.next().await {
            let entry = this.renderer.render(record, readme.as_deref());
            if entry.has_body() {
                summary.with_readme += 1;
            }
            container.append(entry);
            summary.rendered += 1;
        }
        drop(pending);

        self.current_page += 1;
        if records.is_empty() {
            self.exhausted = true;
            info!(page, "No more repositories for topic {}", self.client.topic());
        } else {
            info!(page, rendered = summary.rendered, with_readme = summary.with_readme, "Page rendered");
        }

        Ok(summary)
    }

    async fn readme_for(&self, record: &RepositoryRecord) -> Option<String> {
        let resolver = self.resolver.as_ref()?;
        match resolver
            .resolve_readme(&record.owner.login, &record.name, &record.default_branch)
            .await
        {
            Ok(outcome) => outcome.into_content(),
            Err(e) => {
                warn!(repo = %record.full_name, error = %e, "README lookup failed, rendering without body");
                None
            }
        }
    }

    /// One-off README lookup for a record, outside of page loading.
    pub async fn resolve_readme(&self, record: &RepositoryRecord) -> Result<ReadmeOutcome> {
        match &self.resolver {
            Some(resolver) => {
                resolver
                    .resolve_readme(&record.owner.login, &record.name, &record.default_branch)
                    .await
            }
            None => Ok(ReadmeOutcome::NotFound),
        }
    }
}
