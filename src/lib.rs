//! Discovers plugin repositories tagged with a GitHub topic and renders them
//! as sanitized gallery entries.
//!
//! [`GalleryController`] holds the session state (next page, exhaustion) and
//! drives the [`GitHubClient`] search, optional [`ReadmeResolver`] lookups and
//! the [`Renderer`]. Entries land in a [`ResultsContainer`]; [`GalleryPage`]
//! bundles that container with the sidebar and dispatches UI events.

pub mod config;
pub mod controller;
pub mod error;
pub mod github;
pub mod page;
pub mod readme;
pub mod render;
pub mod types;

pub use config::GalleryConfig;
pub use controller::{GalleryController, PageSummary};
pub use error::{GalleryError, Result};
pub use github::GitHubClient;
pub use page::{GalleryPage, HtmlContainer, ResultsContainer, Sidebar, UiAction, UiEvent};
pub use readme::ReadmeResolver;
pub use render::{EntryAction, RenderMode, RenderedEntry, Renderer, Visibility};
pub use types::{ReadmeOutcome, RepositoryOwner, RepositoryRecord, SearchResponse};
