use serde::{Deserialize, Serialize};

// GitHub API response structures

/// A repository as returned by the search endpoint. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub html_url: String,
    pub owner: RepositoryOwner,
    pub default_branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<RepositoryRecord>,
}

/// Result of resolving a repository's README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmeOutcome {
    Found(String),
    NotFound,
}

impl ReadmeOutcome {
    pub fn content(&self) -> Option<&str> {
        match self {
            ReadmeOutcome::Found(content) => Some(content),
            ReadmeOutcome::NotFound => None,
        }
    }

    pub fn into_content(self) -> Option<String> {
        match self {
            ReadmeOutcome::Found(content) => Some(content),
            ReadmeOutcome::NotFound => None,
        }
    }
}
