use crate::error::{GalleryError, Result};
use crate::render::RenderMode;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TOPIC: &str = "uracle-plugin";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_README_CANDIDATES: [&str; 2] = ["README.md", "readme.md"];

/// Settings shared by the fetcher, the README resolver and the renderer.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub topic: String,
    pub api_base_url: String,
    pub raw_base_url: String,
    /// Tried concurrently, first success wins.
    pub readme_candidates: Vec<String>,
    pub mode: RenderMode,
    pub user_agent: String,
    /// `None` lets a stalled request wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            readme_candidates: DEFAULT_README_CANDIDATES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            mode: RenderMode::Rich,
            user_agent: format!("Plugin Gallery/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
        }
    }
}

impl GalleryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(GalleryError::ConfigError("topic must not be empty".to_string()));
        }
        if self.topic.chars().any(char::is_whitespace) {
            return Err(GalleryError::ConfigError(format!(
                "topic must be a single tag, got '{}'",
                self.topic
            )));
        }
        if self.readme_candidates.is_empty() {
            return Err(GalleryError::ConfigError(
                "at least one README candidate filename is required".to_string(),
            ));
        }
        if self.readme_candidates.iter().any(|name| name.is_empty() || name.contains('/')) {
            return Err(GalleryError::ConfigError(
                "README candidates must be plain file names".to_string(),
            ));
        }
        Self::parse_base(&self.api_base_url)?;
        Self::parse_base(&self.raw_base_url)?;
        Ok(())
    }

    pub(crate) fn parse_base(raw: &str) -> Result<Url> {
        let url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(GalleryError::ConfigError(format!("'{}' cannot be used as a base URL", raw)));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GalleryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.topic, "uracle-plugin");
        assert_eq!(config.readme_candidates, vec!["README.md", "readme.md"]);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn rejects_empty_candidates() {
        let config = GalleryConfig {
            readme_candidates: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GalleryError::ConfigError(_))));
    }

    #[test]
    fn rejects_topic_with_spaces() {
        let config = GalleryConfig {
            topic: "two words".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GalleryError::ConfigError(_))));
    }

    #[test]
    fn rejects_bad_base_url() {
        let config = GalleryConfig {
            raw_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GalleryError::InvalidUrl(_))));

        let config = GalleryConfig {
            api_base_url: "mailto:someone@example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GalleryError::ConfigError(_))));
    }
}
