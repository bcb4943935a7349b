use crate::config::DEFAULT_RAW_BASE_URL;
use crate::types::RepositoryRecord;
use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, Options, Parser};
use std::borrow::Cow;
use std::collections::HashSet;
use url::{ParseError, Url};

/// How a repository is presented in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// The whole entry is a single link to the repository.
    Simple,
    /// Separate header and collapsible README body.
    #[default]
    Rich,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Collapsed,
    Expanded,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Collapsed => Visibility::Expanded,
            Visibility::Expanded => Visibility::Collapsed,
        }
    }
}

/// What activating an entry asks the surrounding page to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    /// Open the URL in a new browsing context.
    OpenUrl(String),
    Toggled(Visibility),
}

/// One repository, ready to be appended to the results container.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntry {
    full_name: String,
    html_url: String,
    mode: RenderMode,
    header_html: String,
    body_html: Option<String>,
    link: Option<Url>,
    visibility: Visibility,
}

impl RenderedEntry {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn header_html(&self) -> &str {
        &self.header_html
    }

    pub fn body_html(&self) -> Option<&str> {
        self.body_html.as_deref()
    }

    pub fn has_body(&self) -> bool {
        self.body_html.is_some()
    }

    /// The validated repository URL, present only in simple mode.
    pub fn link(&self) -> Option<&Url> {
        self.link.as_ref()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_expanded(&self) -> bool {
        self.visibility == Visibility::Expanded
    }

    /// Flip the body between collapsed and expanded. No-op without a body.
    pub fn toggle(&mut self) -> Visibility {
        if self.has_body() {
            self.visibility = self.visibility.toggled();
        }
        self.visibility
    }

    pub fn activate(&mut self) -> Option<EntryAction> {
        match self.mode {
            RenderMode::Simple => self.link.as_ref().map(|_| EntryAction::OpenUrl(self.html_url.clone())),
            RenderMode::Rich if self.has_body() => Some(EntryAction::Toggled(self.toggle())),
            RenderMode::Rich => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self.mode {
            RenderMode::Simple => match &self.link {
                Some(url) => format!(
                    r#"<div class="repository" data-href="{}" data-target="_blank">{}</div>"#,
                    url, self.header_html
                ),
                None => format!(r#"<div class="repository">{}</div>"#, self.header_html),
            },
            RenderMode::Rich => {
                let body = match &self.body_html {
                    Some(body) if self.is_expanded() => format!(r#"<div class="body">{}</div>"#, body),
                    Some(body) => format!(r#"<div class="body" hidden>{}</div>"#, body),
                    None => String::new(),
                };
                format!(
                    r#"<div class="repository"><div class="header">{}</div>{}</div>"#,
                    self.header_html, body
                )
            }
        }
    }
}

/// Turns repository records into sanitized entries.
pub struct Renderer {
    mode: RenderMode,
    raw_base: Option<Url>,
    text_policy: Builder<'static>,
    description_policy: Builder<'static>,
}

impl Renderer {
    /// Renderer whose README images load from raw.githubusercontent.com.
    pub fn new(mode: RenderMode) -> Self {
        Self::build(mode, Url::parse(DEFAULT_RAW_BASE_URL).ok())
    }

    pub fn with_raw_base(mode: RenderMode, raw_base: Url) -> Self {
        Self::build(mode, Some(raw_base))
    }

    fn build(mode: RenderMode, raw_base: Option<Url>) -> Self {
        let mut description_policy = Builder::default();
        description_policy
            .url_schemes(web_schemes())
            .url_relative(UrlRelative::Deny);

        Renderer {
            mode,
            raw_base,
            text_policy: Builder::empty(),
            description_policy,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Build the entry for `record`. The README is ignored in simple mode.
    pub fn render(&self, record: &RepositoryRecord, readme: Option<&str>) -> RenderedEntry {
        let header_html = self.render_header(record);
        let (body_html, link) = match self.mode {
            RenderMode::Simple => (None, web_link(&record.html_url)),
            RenderMode::Rich => (readme.map(|markdown| self.render_readme(record, markdown)), None),
        };

        RenderedEntry {
            full_name: record.full_name.clone(),
            html_url: record.html_url.clone(),
            mode: self.mode,
            header_html,
            body_html,
            link,
            visibility: Visibility::Collapsed,
        }
    }

    fn render_header(&self, record: &RepositoryRecord) -> String {
        let name = self.text_policy.clean(&record.full_name).to_string();
        let description = record
            .description
            .as_deref()
            .map(|d| self.description_policy.clean(d).to_string())
            .unwrap_or_default();

        format!(
            concat!(
                r#"<p class="name">{}</p>"#,
                r#"<p>{}</p>"#,
                r#"<div>"#,
                r#"<span>{} <i class="fas fa-star"></i></span>"#,
                r#"<span>{} <i class="fas fa-code-branch"></i></span>"#,
                r#"</div>"#
            ),
            name, description, record.stargazers_count, record.forks_count
        )
    }

    /// Markdown to HTML, then through the restricted README profile.
    ///
    /// Relative image sources resolve against the raw-content host so the
    /// bytes load; every other relative link resolves against the repository
    /// tree on its default branch. `class` survives so fenced code keeps its
    /// `language-*` marker.
    pub fn render_readme(&self, record: &RepositoryRecord, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, options);
        let mut unsafe_html = String::new();
        html::push_html(&mut unsafe_html, parser);

        let tree_base = web_link(&record.html_url)
            .and_then(|repo| directory_url(&repo, &["blob", record.default_branch.as_str()]));
        let raw_base = self.raw_base.as_ref().and_then(|base| {
            directory_url(
                base,
                &[
                    record.owner.login.as_str(),
                    record.name.as_str(),
                    record.default_branch.as_str(),
                ],
            )
        });

        let mut policy = Builder::default();
        policy
            .url_schemes(web_schemes())
            .url_relative(UrlRelative::PassThrough)
            .add_generic_attributes(["class"])
            .attribute_filter(move |element, attribute, value| {
                if !is_url_attribute(attribute) {
                    return Some(Cow::Borrowed(value));
                }
                let base = if element == "img" && attribute == "src" {
                    raw_base.as_ref()
                } else {
                    tree_base.as_ref()
                };
                resolve_relative(base, value)
            });
        policy.clean(&unsafe_html).to_string()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderMode::default())
    }
}

fn web_schemes() -> HashSet<&'static str> {
    ["http", "https", "mailto"].into_iter().collect()
}

fn web_link(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// `base` with `segments` appended, ending in `/` so joins stay inside it.
fn directory_url(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments)
        .push("");
    Some(url)
}

fn is_url_attribute(attribute: &str) -> bool {
    matches!(attribute, "href" | "src" | "cite" | "longdesc")
}

/// Absolute URLs pass through untouched; relative ones are joined onto
/// `base`, or dropped when there is none. A leading `/` means the
/// repository root, as on GitHub.
fn resolve_relative<'a>(base: Option<&Url>, value: &'a str) -> Option<Cow<'a, str>> {
    match Url::parse(value) {
        Err(ParseError::RelativeUrlWithoutBase) => {
            let joined = base?.join(value.trim_start_matches('/')).ok()?;
            Some(Cow::Owned(joined.into()))
        }
        _ => Some(Cow::Borrowed(value)),
    }
}
