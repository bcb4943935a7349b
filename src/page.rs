use crate::controller::{GalleryController, PageSummary};
use crate::render::{EntryAction, RenderMode, RenderedEntry, Visibility};
use tracing::{debug, warn};

pub const CONTAINER_ID: &str = "repositories";
pub const MENU_TOGGLE_SELECTOR: &str = ".menu-toggle";
pub const SIDEBAR_SELECTOR: &str = "aside";
pub const COLLAPSED_CLASS: &str = "collapsed";

/// Where rendered entries end up.
pub trait ResultsContainer {
    fn append(&mut self, entry: RenderedEntry);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory stand-in for the `#repositories` element.
#[derive(Debug, Default)]
pub struct HtmlContainer {
    entries: Vec<RenderedEntry>,
}

impl HtmlContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[RenderedEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&RenderedEntry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut RenderedEntry> {
        self.entries.get_mut(index)
    }

    pub fn to_html(&self) -> String {
        let children: String = self.entries.iter().map(RenderedEntry::to_html).collect();
        format!(r#"<div id="{}">{}</div>"#, CONTAINER_ID, children)
    }
}

impl ResultsContainer for HtmlContainer {
    fn append(&mut self, entry: RenderedEntry) {
        self.entries.push(entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The `aside` element; its collapse state has nothing to do with the list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sidebar {
    collapsed: bool,
}

impl Sidebar {
    pub fn toggle(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn class_attr(&self) -> &'static str {
        if self.collapsed {
            COLLAPSED_CLASS
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Click on the `.menu-toggle` control.
    MenuToggle,
    /// Click anywhere on the entry at this index.
    EntryClick(usize),
    /// Click on the header of the entry at this index.
    HeaderClick(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    OpenUrl(String),
    BodyToggled { index: usize, visibility: Visibility },
    SidebarToggled { collapsed: bool },
}

/// Everything the gallery owns on the page.
#[derive(Debug, Default)]
pub struct GalleryPage {
    container: HtmlContainer,
    sidebar: Sidebar,
    status: Option<String>,
}

impl GalleryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self) -> &HtmlContainer {
        &self.container
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    /// Visible message left by the last failed load, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn handle(&mut self, event: UiEvent) -> Option<UiAction> {
        match event {
            UiEvent::MenuToggle => Some(UiAction::SidebarToggled {
                collapsed: self.sidebar.toggle(),
            }),
            UiEvent::EntryClick(index) | UiEvent::HeaderClick(index) => {
                let entry = match self.container.entry_mut(index) {
                    Some(entry) => entry,
                    None => {
                        debug!(index, "Click on unknown entry ignored");
                        return None;
                    }
                };

                // Rich entries only react to their header.
                if entry.mode() == RenderMode::Rich && !matches!(event, UiEvent::HeaderClick(_)) {
                    return None;
                }

                match entry.activate()? {
                    EntryAction::OpenUrl(url) => Some(UiAction::OpenUrl(url)),
                    EntryAction::Toggled(visibility) => Some(UiAction::BodyToggled { index, visibility }),
                }
            }
        }
    }

    /// Load the controller's next page into this page's container.
    ///
    /// Failures become the status message instead of disappearing.
    pub async fn load_next_page(&mut self, controller: &mut GalleryController) -> Option<PageSummary> {
        let page = controller.current_page();
        match controller.load_next_page(&mut self.container).await {
            Ok(summary) => {
                self.status = None;
                Some(summary)
            }
            Err(e) => {
                warn!(page, error = %e, "Page load failed");
                self.status = Some(format!("Could not load plugins (page {}): {}", page, e));
                None
            }
        }
    }

    /// Load up to `max_pages` pages in sequence.
    ///
    /// Stops at the first failed page, leaving its message in the status
    /// line, and once the controller runs out of results.
    pub async fn load_pages(&mut self, controller: &mut GalleryController, max_pages: u32) -> Vec<PageSummary> {
        let mut summaries = Vec::new();
        for _ in 0..max_pages {
            if controller.is_exhausted() {
                break;
            }
            match self.load_next_page(controller).await {
                Some(summary) => summaries.push(summary),
                None => break,
            }
        }
        summaries
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(r#"<aside class="{}"></aside>"#, self.sidebar.class_attr());
        if let Some(status) = &self.status {
            html.push_str(&format!(
                r#"<p class="status">{}</p>"#,
                ammonia::Builder::empty().clean(status)
            ));
        }
        html.push_str(&self.container.to_html());
        html
    }
}
