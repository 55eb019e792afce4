/// Session capability layer.
///
/// The crawl engine never talks to a browser directly; it drives an
/// already-authenticated session through this trait. A production backend
/// wraps a webdriver client; the integration tests use a scripted fake.
///
/// Context correlation (matching a newly opened window to the action that
/// opened it, typically by diffing handle sets) is an implementation detail
/// behind `open_correlated_context`/`close_correlated_context`. The engine
/// only relies on the pair's contract: at most one extra context is open at a
/// time, and closing it restores focus to the listing.
use crate::error::CrawlError;

/// An element lookup, ordered-candidate style: the engine passes a list of
/// queries and takes the first displayed, actionable match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// CSS selector evaluated against the whole page.
    Css(String),
    /// Exact visible text of a link or button (pagination labels, glyphs).
    Text(String),
    /// CSS selector evaluated inside one listing row.
    InRow(usize, String),
}

/// Opaque handle to an interactive control located by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control(pub u64);

/// One row of the listing table: its position and visible cell texts.
#[derive(Debug, Clone)]
pub struct ListingRow {
    pub index: usize,
    pub cells: Vec<String>,
}

/// An entry of the currently open per-row action menu.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    /// Identifier the action navigates to (href or user id), used as the
    /// correlated-context target.
    pub target: String,
    pub control: Control,
}

/// What the secondary context currently shows, sampled once per poll.
#[derive(Debug, Clone, Default)]
pub struct DetailSnapshot {
    /// Visible text length; zero means the page is still blank/loading.
    pub content_length: usize,
    /// The context still renders something indistinguishable from the listing.
    pub looks_like_listing: bool,
    /// A recognizable post-timestamp pattern is present.
    pub has_timestamp_text: bool,
    /// A recognizable post-container marker is present.
    pub has_post_container: bool,
}

/// A raw post node pulled out of the detail view, before parsing.
#[derive(Debug, Clone)]
pub struct RawPost {
    /// Structural marker carrying the author role (e.g. the node's class list).
    pub marker: String,
    /// Direct text nodes of the post header, in document order. Nested
    /// annotation text is not included.
    pub text_nodes: Vec<String>,
}

#[allow(async_fn_in_trait)]
pub trait Session {
    /// Header cell texts of the listing table on the current page.
    async fn header_cells(&mut self) -> Result<Vec<String>, CrawlError>;

    /// Data rows of the listing table on the current page.
    async fn list_rows(&mut self) -> Result<Vec<ListingRow>, CrawlError>;

    /// First displayed, actionable control matching the ordered candidates.
    async fn find_first_actionable(
        &mut self,
        candidates: &[Query],
    ) -> Result<Option<Control>, CrawlError>;

    /// Click/activate a previously located control.
    async fn activate(&mut self, control: &Control) -> Result<(), CrawlError>;

    /// Block until the primary context has finished a page transition.
    async fn await_page_ready(&mut self) -> Result<(), CrawlError>;

    /// Entries of the action menu opened by the last activation.
    async fn menu_items(&mut self) -> Result<Vec<MenuItem>, CrawlError>;

    /// Open the secondary context for `target` and switch focus to it.
    async fn open_correlated_context(&mut self, target: &str) -> Result<(), CrawlError>;

    /// Close the secondary context and return focus to the listing.
    async fn close_correlated_context(&mut self) -> Result<(), CrawlError>;

    /// Sample the secondary context's current content state.
    async fn detail_snapshot(&mut self) -> Result<DetailSnapshot, CrawlError>;

    /// Extract the raw post nodes from the loaded detail view.
    async fn collect_posts(&mut self) -> Result<Vec<RawPost>, CrawlError>;
}
