/// Listing pagination.
///
/// Walks the listing page by page, re-resolving columns on every page (the
/// header can differ between layout variants served mid-session). The walk
/// ends when no next-page control is found or the configured page cap is
/// reached; the cap guards against a next-page control that never disappears.
use crate::crawl::columns;
use crate::crawl::listing;
use crate::crawl::types::Participant;
use crate::error::CrawlError;
use crate::session::{Query, Session};

/// Ordered candidates for the next-page control: a label equal to the next
/// page number, then the known "next" glyphs, then the structural selector.
fn next_page_candidates(current_page: u32) -> Vec<Query> {
    vec![
        Query::Text((current_page + 1).to_string()),
        Query::Text("»".to_string()),
        Query::Text("›".to_string()),
        Query::Css("ul.pagination a[rel=\"next\"]".to_string()),
    ]
}

/// Page-by-page iterator over the listing.
///
/// The orchestrator drives it one page at a time so that detail inspection
/// runs while the participant's page is still the one displayed.
pub struct PaginationWalker {
    page: u32,
    max_pages: u32,
    listed_first: bool,
}

impl PaginationWalker {
    pub fn new(max_pages: u32) -> Self {
        PaginationWalker {
            page: 1,
            max_pages,
            listed_first: false,
        }
    }

    /// Current page number, 1-based.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// List the next page of participants.
    ///
    /// The first call lists the page the session is already positioned on.
    /// Later calls locate and activate the next-page control, await the page
    /// transition, then list. Returns `None` when the walk is over.
    pub async fn next_page<S: Session>(
        &mut self,
        session: &mut S,
    ) -> Result<Option<Vec<Participant>>, CrawlError> {
        if self.listed_first {
            if self.page >= self.max_pages {
                tracing::warn!(
                    "Stopping at the configured page cap ({} pages); the listing may continue",
                    self.max_pages
                );
                return Ok(None);
            }
            let candidates = next_page_candidates(self.page);
            let Some(control) = session.find_first_actionable(&candidates).await? else {
                return Ok(None);
            };
            session.activate(&control).await?;
            session.await_page_ready().await?;
            self.page += 1;
        }
        self.listed_first = true;

        let header = session.header_cells().await?;
        let column_map = columns::resolve(&header);
        let rows = session.list_rows().await?;
        Ok(Some(listing::list_page(&rows, &column_map, self.page)))
    }
}
