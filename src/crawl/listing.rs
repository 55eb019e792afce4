/// Row extraction for one listing page.
use crate::crawl::columns::ColumnMap;
use crate::crawl::types::Participant;
use crate::session::ListingRow;

/// Produce one participant record per usable row.
///
/// Skipped entirely: repeated header rows (the listing re-inserts its header
/// mid-table on some layouts), rows with fewer cells than the resolved
/// columns require, and rows with an empty primary identifier. A row with an
/// email but no nick yields a never-authenticated participant with zero
/// counters; those never enter detail inspection.
pub fn list_page(rows: &[ListingRow], columns: &ColumnMap, page_number: u32) -> Vec<Participant> {
    let required_cells = columns.email_col.max(columns.nick_col) + 1;
    let mut participants = Vec::new();

    for row in rows {
        if is_repeated_header(&row.cells) {
            continue;
        }
        if row.cells.len() < required_cells {
            tracing::debug!(
                "Skipping short row {} on page {} ({} cells)",
                row.index,
                page_number,
                row.cells.len()
            );
            continue;
        }

        let email = row.cells[columns.email_col].trim();
        if email.is_empty() {
            continue;
        }
        let nick = row.cells[columns.nick_col].trim();
        let display_name = row
            .cells
            .get(columns.nick_col + 1)
            .map(|cell| cell.trim())
            .unwrap_or("");

        participants.push(Participant::from_listing(
            email,
            nick,
            display_name,
            page_number,
            row.index,
        ));
    }

    participants
}

/// The listing repeats its header row inside the body; such a row carries
/// both the action and the email header markers.
fn is_repeated_header(cells: &[String]) -> bool {
    let joined = cells.join(" ").to_lowercase();
    joined.contains("akcja") && joined.contains("email")
}
