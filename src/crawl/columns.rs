/// Column discovery for the listing table.
///
/// The admin listing has shuffled its columns between deployments, so the
/// engine reads the header row instead of trusting fixed positions. When the
/// header text is not recognized it falls back to the historical defaults
/// rather than aborting the crawl; a silently misread column is the accepted
/// cost of surviving layout drift.

/// Fallback positions observed in every known layout variant.
const DEFAULT_EMAIL_COL: usize = 1;
const DEFAULT_NICK_COL: usize = 2;

/// Resolved positions of the semantic fields within a listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub email_col: usize,
    pub nick_col: usize,
}

/// Map header cells to column positions, case-insensitively.
pub fn resolve(header_cells: &[String]) -> ColumnMap {
    let email_col = find_column(header_cells, &["email", "e-mail"]).unwrap_or(DEFAULT_EMAIL_COL);
    let nick_col = find_column(header_cells, &["nick"]).unwrap_or(DEFAULT_NICK_COL);
    ColumnMap {
        email_col,
        nick_col,
    }
}

fn find_column(header_cells: &[String], needles: &[&str]) -> Option<usize> {
    header_cells.iter().position(|cell| {
        let lower = cell.to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    })
}
