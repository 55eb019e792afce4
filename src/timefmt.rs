use chrono::NaiveDateTime;

use crate::timeparse::NEVER_HOURS;

/// Format an instant at minute precision, as the sheet columns expect.
pub fn format_instant(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

/// Format an optional instant, using the report's "Nigdy" sentinel when missing.
pub fn format_instant_opt(t: Option<NaiveDateTime>) -> String {
    t.map(format_instant).unwrap_or_else(|| "Nigdy".to_string())
}

/// Format a silence duration ("339h"), with "Nigdy" for the never-posted sentinel.
pub fn format_silence(hours: u32) -> String {
    if hours >= NEVER_HOURS {
        "Nigdy".to_string()
    } else {
        format!("{}h", hours)
    }
}
