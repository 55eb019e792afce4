/// Timestamp parsing for post headers.
///
/// The forum renders timestamps in two shapes: an ISO-like form
/// (`2025-06-11 22:16`, sometimes with seconds or trailing annotations) and a
/// localized short form (`11 cze 22:16`) that omits the year entirely.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::CrawlError;

/// Sentinel hour count meaning "no activity ever recorded".
pub const NEVER_HOURS: u32 = 999;

/// Month abbreviations as the forum prints them, January to December.
const MONTH_ABBREVS: [&str; 12] = [
    "sty", "lut", "mar", "kwi", "maj", "cze", "lip", "sie", "wrz", "paź", "lis", "gru",
];

/// Parses a raw timestamp string into an absolute instant.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]` (anything past the first 16 characters is
/// ignored) and `D MON HH:MM` where `MON` comes from the fixed abbreviation
/// table. The localized form always resolves to `reference_year`; no year
/// rollover is inferred.
pub fn parse_timestamp(raw: &str, reference_year: i32) -> Result<NaiveDateTime, CrawlError> {
    let trimmed = raw.trim();

    // ISO-like form, truncated to minute precision.
    let head: String = trimmed.chars().take(16).collect();
    if let Ok(dt) = NaiveDateTime::parse_from_str(&head, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }

    // Localized form: "11 cze 22:16".
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if let [day_str, mon_str, time_str] = tokens[..] {
        let day: u32 = day_str
            .parse()
            .map_err(|_| CrawlError::Parse(raw.to_string()))?;
        let month = month_number(mon_str).ok_or_else(|| CrawlError::Parse(raw.to_string()))?;
        let time = NaiveTime::parse_from_str(time_str, "%H:%M")
            .map_err(|_| CrawlError::Parse(raw.to_string()))?;
        let date = NaiveDate::from_ymd_opt(reference_year, month, day)
            .ok_or_else(|| CrawlError::Parse(raw.to_string()))?;
        return Ok(date.and_time(time));
    }

    Err(CrawlError::Parse(raw.to_string()))
}

fn month_number(abbrev: &str) -> Option<u32> {
    let lower = abbrev.to_lowercase();
    MONTH_ABBREVS
        .iter()
        .position(|m| *m == lower)
        .map(|idx| idx as u32 + 1)
}

/// Elapsed hours between `instant` and `now`, any started hour counted.
///
/// Returns [`NEVER_HOURS`] when the instant is absent, and never a negative
/// duration: a clock anomaly placing the instant in the future yields the
/// absolute difference. The result is capped at the sentinel.
pub fn hours_since(instant: Option<NaiveDateTime>, now: NaiveDateTime) -> u32 {
    match instant {
        None => NEVER_HOURS,
        Some(t) => {
            let minutes = (now - t).num_minutes().unsigned_abs();
            let hours = minutes.div_ceil(60);
            hours.min(NEVER_HOURS as u64) as u32
        }
    }
}
