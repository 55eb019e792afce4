/// Progress reporting UI for crawl operations.
///
/// Shows an animated spinner in TTY mode and falls back to plain text
/// logging otherwise.
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

use crate::crawl::types::Participant;
use crate::timefmt::format_silence;

/// Maximum width for participant identifiers in progress lines.
const IDENT_WIDTH: usize = 32;

pub struct CrawlProgress {
    bar: Option<ProgressBar>,
}

impl CrawlProgress {
    pub fn new() -> Self {
        if std::io::stderr().is_terminal() {
            let style = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
            let bar = ProgressBar::new_spinner();
            bar.set_style(style);
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            CrawlProgress { bar: Some(bar) }
        } else {
            CrawlProgress { bar: None }
        }
    }

    /// Update the spinner with the current page and running participant count.
    pub fn set_page(&self, page: u32, participants: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("page {:>3}  {:>4} participants", page, participants));
        }
    }

    /// Print a line above the spinner without breaking its redraw.
    pub fn println(&self, msg: &str) {
        if let Some(ref bar) = self.bar {
            bar.println(msg);
        } else {
            eprintln!("{}", msg);
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Default for CrawlProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line summary for a processed participant.
///
/// Example: `ala@example.com                  3 posts, silent 26h — Silent for 26 hours`
pub fn format_participant_line(participant: &Participant) -> String {
    format!(
        "{} {:>3} posts, silent {:>5} — {}",
        pad_ident(&participant.email, IDENT_WIDTH),
        participant.respondent_posts,
        format_silence(participant.silence_hours),
        participant.status_message
    )
}

fn pad_ident(s: &str, width: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= width {
        format!("{:<width$}", s)
    } else {
        let truncated: String = s.chars().take(width - 1).collect();
        format!("{}…", truncated)
    }
}
