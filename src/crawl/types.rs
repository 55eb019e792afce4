/// Data structures for the crawl module.
use chrono::NaiveDateTime;

use crate::classify::StatusTier;
use crate::timeparse::NEVER_HOURS;

/// One monitored forum participant.
///
/// Created by the lister with base fields, enriched in place by the activity
/// inspection, finalized by the classifier. Produced at most once per crawl.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Primary identifier (email as shown in the listing).
    pub email: String,
    /// Secondary identifier; empty until the participant first logs in.
    pub nick: String,
    /// Free-text display name, may be empty.
    pub display_name: String,

    pub respondent_posts: u32,
    pub moderator_posts: u32,
    /// Respondent posts written after the moderator's last post.
    pub posts_since_moderator: u32,

    pub last_activity: Option<NaiveDateTime>,
    pub last_moderator_post: Option<NaiveDateTime>,
    /// Hours since the last respondent post, capped at the 999 sentinel.
    pub silence_hours: u32,

    pub status_message: String,
    pub status_tier: StatusTier,

    pub ever_authenticated: bool,
    pub page_number: u32,
    /// Row position on its listing page, used to scope selector queries.
    pub row_index: usize,
}

impl Participant {
    /// Base record as produced from one listing row. Counters start at zero
    /// and silence at the sentinel; the tier is a placeholder until the
    /// classifier runs.
    pub fn from_listing(
        email: &str,
        nick: &str,
        display_name: &str,
        page_number: u32,
        row_index: usize,
    ) -> Self {
        Participant {
            email: email.to_string(),
            nick: nick.to_string(),
            display_name: display_name.to_string(),
            respondent_posts: 0,
            moderator_posts: 0,
            posts_since_moderator: 0,
            last_activity: None,
            last_moderator_post: None,
            silence_hours: NEVER_HOURS,
            status_message: String::new(),
            status_tier: StatusTier::OnTrack,
            ever_authenticated: !nick.trim().is_empty(),
            page_number,
            row_index,
        }
    }
}

/// A single timestamped post, ephemeral within one detail-view extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Post {
    pub timestamp: NaiveDateTime,
    pub is_moderator: bool,
}

/// Aggregate counters computed from one participant's post set.
#[derive(Debug, Clone, Default)]
pub struct PostAggregates {
    pub respondent_posts: u32,
    pub moderator_posts: u32,
    pub posts_since_moderator: u32,
    pub last_activity: Option<NaiveDateTime>,
    pub last_moderator_post: Option<NaiveDateTime>,
    /// Posts dropped because their timestamp did not parse. Diagnostic only.
    pub parse_failures: u32,
}
