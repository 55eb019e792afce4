/// Status determination for one participant.
///
/// A pure, total function over the participant's aggregate counters and the
/// project configuration. Rules are evaluated most severe first; the first
/// match wins, so tiers are mutually exclusive by construction.
use serde::{Deserialize, Serialize};

use crate::config::ProjectConfig;
use crate::crawl::types::Participant;
use crate::timeparse::NEVER_HOURS;

/// Engagement-severity tier, most to least severe in declaration order.
///
/// The derived `Ord` drives both rule precedence and report sorting. `Error`
/// deliberately sorts after `OnTrack`: a failed crawl is operational noise,
/// not an engagement signal, but it must never masquerade as on-track either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    NeverAuthenticated,
    NeverPosted,
    ProlongedSilence,
    SilentSinceYesterday,
    BehindOnTasks,
    NotStartedToday,
    ManyUnansweredPosts,
    SomeUnansweredPosts,
    OnTrack,
    Error,
}

impl StatusTier {
    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::NeverAuthenticated => "never authenticated",
            StatusTier::NeverPosted => "never posted",
            StatusTier::ProlongedSilence => "prolonged silence",
            StatusTier::SilentSinceYesterday => "silent since yesterday",
            StatusTier::BehindOnTasks => "behind on tasks",
            StatusTier::NotStartedToday => "not started today",
            StatusTier::ManyUnansweredPosts => "many unanswered posts",
            StatusTier::SomeUnansweredPosts => "some unanswered posts",
            StatusTier::OnTrack => "on track",
            StatusTier::Error => "crawl error",
        }
    }
}

/// Silence thresholds, inclusive lower bounds.
const PROLONGED_SILENCE_HOURS: u32 = 48;
const SILENT_YESTERDAY_HOURS: u32 = 24;

/// Unanswered-post thresholds, inclusive lower bounds.
const MANY_UNANSWERED: u32 = 10;
const SOME_UNANSWERED: u32 = 5;

/// Map a participant's aggregates to a status message and tier.
pub fn classify(participant: &Participant, config: &ProjectConfig) -> (String, StatusTier) {
    if !participant.ever_authenticated {
        return ("Never logged in".to_string(), StatusTier::NeverAuthenticated);
    }

    let silence = participant.silence_hours;
    if silence >= NEVER_HOURS {
        return ("Never posted".to_string(), StatusTier::NeverPosted);
    }
    if silence >= PROLONGED_SILENCE_HOURS {
        return (
            format!("Silent for {} days", silence / 24),
            StatusTier::ProlongedSilence,
        );
    }
    if silence >= SILENT_YESTERDAY_HOURS {
        return (
            format!("Silent for {} hours", silence),
            StatusTier::SilentSinceYesterday,
        );
    }

    let expected_before_today = config.expected_minimum_before_today();
    if participant.respondent_posts < expected_before_today {
        let deficit = expected_before_today - participant.respondent_posts;
        return (
            format!("Behind by {} posts", deficit),
            StatusTier::BehindOnTasks,
        );
    }
    if participant.respondent_posts == expected_before_today {
        return ("Not started today".to_string(), StatusTier::NotStartedToday);
    }

    if participant.posts_since_moderator >= MANY_UNANSWERED {
        return (
            format!(
                "{} posts awaiting moderator response",
                participant.posts_since_moderator
            ),
            StatusTier::ManyUnansweredPosts,
        );
    }
    if participant.posts_since_moderator >= SOME_UNANSWERED {
        return (
            format!(
                "{} posts awaiting moderator response",
                participant.posts_since_moderator
            ),
            StatusTier::SomeUnansweredPosts,
        );
    }

    if participant.respondent_posts >= config.expected_through_today() {
        ("Today's quota met".to_string(), StatusTier::OnTrack)
    } else {
        ("Writing today, in progress".to_string(), StatusTier::OnTrack)
    }
}
