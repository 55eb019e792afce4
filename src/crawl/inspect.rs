/// Per-participant activity inspection.
///
/// Opens the participant's detail view in a correlated secondary context,
/// waits for it to materialize content, and hands the raw post nodes to the
/// post parser. The secondary context is always closed before returning,
/// success or failure: the orchestrator's single-session invariant depends on
/// at most one extra context existing at a time.
use chrono::NaiveDateTime;
use std::time::Duration;

use crate::crawl::posts;
use crate::crawl::types::{Participant, PostAggregates};
use crate::error::CrawlError;
use crate::session::{MenuItem, Query, Session};
use crate::timeparse;

/// Total one-second polls before the detail view is declared missing.
const POLL_BUDGET: u32 = 30;
/// Polls still showing the listing after which "no posts" is accepted.
const LISTING_GIVE_UP: u32 = 10;
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Ordered candidates for the per-row action-menu control. Layout variants
/// differ in which element carries the dropdown; the first displayed match
/// wins.
fn open_menu_candidates(row_index: usize) -> Vec<Query> {
    vec![
        Query::InRow(row_index, "button.dropdown-toggle".to_string()),
        Query::InRow(row_index, "a.dropdown-toggle".to_string()),
        Query::InRow(row_index, ".btn-group button".to_string()),
        Query::InRow(row_index, "td:last-child button, td:last-child a".to_string()),
    ]
}

/// Enrich `participant` with activity counters and timestamps, in place.
///
/// No-op for never-authenticated participants. Failures are surfaced as typed
/// errors and not retried here; retry policy belongs to the caller.
pub async fn inspect<S: Session>(
    session: &mut S,
    participant: &mut Participant,
    reference_year: i32,
    now: NaiveDateTime,
) -> Result<(), CrawlError> {
    if !participant.ever_authenticated {
        return Ok(());
    }

    let candidates = open_menu_candidates(participant.row_index);
    let menu_control = session
        .find_first_actionable(&candidates)
        .await?
        .ok_or(CrawlError::SelectorNotFound {
            what: "row action menu",
        })?;
    session.activate(&menu_control).await?;

    let items = session.menu_items().await?;
    let target = show_posts_target(&items).ok_or(CrawlError::SelectorNotFound {
        what: "show-posts action",
    })?;

    session.open_correlated_context(&target).await?;
    let outcome = read_detail(session, reference_year).await;
    // Close the secondary context no matter how extraction went; the close
    // restores focus to the listing.
    if let Err(close_err) = session.close_correlated_context().await {
        tracing::warn!(
            "Failed to close detail context for {}: {}",
            participant.email,
            close_err
        );
    }

    match outcome? {
        Some(aggregates) => apply(participant, &aggregates),
        None => {
            tracing::debug!("No detail content for {}; treating as no posts", participant.email);
        }
    }
    participant.silence_hours = timeparse::hours_since(participant.last_activity, now);
    Ok(())
}

/// The "show posts" action: mentions posts, and is not the delete action that
/// shares the same menu.
fn show_posts_target(items: &[MenuItem]) -> Option<String> {
    items
        .iter()
        .find(|item| {
            let label = item.label.to_lowercase();
            (label.contains("wpis") || label.contains("post"))
                && !label.contains("usuń")
                && !label.contains("delete")
        })
        .map(|item| item.target.clone())
}

/// Poll the secondary context until it shows something readable.
///
/// Ready when a post container or timestamp pattern appears, or when the
/// content is non-empty and no longer the listing. Ten polls of still seeing
/// the listing mean the account genuinely has no detail view ("no posts", a
/// valid terminal state, `Ok(None)`). A context that stays blank past the
/// whole budget is a correlation timeout.
async fn read_detail<S: Session>(
    session: &mut S,
    reference_year: i32,
) -> Result<Option<PostAggregates>, CrawlError> {
    let mut listing_polls = 0u32;

    for poll in 1..=POLL_BUDGET {
        let snapshot = session.detail_snapshot().await?;

        let ready = snapshot.has_post_container
            || snapshot.has_timestamp_text
            || (snapshot.content_length > 0 && !snapshot.looks_like_listing);
        if ready {
            let raw = session.collect_posts().await?;
            return Ok(Some(posts::parse(&raw, reference_year)));
        }

        if snapshot.looks_like_listing {
            listing_polls += 1;
            if listing_polls >= LISTING_GIVE_UP {
                return Ok(None);
            }
        }

        if poll < POLL_BUDGET {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    Err(CrawlError::CorrelationTimeout { polls: POLL_BUDGET })
}

fn apply(participant: &mut Participant, aggregates: &PostAggregates) {
    participant.respondent_posts = aggregates.respondent_posts;
    participant.moderator_posts = aggregates.moderator_posts;
    participant.posts_since_moderator = aggregates.posts_since_moderator;
    participant.last_activity = aggregates.last_activity;
    participant.last_moderator_post = aggregates.last_moderator_post;
    if aggregates.parse_failures > 0 {
        tracing::warn!(
            "Dropped {} unparseable post timestamps for {}",
            aggregates.parse_failures,
            participant.email
        );
    }
}
