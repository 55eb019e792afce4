/// Participant crawling module.
///
/// Walks the admin listing of forum participants, opens each participant's
/// detail view, aggregates their posts, and classifies engagement severity.
///
/// # Architecture
///
/// The module is organized into focused submodules:
/// - **types**: participant and post data structures
/// - **columns**: header-driven column discovery with fixed fallbacks
/// - **listing**: one page of rows → participant records
/// - **pagination**: page-by-page walk with a next-control search and page cap
/// - **inspect**: correlated detail-view handling per participant
/// - **posts**: raw post nodes → aggregate counters
/// - **progress**: progress reporting and UI
use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDateTime};

use crate::classify::{self, StatusTier};
use crate::config::ProjectConfig;
use crate::report::Report;
use crate::session::Session;

pub mod columns;
pub mod inspect;
pub mod listing;
pub mod pagination;
pub mod posts;
pub mod progress;
pub mod types;

use pagination::PaginationWalker;
use progress::{format_participant_line, CrawlProgress};
use types::Participant;

/// Run one full crawl against an authenticated session positioned at the
/// listing root, using the wall clock.
pub async fn run<S: Session>(session: &mut S, config: &ProjectConfig) -> Result<Report> {
    run_at(session, config, Local::now().naive_local()).await
}

/// Run one full crawl with an explicit "now", for deterministic testing.
///
/// Sequential by design: the detail-view correlation step needs exclusive
/// use of the session's context set, so participants are processed one at a
/// time, in listing order, pages ascending. Per-participant failures are
/// isolated into the error tier; only listing navigation failures abort the
/// crawl.
pub async fn run_at<S: Session>(
    session: &mut S,
    config: &ProjectConfig,
    now: NaiveDateTime,
) -> Result<Report> {
    let reference_year = now.year();
    let progress = CrawlProgress::new();
    let mut walker = PaginationWalker::new(config.max_pages);

    let mut participants: Vec<Participant> = Vec::new();
    let mut authenticated_count = 0u32;
    let mut error_count = 0usize;

    eprintln!("📥 Crawling project {}", config.project_id);

    'pages: loop {
        let batch = match walker.next_page(session).await {
            Ok(Some(batch)) => batch,
            Ok(None) => break,
            Err(e) => return Err(e).context("Listing page failed to load"),
        };
        progress.set_page(walker.page(), participants.len() + batch.len());

        for mut participant in batch {
            process_participant(session, &mut participant, config, reference_year, now).await;
            if participant.status_tier == StatusTier::Error {
                error_count += 1;
            }
            if participant.ever_authenticated {
                authenticated_count += 1;
            }
            progress.println(&format_participant_line(&participant));
            participants.push(participant);

            // Sample mode stops mid-page once enough authenticated
            // participants have been processed.
            if config.sample_mode && authenticated_count >= config.sample_limit {
                tracing::info!(
                    "Sample mode: stopping after {} authenticated participants",
                    authenticated_count
                );
                break 'pages;
            }
        }
    }

    progress.finish();
    eprintln!(
        "✅ Crawled {} participant(s) over {} page(s) ({} errors)",
        participants.len(),
        walker.page(),
        error_count
    );

    Ok(Report::build(
        &config.project_id,
        now,
        walker.page(),
        participants,
    ))
}

/// Inspect and classify one participant, converting per-participant failures
/// into the error tier instead of propagating them.
async fn process_participant<S: Session>(
    session: &mut S,
    participant: &mut Participant,
    config: &ProjectConfig,
    reference_year: i32,
    now: NaiveDateTime,
) {
    if participant.ever_authenticated {
        match inspect::inspect(session, participant, reference_year, now).await {
            Ok(()) => {}
            Err(e @ crate::error::CrawlError::CorrelationTimeout { .. }) => {
                // The detail view never materialized; read as "no posts".
                tracing::warn!("{}: {}", participant.email, e);
            }
            Err(e) => {
                tracing::warn!("Failed to inspect {}: {}", participant.email, e);
                participant.status_tier = StatusTier::Error;
                participant.status_message = format!("Crawl error: {}", e);
                return;
            }
        }
    }

    let (message, tier) = classify::classify(participant, config);
    participant.status_message = message;
    participant.status_tier = tier;
}
