/// End-to-end crawl tests against a scripted fake session.
///
/// The fake implements the full session capability surface: listing pages
/// with a next-page control, per-row action menus, and correlated detail
/// contexts with configurable loading behavior. It also records context
/// bookkeeping so the tests can assert the cleanup contract.
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap, HashSet};

use flywatch::classify::StatusTier;
use flywatch::config::ProjectConfig;
use flywatch::crawl;
use flywatch::error::CrawlError;
use flywatch::session::{
    Control, DetailSnapshot, ListingRow, MenuItem, Query, RawPost, Session,
};
use flywatch::timeparse::NEVER_HOURS;

const NEXT_CONTROL: u64 = 1;
const ROW_CONTROL_BASE: u64 = 1000;

#[derive(Clone)]
struct FakePage {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Loading behavior of one participant's detail context.
#[derive(Clone, Default)]
struct FakeDetail {
    /// Snapshots served as blank before the view becomes readable.
    blank_polls: u32,
    /// The context never leaves the blank state.
    never_ready: bool,
    /// The context keeps showing the listing (account with no detail view).
    stays_listing: bool,
    posts: Vec<RawPost>,
}

struct FakeSession {
    pages: Vec<FakePage>,
    current_page: usize,
    details: HashMap<String, FakeDetail>,
    /// Rows (page index, row index) whose action menu cannot be located.
    broken_menu_rows: HashSet<(usize, usize)>,
    menu_row: Option<usize>,
    open_detail: Option<String>,
    open_contexts: u32,
    contexts_opened_total: u32,
    polls_served: HashMap<String, u32>,
}

impl FakeSession {
    fn new(pages: Vec<FakePage>) -> Self {
        FakeSession {
            pages,
            current_page: 0,
            details: HashMap::new(),
            broken_menu_rows: HashSet::new(),
            menu_row: None,
            open_detail: None,
            open_contexts: 0,
            contexts_opened_total: 0,
            polls_served: HashMap::new(),
        }
    }

    fn page(&self) -> &FakePage {
        &self.pages[self.current_page]
    }
}

impl Session for FakeSession {
    async fn header_cells(&mut self) -> Result<Vec<String>, CrawlError> {
        Ok(self.page().header.clone())
    }

    async fn list_rows(&mut self) -> Result<Vec<ListingRow>, CrawlError> {
        Ok(self
            .page()
            .rows
            .iter()
            .enumerate()
            .map(|(index, cells)| ListingRow {
                index,
                cells: cells.clone(),
            })
            .collect())
    }

    async fn find_first_actionable(
        &mut self,
        candidates: &[Query],
    ) -> Result<Option<Control>, CrawlError> {
        for candidate in candidates {
            match candidate {
                Query::Text(label) => {
                    let has_next = self.current_page + 1 < self.pages.len();
                    let next_label = (self.current_page + 2).to_string();
                    if has_next && *label == next_label {
                        return Ok(Some(Control(NEXT_CONTROL)));
                    }
                }
                Query::InRow(row, _) => {
                    if !self.broken_menu_rows.contains(&(self.current_page, *row)) {
                        return Ok(Some(Control(ROW_CONTROL_BASE + *row as u64)));
                    }
                }
                Query::Css(_) => {}
            }
        }
        Ok(None)
    }

    async fn activate(&mut self, control: &Control) -> Result<(), CrawlError> {
        if control.0 == NEXT_CONTROL {
            self.current_page += 1;
        } else if control.0 >= ROW_CONTROL_BASE {
            self.menu_row = Some((control.0 - ROW_CONTROL_BASE) as usize);
        }
        Ok(())
    }

    async fn await_page_ready(&mut self) -> Result<(), CrawlError> {
        Ok(())
    }

    async fn menu_items(&mut self) -> Result<Vec<MenuItem>, CrawlError> {
        let row = self.menu_row.expect("menu opened before listing items");
        let email = self.page().rows[row][1].clone();
        Ok(vec![
            MenuItem {
                label: "Usuń wpisy".to_string(),
                target: format!("delete:{}", email),
                control: Control(2),
            },
            MenuItem {
                label: "Pokaż wpisy".to_string(),
                target: format!("user:{}", email),
                control: Control(3),
            },
        ])
    }

    async fn open_correlated_context(&mut self, target: &str) -> Result<(), CrawlError> {
        assert_eq!(
            self.open_contexts, 0,
            "engine must never stack correlated contexts"
        );
        self.open_contexts += 1;
        self.contexts_opened_total += 1;
        self.open_detail = Some(target.to_string());
        Ok(())
    }

    async fn close_correlated_context(&mut self) -> Result<(), CrawlError> {
        assert!(self.open_contexts > 0, "close without a matching open");
        self.open_contexts -= 1;
        self.open_detail = None;
        Ok(())
    }

    async fn detail_snapshot(&mut self) -> Result<DetailSnapshot, CrawlError> {
        let target = self.open_detail.clone().expect("no detail context open");
        let polls = self.polls_served.entry(target.clone()).or_insert(0);
        *polls += 1;
        let served = *polls;

        let detail = self.details.get(&target).cloned().unwrap_or_default();
        if detail.stays_listing {
            return Ok(DetailSnapshot {
                content_length: 500,
                looks_like_listing: true,
                has_timestamp_text: false,
                has_post_container: false,
            });
        }
        if detail.never_ready || served <= detail.blank_polls {
            return Ok(DetailSnapshot::default());
        }
        Ok(DetailSnapshot {
            content_length: 500,
            looks_like_listing: false,
            has_timestamp_text: !detail.posts.is_empty(),
            has_post_container: true,
        })
    }

    async fn collect_posts(&mut self) -> Result<Vec<RawPost>, CrawlError> {
        let target = self.open_detail.clone().expect("no detail context open");
        Ok(self
            .details
            .get(&target)
            .map(|d| d.posts.clone())
            .unwrap_or_default())
    }
}

fn header() -> Vec<String> {
    ["Akcja", "Email", "Nick", "Imię"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn data_row(email: &str, nick: &str) -> Vec<String> {
    vec![
        "☰".to_string(),
        email.to_string(),
        nick.to_string(),
        String::new(),
    ]
}

fn raw_post(marker: &str, timestamp: &str) -> RawPost {
    RawPost {
        marker: marker.to_string(),
        text_nodes: vec![timestamp.to_string()],
    }
}

fn test_config() -> ProjectConfig {
    ProjectConfig {
        project_id: "flyblog-e2e".to_string(),
        total_days: 2,
        tasks_per_day: BTreeMap::from([(1, 2), (2, 1)]),
        current_day: 2,
        sample_mode: false,
        sample_limit: 3,
        max_pages: 50,
    }
}

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-06-02 10:00", "%Y-%m-%d %H:%M").unwrap()
}

#[tokio::test]
async fn crawl_accumulates_each_participant_exactly_once_across_pages() {
    let pages = (1..=3)
        .map(|page| FakePage {
            header: header(),
            rows: vec![
                data_row(&format!("p{}a@example.com", page), "a"),
                data_row(&format!("p{}b@example.com", page), "b"),
            ],
        })
        .collect();
    let mut session = FakeSession::new(pages);

    let report = crawl::run_at(&mut session, &test_config(), now())
        .await
        .unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.participants.len(), 6);
    let unique: HashSet<&str> = report
        .participants
        .iter()
        .map(|row| row.identifier.as_str())
        .collect();
    assert_eq!(unique.len(), 6, "every participant appears exactly once");
    assert_eq!(session.open_contexts, 0);
}

#[tokio::test]
async fn pagination_respects_configured_page_cap() {
    let pages = (1..=5)
        .map(|page| FakePage {
            header: header(),
            rows: vec![data_row(&format!("p{}@example.com", page), "nick")],
        })
        .collect();
    let mut session = FakeSession::new(pages);

    let mut config = test_config();
    config.max_pages = 2;
    let report = crawl::run_at(&mut session, &config, now()).await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.participants.len(), 2);
}

#[tokio::test]
async fn sample_mode_stops_mid_page_after_limit() {
    let pages = vec![FakePage {
        header: header(),
        rows: (1..=5)
            .map(|i| data_row(&format!("p{}@example.com", i), "nick"))
            .collect(),
    }];
    let mut session = FakeSession::new(pages);

    let mut config = test_config();
    config.sample_mode = true;
    config.sample_limit = 3;
    let report = crawl::run_at(&mut session, &config, now()).await.unwrap();

    assert_eq!(report.participants.len(), 3);
}

#[tokio::test]
async fn never_authenticated_participant_skips_detail_inspection() {
    let pages = vec![FakePage {
        header: header(),
        rows: vec![data_row("ghost@example.com", "")],
    }];
    let mut session = FakeSession::new(pages);

    let report = crawl::run_at(&mut session, &test_config(), now())
        .await
        .unwrap();

    let row = &report.participants[0];
    assert_eq!(row.tier, StatusTier::NeverAuthenticated);
    assert_eq!(row.respondent_posts, 0);
    assert_eq!(row.posts_since_moderator, 0);
    assert_eq!(
        session.contexts_opened_total, 0,
        "never-authenticated rows must not open a detail context"
    );
}

#[tokio::test]
async fn broken_row_menu_yields_error_tier_and_crawl_continues() {
    let pages = vec![FakePage {
        header: header(),
        rows: vec![
            data_row("broken@example.com", "broken"),
            data_row("fine@example.com", "fine"),
        ],
    }];
    let mut session = FakeSession::new(pages);
    session.broken_menu_rows.insert((0, 0));

    let report = crawl::run_at(&mut session, &test_config(), now())
        .await
        .unwrap();

    assert_eq!(report.participants.len(), 2);
    let broken = report
        .participants
        .iter()
        .find(|r| r.identifier == "broken@example.com")
        .unwrap();
    assert_eq!(broken.tier, StatusTier::Error);
    assert!(broken.status_message.contains("row action menu"));

    let fine = report
        .participants
        .iter()
        .find(|r| r.identifier == "fine@example.com")
        .unwrap();
    assert_ne!(fine.tier, StatusTier::Error);
    assert_eq!(session.open_contexts, 0);
}

#[tokio::test(start_paused = true)]
async fn correlation_timeout_is_read_as_no_posts_and_context_is_closed() {
    let pages = vec![FakePage {
        header: header(),
        rows: vec![data_row("slow@example.com", "slow")],
    }];
    let mut session = FakeSession::new(pages);
    session.details.insert(
        "user:slow@example.com".to_string(),
        FakeDetail {
            never_ready: true,
            ..Default::default()
        },
    );

    let report = crawl::run_at(&mut session, &test_config(), now())
        .await
        .unwrap();

    let row = &report.participants[0];
    assert_eq!(row.tier, StatusTier::NeverPosted);
    assert_eq!(session.open_contexts, 0, "timeout must still close the context");
    assert_eq!(session.polls_served["user:slow@example.com"], 30);
}

#[tokio::test(start_paused = true)]
async fn listing_lookalike_gives_up_after_ten_polls_as_no_posts() {
    let pages = vec![FakePage {
        header: header(),
        rows: vec![data_row("noposts@example.com", "noposts")],
    }];
    let mut session = FakeSession::new(pages);
    session.details.insert(
        "user:noposts@example.com".to_string(),
        FakeDetail {
            stays_listing: true,
            ..Default::default()
        },
    );

    let report = crawl::run_at(&mut session, &test_config(), now())
        .await
        .unwrap();

    let row = &report.participants[0];
    assert_eq!(row.tier, StatusTier::NeverPosted);
    assert_eq!(row.silence_hours, NEVER_HOURS);
    assert_eq!(session.polls_served["user:noposts@example.com"], 10);
    assert_eq!(session.open_contexts, 0);
}

#[tokio::test(start_paused = true)]
async fn slow_loading_detail_is_polled_until_ready() {
    let pages = vec![FakePage {
        header: header(),
        rows: vec![data_row("late@example.com", "late")],
    }];
    let mut session = FakeSession::new(pages);
    session.details.insert(
        "user:late@example.com".to_string(),
        FakeDetail {
            blank_polls: 5,
            posts: vec![raw_post("post-respondent", "2025-06-02 09:30")],
            ..Default::default()
        },
    );

    let report = crawl::run_at(&mut session, &test_config(), now())
        .await
        .unwrap();

    let row = &report.participants[0];
    assert_eq!(row.respondent_posts, 1);
    assert_eq!(row.silence_hours, 1);
    assert_eq!(session.polls_served["user:late@example.com"], 6);
}

#[tokio::test]
async fn end_to_end_scenario_with_moderated_thread() {
    let pages = vec![FakePage {
        header: header(),
        rows: vec![data_row("ala@example.com", "ala")],
    }];
    let mut session = FakeSession::new(pages);
    session.details.insert(
        "user:ala@example.com".to_string(),
        FakeDetail {
            posts: vec![
                raw_post("post-respondent", "2025-06-01 10:00"),
                raw_post("post-moderator", "2025-06-02 09:00"),
                raw_post("post-respondent", "2025-06-02 09:05"),
                raw_post("post-respondent", "2025-06-02 09:10"),
            ],
            ..Default::default()
        },
    );

    let report = crawl::run_at(&mut session, &test_config(), now())
        .await
        .unwrap();

    let row = &report.participants[0];
    assert_eq!(row.respondent_posts, 3);
    assert_eq!(row.moderator_posts, 1);
    assert_eq!(row.posts_since_moderator, 2);
    assert_eq!(row.silence_hours, 1);
    assert_eq!(row.last_activity.as_deref(), Some("2025-06-02 09:10"));
    assert_eq!(row.tier, StatusTier::OnTrack);
}
