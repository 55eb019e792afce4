/// Error taxonomy for the crawl engine.
///
/// Variants map to distinct recovery policies: `Parse` drops a single post,
/// `SelectorNotFound` downgrades one participant to the error tier,
/// `CorrelationTimeout` is read as "no posts found", and `Navigation` aborts
/// the whole crawl.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("unrecognized timestamp: {0:?}")]
    Parse(String),

    #[error("no actionable control found for {what}")]
    SelectorNotFound { what: &'static str },

    #[error("detail view did not materialize within {polls} polls")]
    CorrelationTimeout { polls: u32 },

    #[error("listing navigation failed: {0}")]
    Navigation(String),
}
