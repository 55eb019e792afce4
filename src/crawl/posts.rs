/// Post extraction and aggregation for one participant's detail view.
use crate::crawl::types::{Post, PostAggregates};
use crate::session::RawPost;
use crate::timeparse;

/// Marker substring identifying a moderator-authored post node.
const MODERATOR_MARKER: &str = "moderator";

/// Compute aggregate counters from raw post nodes.
///
/// The author role comes from the node's structural marker; the timestamp
/// from the first text node only (annotation text nested deeper in the node
/// never reaches this function). Posts whose timestamp fails to parse are
/// dropped and counted in `parse_failures` for diagnostics.
pub fn parse(raw_posts: &[RawPost], reference_year: i32) -> PostAggregates {
    let mut posts: Vec<Post> = Vec::with_capacity(raw_posts.len());
    let mut parse_failures = 0u32;

    for raw in raw_posts {
        let is_moderator = raw.marker.to_lowercase().contains(MODERATOR_MARKER);
        let Some(timestamp_text) = raw.text_nodes.first() else {
            parse_failures += 1;
            continue;
        };
        match timeparse::parse_timestamp(timestamp_text, reference_year) {
            Ok(timestamp) => posts.push(Post {
                timestamp,
                is_moderator,
            }),
            Err(_) => parse_failures += 1,
        }
    }

    posts.sort_by_key(|post| post.timestamp);
    aggregate(&posts, parse_failures)
}

fn aggregate(posts: &[Post], parse_failures: u32) -> PostAggregates {
    let last_moderator_post = posts
        .iter()
        .filter(|p| p.is_moderator)
        .map(|p| p.timestamp)
        .max();
    let last_activity = posts
        .iter()
        .filter(|p| !p.is_moderator)
        .map(|p| p.timestamp)
        .max();

    let respondent_posts = posts.iter().filter(|p| !p.is_moderator).count() as u32;
    let moderator_posts = posts.iter().filter(|p| p.is_moderator).count() as u32;

    // With no moderator post at all, every respondent post is unanswered.
    let posts_since_moderator = match last_moderator_post {
        Some(cutoff) => posts
            .iter()
            .filter(|p| !p.is_moderator && p.timestamp > cutoff)
            .count() as u32,
        None => respondent_posts,
    };

    PostAggregates {
        respondent_posts,
        moderator_posts,
        posts_since_moderator,
        last_activity,
        last_moderator_post,
        parse_failures,
    }
}
