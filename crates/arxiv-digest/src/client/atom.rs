//! Atom feed to search hits.

use feed_rs::model::Entry;

use crate::error::{ClientError, ClientResult};
use crate::models::SearchHit;

/// Marker in the id of the entry arXiv returns instead of results on a bad query.
const ERROR_ENTRY_MARKER: &str = "/api/errors";

/// Parse an arXiv Atom response body.
///
/// # Errors
///
/// `Feed` if the body is not a feed, `BadRequest` if arXiv answered with its
/// error entry.
pub fn parse_feed(body: &[u8]) -> ClientResult<Vec<SearchHit>> {
    let feed = feed_rs::parser::parse(body).map_err(|e| ClientError::Feed(e.to_string()))?;

    let mut hits = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        if entry.id.contains(ERROR_ENTRY_MARKER) {
            let message = entry.summary.map(|s| s.content).unwrap_or(entry.id);
            return Err(ClientError::bad_request(message.trim()));
        }
        hits.push(to_hit(entry));
    }

    tracing::debug!(entries = hits.len(), "Parsed Atom feed");
    Ok(hits)
}

fn to_hit(entry: Entry) -> SearchHit {
    let url = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone());

    SearchHit {
        entry_id: entry.id,
        title: entry.title.map(|t| t.content),
        authors: entry.authors.into_iter().map(|p| p.name).collect(),
        summary: entry.summary.map(|s| s.content),
        published: entry.published,
        updated: entry.updated,
        categories: entry.categories.into_iter().map(|c| c.term).collect(),
        url,
    }
}
