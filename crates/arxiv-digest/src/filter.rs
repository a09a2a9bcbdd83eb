//! Result filtering: exclude-keyword rejection and record normalization.

use crate::models::{PaperRecord, SearchHit, TopicProfile, minute_format};

/// Filter and normalize one profile's hits.
///
/// Hits mentioning any exclude keyword in title or summary are dropped, as are
/// malformed hits. Survivors keep backend order and are tagged with the
/// profile name.
#[must_use]
pub fn filter_hits(profile: &TopicProfile, hits: Vec<SearchHit>) -> Vec<PaperRecord> {
    let excludes: Vec<String> = profile.exclude.iter().map(|kw| kw.to_lowercase()).collect();
    let total = hits.len();

    let records: Vec<PaperRecord> = hits
        .into_iter()
        .filter(|hit| {
            let rejected = excluded_by(hit, &excludes);
            if let Some(kw) = rejected {
                tracing::debug!(topic = %profile.name, id = hit.short_id(), keyword = kw, "Excluded hit");
            }
            rejected.is_none()
        })
        .filter_map(|hit| normalize(hit, &profile.name))
        .collect();

    tracing::info!(
        topic = %profile.name,
        retrieved = total,
        kept = records.len(),
        "Filtered search results"
    );
    records
}

/// First exclude keyword found in the hit's title + summary, if any.
///
/// `excludes` must already be lowercase.
#[must_use]
pub fn excluded_by<'a>(hit: &SearchHit, excludes: &'a [String]) -> Option<&'a str> {
    if excludes.is_empty() {
        return None;
    }
    let haystack = format!(
        "{} {}",
        hit.title.as_deref().unwrap_or_default(),
        hit.summary.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    excludes.iter().map(String::as_str).find(|kw| haystack.contains(kw))
}

/// Turn a hit into a record, or `None` when required fields are missing.
#[must_use]
pub fn normalize(hit: SearchHit, topic: &str) -> Option<PaperRecord> {
    let id = hit.short_id().to_string();
    let title = hit.title.as_deref().map(collapse_whitespace).filter(|t| !t.is_empty());

    let (Some(title), Some(updated)) = (title, hit.updated) else {
        tracing::debug!(topic, entry = %hit.entry_id, "Dropping malformed hit");
        return None;
    };
    if id.is_empty() {
        tracing::debug!(topic, "Dropping hit without id");
        return None;
    }

    let published = hit.published.unwrap_or(updated);
    let url = hit.url.unwrap_or_else(|| hit.entry_id.trim().to_string());

    Some(PaperRecord {
        id,
        title,
        authors: hit
            .authors
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
        summary: hit.summary.as_deref().unwrap_or_default().trim().replace('\n', " "),
        published_at: minute_format::truncate(published),
        updated_at: minute_format::truncate(updated),
        topic: topic.to_string(),
        categories: hit.categories,
        url,
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hit(id: &str, title: &str, summary: &str) -> SearchHit {
        SearchHit {
            entry_id: format!("http://arxiv.org/abs/{id}"),
            title: Some(title.to_string()),
            authors: vec!["Ada Lovelace".to_string(), " ".to_string()],
            summary: Some(summary.to_string()),
            published: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            updated: Some(Utc.with_ymd_and_hms(2024, 1, 3, 3, 4, 5).unwrap()),
            categories: vec!["cs.CL".to_string(), "cs.AI".to_string()],
            url: None,
        }
    }

    fn profile(exclude: &[&str]) -> TopicProfile {
        TopicProfile {
            exclude: exclude.iter().map(ToString::to_string).collect(),
            ..TopicProfile::named("NLP")
        }
    }

    #[test]
    fn test_exclude_is_case_insensitive() {
        let hits = vec![
            hit("1", "A SURVEY of agents", "text"),
            hit("2", "Agents", "we present a Benchmark"),
            hit("3", "Agents", "plain"),
        ];
        let kept = filter_hits(&profile(&["Survey", "benchmark"]), hits);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "3");
    }

    #[test]
    fn test_normalize_sets_topic_and_cleans_fields() {
        let record = normalize(hit("2401.1v1", "Multi\n  line  title", "  first\nsecond  "), "NLP")
            .unwrap();
        assert_eq!(record.id, "2401.1v1");
        assert_eq!(record.title, "Multi line title");
        assert_eq!(record.summary, "first second");
        assert_eq!(record.authors, vec!["Ada Lovelace"]);
        assert_eq!(record.topic, "NLP");
        assert_eq!(record.categories, vec!["cs.CL", "cs.AI"]);
        assert_eq!(record.url, "http://arxiv.org/abs/2401.1v1");
        assert_eq!(record.updated_at, Utc.with_ymd_and_hms(2024, 1, 3, 3, 4, 0).unwrap());
    }

    #[test]
    fn test_malformed_hit_is_dropped_not_fatal() {
        let mut broken = hit("9", "Title", "s");
        broken.updated = None;
        let mut untitled = hit("8", "", "s");
        untitled.title = Some("   ".to_string());

        let kept = filter_hits(&profile(&[]), vec![broken, untitled, hit("7", "Ok", "s")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "7");
    }
}
