//! Property-based tests for filtering, deduplication and ordering.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use arxiv_digest::collect::merge_papers;
use arxiv_digest::filter::filter_hits;
use arxiv_digest::models::{PaperRecord, SearchHit, TopicProfile};

const TOPICS: [&str; 3] = ["NLP", "Vision", "Robotics"];

/// Records with ids drawn from a small pool so duplicates are common, and
/// timestamps from a narrow range so ties are common.
fn arb_record() -> impl Strategy<Value = PaperRecord> {
    (0usize..8, 0usize..TOPICS.len(), 0i64..4).prop_map(|(id, topic, minute)| {
        let ts = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap() + chrono::TimeDelta::minutes(minute);
        PaperRecord {
            id: format!("2501.{id:05}"),
            title: format!("Paper {id}"),
            authors: vec!["A. Author".to_string()],
            summary: String::new(),
            published_at: ts,
            updated_at: ts,
            topic: TOPICS[topic].to_string(),
            categories: vec!["cs.LG".to_string()],
            url: format!("http://arxiv.org/abs/2501.{id:05}"),
        }
    })
}

fn arb_hit() -> impl Strategy<Value = SearchHit> {
    (0u32..1000, "[a-z ]{1,30}", "[a-z ]{0,60}").prop_map(|(n, title, summary)| SearchHit {
        entry_id: format!("http://arxiv.org/abs/2501.{n:05}v1"),
        title: Some(format!("t {title}")),
        summary: Some(summary),
        updated: Some(Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()),
        ..SearchHit::default()
    })
}

proptest! {
    /// Each id appears once and carries the topic of its last occurrence.
    #[test]
    fn merge_keeps_unique_ids_last_topic_wins(records in proptest::collection::vec(arb_record(), 0..40)) {
        let merged = merge_papers(records.clone());

        let ids: HashSet<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        prop_assert_eq!(ids.len(), merged.len());

        for paper in &merged {
            let last = records.iter().rev().find(|r| r.id == paper.id).unwrap();
            prop_assert_eq!(&paper.topic, &last.topic);
            prop_assert_eq!(paper.updated_at, last.updated_at);
        }
    }

    /// Output is newest first and ties keep first-seen order.
    #[test]
    fn merge_sorts_stably_by_updated(records in proptest::collection::vec(arb_record(), 0..40)) {
        let merged = merge_papers(records.clone());

        for pair in merged.windows(2) {
            prop_assert!(pair[0].updated_at >= pair[1].updated_at);
        }

        let first_seen = |id: &str| records.iter().position(|r| r.id == id).unwrap();
        for pair in merged.windows(2) {
            if pair[0].updated_at == pair[1].updated_at {
                prop_assert!(first_seen(&pair[0].id) < first_seen(&pair[1].id));
            }
        }
    }

    /// No kept record mentions an exclude keyword, whatever the include keywords say.
    #[test]
    fn filter_never_keeps_excluded(
        hits in proptest::collection::vec(arb_hit(), 0..30),
        keyword in "[a-z]{2,4}",
        include in "[a-z]{2,4}",
    ) {
        let profile = TopicProfile {
            include: vec![include],
            exclude: vec![keyword.to_uppercase()],
            ..TopicProfile::named("NLP")
        };
        let kept = filter_hits(&profile, hits);

        for record in &kept {
            let haystack = format!("{} {}", record.title, record.summary).to_lowercase();
            prop_assert!(!haystack.contains(&keyword));
            prop_assert_eq!(&record.topic, "NLP");
        }
    }
}
