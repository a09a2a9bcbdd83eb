//! Markdown digest rendering.
//!
//! Each topic gets one level-2 heading; papers sit below it as level-3
//! headings so that topic sections can be cut back out by heading level.

use chrono::NaiveDate;

use crate::models::{PaperRecord, TopicProfile, minute_format};

/// Abstracts longer than this many characters are shortened.
const ABSTRACT_LIMIT: usize = 600;

/// Render the dated digest for all profiles, in profile order.
#[must_use]
pub fn format_digest_markdown(
    date: NaiveDate,
    profiles: &[TopicProfile],
    papers: &[PaperRecord],
) -> String {
    let mut output = format!("# arXiv Digest - {}\n\n", date.format("%Y-%m-%d"));
    output.push_str(&format!("**Papers**: {} | **Topics**: {}\n\n", papers.len(), profiles.len()));

    for profile in profiles {
        output.push_str(&format_topic_markdown(&profile.name, papers));
    }

    output
}

/// Render one topic section with the papers it owns.
#[must_use]
pub fn format_topic_markdown(topic: &str, papers: &[PaperRecord]) -> String {
    let mut output = format!("## {topic}\n\n");
    let owned: Vec<&PaperRecord> = papers.iter().filter(|p| p.topic == topic).collect();

    if owned.is_empty() {
        output.push_str("_No new papers._\n\n");
        return output;
    }

    for paper in owned {
        output.push_str(&format_paper_markdown(paper));
        output.push('\n');
    }

    output
}

/// Render a single paper entry.
#[must_use]
pub fn format_paper_markdown(paper: &PaperRecord) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("### [{}]({})\n\n", paper.title, paper.url));

    // Authors
    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));
    }

    let mut meta = vec![
        format!("**arXiv**: {}", paper.id),
        format!("**Updated**: {}", paper.updated_at.format(minute_format::FORMAT)),
    ];
    if !paper.categories.is_empty() {
        meta.push(format!("**Categories**: {}", paper.categories.join(", ")));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    // Abstract (truncated on a char boundary)
    if !paper.summary.is_empty() {
        let summary = if paper.summary.chars().count() > ABSTRACT_LIMIT {
            let cut: String = paper.summary.chars().take(ABSTRACT_LIMIT).collect();
            format!("{}...", cut.trim_end())
        } else {
            paper.summary.clone()
        };
        output.push_str(&format!("**Abstract**: {summary}\n"));
    }

    output
}
