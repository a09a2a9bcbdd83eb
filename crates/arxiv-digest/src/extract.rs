//! Per-topic section extraction from a composite digest.
//!
//! A section starts at a `## <topic>` line and runs up to the next line that
//! opens another level-2 heading. Topic names are matched as literal text,
//! case-insensitively; deeper headings (`### `) stay inside the section.

use regex::{Regex, RegexBuilder};

/// Outcome of extracting one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The trimmed section, heading line included.
    Found(String),
    /// The topic has no heading in the digest; holds the placeholder text.
    Missing(String),
}

impl Extraction {
    /// Text to write for this topic, whichever variant it is.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Found(text) | Self::Missing(text) => text,
        }
    }

    /// True if the topic heading was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Placeholder written for a topic missing from the digest.
#[must_use]
pub fn placeholder(topic: &str) -> String {
    format!("No content found for {topic}")
}

/// Extract the section for `topic` from `document`.
#[must_use]
pub fn extract_topic(document: &str, topic: &str) -> Extraction {
    let Some(start) = find_heading(document, topic) else {
        tracing::debug!(topic, "Topic heading not found in digest");
        return Extraction::Missing(placeholder(topic));
    };

    let rest = &document[start..];
    // Skip the heading's own line before looking for the next boundary.
    let body_offset = rest.find('\n').map_or(rest.len(), |ix| ix + 1);
    let end = next_boundary(&rest[body_offset..]).map_or(rest.len(), |ix| body_offset + ix);

    Extraction::Found(rest[..end].trim().to_string())
}

fn find_heading(document: &str, topic: &str) -> Option<usize> {
    let pattern = format!(r"^##[ \t]+{}[ \t]*\r?$", regex::escape(topic.trim()));
    let heading = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .ok()?;
    heading.find(document).map(|m| m.start())
}

fn next_boundary(text: &str) -> Option<usize> {
    // "###" fails here: the third character must be whitespace.
    static BOUNDARY: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"(?m)^##[ \t]").expect("boundary pattern is a valid regex")
    });
    BOUNDARY.find(text).map(|m| m.start())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "## A\nfoo\n## B\nbar\n";

    #[test]
    fn test_extraction_boundary() {
        assert_eq!(extract_topic(DOC, "A"), Extraction::Found("## A\nfoo".to_string()));
        assert_eq!(extract_topic(DOC, "B"), Extraction::Found("## B\nbar".to_string()));
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(extract_topic(DOC, "a").content(), "## A\nfoo");
    }

    #[test]
    fn test_missing_topic_yields_placeholder() {
        let result = extract_topic(DOC, "C");
        assert!(!result.is_found());
        assert_eq!(result.content(), "No content found for C");
    }

    #[test]
    fn test_subheadings_stay_in_section() {
        let doc = "# Digest\n\n## NLP\n\n### Paper one\ntext\n\n### Paper two\nmore\n\n## Vision\nx\n";
        assert_eq!(
            extract_topic(doc, "NLP").content(),
            "## NLP\n\n### Paper one\ntext\n\n### Paper two\nmore"
        );
    }

    #[test]
    fn test_topic_is_literal_not_pattern() {
        let doc = "## C++ (systems)\nfast\n## Cxx (systems)\nslow\n";
        assert_eq!(extract_topic(doc, "C++ (systems)").content(), "## C++ (systems)\nfast");
        assert!(!extract_topic(doc, "C.. .systems.").is_found());
    }

    #[test]
    fn test_heading_must_match_whole_name() {
        let doc = "## LLM Agents\nagents\n## LLM\nplain\n";
        assert_eq!(extract_topic(doc, "LLM").content(), "## LLM\nplain");
    }

    #[test]
    fn test_heading_must_start_line() {
        let doc = "intro mentions ## A inline\n## A\nreal\n";
        assert_eq!(extract_topic(doc, "A").content(), "## A\nreal");
    }

    #[test]
    fn test_last_section_runs_to_end() {
        let doc = "## A\nfoo\n## B\nbar\n\nbaz\n\n";
        assert_eq!(extract_topic(doc, "B").content(), "## B\nbar\n\nbaz");
    }
}
