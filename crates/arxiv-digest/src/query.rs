//! Query planning: topic profile to arXiv `search_query` expression.

use std::fmt;

use crate::models::TopicProfile;

/// One ANDed clause of a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `cat:<code>`
    Category(String),
    /// `(ti:"<kw>" OR abs:"<kw>")`
    Keyword(String),
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(code) => write!(f, "cat:{code}"),
            Self::Keyword(kw) => {
                let kw = quote(kw);
                write!(f, "(ti:{kw} OR abs:{kw})")
            }
        }
    }
}

/// A planned search: clauses ANDed together, bounded by `max_results`.
///
/// No clauses means "match everything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Clauses, categories first, in profile order.
    pub clauses: Vec<Clause>,

    /// Result cap.
    pub max_results: u32,
}

impl SearchQuery {
    /// Expression used when a profile has no constraints.
    pub const MATCH_ALL: &'static str = "all:*";

    /// True when the query has no constraints.
    #[must_use]
    pub fn matches_everything(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render the arXiv `search_query` parameter.
    #[must_use]
    pub fn expression(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str(Self::MATCH_ALL);
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Build the query for one profile.
#[must_use]
pub fn plan_query(profile: &TopicProfile) -> SearchQuery {
    let clauses = profile
        .categories
        .iter()
        .map(|c| Clause::Category(c.clone()))
        .chain(profile.include.iter().map(|kw| Clause::Keyword(kw.clone())))
        .collect();

    SearchQuery { clauses, max_results: profile.max_results }
}

// Phrase-quote a keyword; embedded quotes would end the phrase early.
fn quote(keyword: &str) -> String {
    format!("\"{}\"", keyword.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(categories: &[&str], include: &[&str]) -> TopicProfile {
        TopicProfile {
            categories: categories.iter().map(ToString::to_string).collect(),
            include: include.iter().map(ToString::to_string).collect(),
            ..TopicProfile::named("Test")
        }
    }

    #[test]
    fn test_empty_profile_matches_everything() {
        let query = plan_query(&profile(&[], &[]));
        assert!(query.matches_everything());
        assert_eq!(query.expression(), "all:*");
        assert_eq!(query.max_results, 10);
    }

    #[test]
    fn test_categories_are_anded() {
        let query = plan_query(&profile(&["cs.AI", "cs.CL"], &[]));
        assert_eq!(query.expression(), "cat:cs.AI AND cat:cs.CL");
    }

    #[test]
    fn test_keywords_expand_to_title_or_abstract() {
        let query = plan_query(&profile(&["cs.CL"], &["large language model", "agent"]));
        assert_eq!(
            query.expression(),
            "cat:cs.CL AND (ti:\"large language model\" OR abs:\"large language model\") \
             AND (ti:\"agent\" OR abs:\"agent\")"
        );
    }

    #[test]
    fn test_keyword_quotes_stripped() {
        let query = plan_query(&profile(&[], &["say \"hi\""]));
        assert_eq!(query.expression(), "(ti:\"say hi\" OR abs:\"say hi\")");
    }
}
