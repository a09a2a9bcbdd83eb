//! Paper records and the raw search hits they are built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry as returned by the search backend, before filtering.
///
/// Every field the backend may omit is optional; the result filter decides
/// what counts as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHit {
    /// Entry id, e.g. `http://arxiv.org/abs/2501.01234v1`.
    pub entry_id: String,

    /// Paper title.
    pub title: Option<String>,

    /// Author names in listed order.
    pub authors: Vec<String>,

    /// Abstract.
    pub summary: Option<String>,

    /// First submission time.
    pub published: Option<DateTime<Utc>>,

    /// Last revision time.
    pub updated: Option<DateTime<Utc>>,

    /// Category terms (primary first when the feed lists it first).
    pub categories: Vec<String>,

    /// Landing page link, if the feed gave an alternate link.
    pub url: Option<String>,
}

impl SearchHit {
    /// Short arXiv id: the part after `/abs/`, version suffix kept.
    #[must_use]
    pub fn short_id(&self) -> &str {
        let id = self.entry_id.trim();
        match id.rfind("/abs/") {
            Some(ix) => &id[ix + "/abs/".len()..],
            None => id.rsplit('/').next().unwrap_or(id),
        }
    }
}

/// A normalized paper, identified by `id`.
///
/// Serialized with the field names of the persisted `arxiv.json` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Short arXiv id.
    #[serde(rename = "arxiv_id")]
    pub id: String,

    /// Title with whitespace collapsed.
    pub title: String,

    /// Author names.
    pub authors: Vec<String>,

    /// Single-line abstract.
    pub summary: String,

    /// First submission, minute precision.
    #[serde(rename = "published", with = "minute_format")]
    pub published_at: DateTime<Utc>,

    /// Last revision, minute precision.
    #[serde(rename = "updated", with = "minute_format")]
    pub updated_at: DateTime<Utc>,

    /// Name of the profile that discovered the paper.
    #[serde(rename = "category")]
    pub topic: String,

    /// arXiv category terms.
    pub categories: Vec<String>,

    /// Entry URL.
    pub url: String,
}

impl PaperRecord {
    /// Author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }
}

/// `YYYY-MM-DD HH:MM` (UTC) timestamps.
pub mod minute_format {
    use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format string shared by serialization and display.
    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Drop seconds and sub-second precision.
    #[must_use]
    pub fn truncate(ts: DateTime<Utc>) -> DateTime<Utc> {
        ts.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(ts)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_short_id_keeps_version() {
        let hit = SearchHit {
            entry_id: "http://arxiv.org/abs/2501.01234v2".to_string(),
            ..Default::default()
        };
        assert_eq!(hit.short_id(), "2501.01234v2");

        let old_style = SearchHit {
            entry_id: "http://arxiv.org/abs/hep-th/9901001v1".to_string(),
            ..Default::default()
        };
        assert_eq!(old_style.short_id(), "hep-th/9901001v1");
    }

    #[test]
    fn test_record_serializes_minute_timestamps() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let record = PaperRecord {
            id: "2403.00001v1".to_string(),
            title: "T".to_string(),
            authors: vec!["Ada".to_string()],
            summary: "S".to_string(),
            published_at: ts,
            updated_at: ts,
            topic: "LLM".to_string(),
            categories: vec!["cs.CL".to_string()],
            url: "http://arxiv.org/abs/2403.00001v1".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["arxiv_id"], "2403.00001v1");
        assert_eq!(value["updated"], "2024-03-15 09:30");
        assert_eq!(value["category"], "LLM");

        let back: PaperRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_truncate_drops_seconds() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 59).unwrap();
        assert_eq!(minute_format::truncate(ts), Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap());
    }
}
