//! Topic profiles loaded from `topics.yml`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::{DigestError, DigestResult};

/// A named filter definition describing one subset of papers to collect.
///
/// Built only through [`load_profiles`] / [`parse_profiles`], so every
/// instance already has trimmed keywords and a positive result cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicProfile {
    /// Unique topic name, also the heading used in the digest.
    pub name: String,

    /// arXiv category codes (e.g. `cs.CL`), ANDed together.
    pub categories: Vec<String>,

    /// Keywords that must appear in the title or abstract.
    pub include: Vec<String>,

    /// Keywords that reject a hit when present in title or summary.
    pub exclude: Vec<String>,

    /// Result cap for this topic's query.
    pub max_results: u32,
}

impl TopicProfile {
    /// Profile with only a name and the default cap.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            max_results: defaults::MAX_RESULTS,
        }
    }

    /// True when the profile constrains nothing and will match every paper.
    #[must_use]
    pub fn is_broad(&self) -> bool {
        self.categories.is_empty() && self.include.is_empty()
    }
}

/// On-disk shape of a profile entry.
#[derive(Debug, Deserialize)]
struct ProfileSpec {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    max: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TopicsFile {
    profiles: Option<Vec<ProfileSpec>>,
}

/// Load topic profiles from a YAML file.
pub fn load_profiles(path: &Path) -> DigestResult<Vec<TopicProfile>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        DigestError::config(path, format!("cannot read topic profiles: {e}"))
    })?;
    parse_profiles(&text, path)
}

/// Parse topic profiles from YAML text; `origin` is used in error messages.
pub fn parse_profiles(text: &str, origin: &Path) -> DigestResult<Vec<TopicProfile>> {
    let file: TopicsFile = serde_yaml::from_str(text)
        .map_err(|e| DigestError::config(origin, format!("invalid YAML: {e}")))?;

    let specs = file
        .profiles
        .ok_or_else(|| DigestError::config(origin, "missing `profiles` list"))?;
    if specs.is_empty() {
        return Err(DigestError::config(origin, "`profiles` list is empty"));
    }

    let mut seen = HashSet::new();
    let mut profiles = Vec::with_capacity(specs.len());

    for (index, spec) in specs.into_iter().enumerate() {
        let name = spec.name.as_deref().map(str::trim).unwrap_or_default().to_string();
        if name.is_empty() {
            return Err(DigestError::config(origin, format!("profile #{} has no name", index + 1)));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(DigestError::config(origin, format!("duplicate profile name '{name}'")));
        }

        let max_results = match spec.max {
            None => defaults::MAX_RESULTS,
            Some(max) if max > 0 => u32::try_from(max).unwrap_or(u32::MAX),
            Some(max) => {
                return Err(DigestError::config(
                    origin,
                    format!("profile '{name}': max must be positive, got {max}"),
                ));
            }
        };

        profiles.push(TopicProfile {
            categories: dedup_preserving(clean(spec.categories)),
            include: clean(spec.include),
            exclude: clean(spec.exclude),
            max_results,
            name,
        });
    }

    tracing::debug!(count = profiles.len(), path = %origin.display(), "Loaded topic profiles");
    Ok(profiles)
}

fn clean(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn dedup_preserving(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}
