//! Topic registry: the canonical list of topic names to publish.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;

use crate::error::{DigestError, DigestResult};

/// Read topic names from the registry file.
pub fn load_registry(path: &Path) -> DigestResult<Vec<String>> {
    if !path.exists() {
        return Err(DigestError::config(path, "topic registry does not exist"));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| DigestError::config(path, format!("cannot read topic registry: {e}")))?;
    parse_registry(&text, path)
}

/// Parse a JSON array of `{ "name": ... }` objects into usable topic names.
///
/// Entries without a string `name`, with a blank name, or with a name that
/// isn't a single path component are skipped. Repeated names are kept once.
pub fn parse_registry(text: &str, origin: &Path) -> DigestResult<Vec<String>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| DigestError::config(origin, format!("invalid JSON: {e}")))?;

    let Value::Array(entries) = value else {
        return Err(DigestError::config(origin, "topic registry is not an array"));
    };

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let Some(name) = entry.get("name").and_then(Value::as_str).map(str::trim) else {
            tracing::warn!(index, "Registry entry has no name, skipping");
            continue;
        };
        if !is_usable(name) {
            tracing::warn!(index, name, "Registry entry has an unusable name, skipping");
            continue;
        }
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    if names.is_empty() {
        return Err(DigestError::config(origin, "topic registry has no usable `name` entries"));
    }

    tracing::info!(topics = names.len(), path = %origin.display(), "Resolved topics");
    Ok(names)
}

/// A name becomes a directory under the repo root, so it must be one plain component.
fn is_usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
