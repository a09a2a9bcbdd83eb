//! Cross-topic deduplication, ordering, and persistence of the paper collection.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DigestError, DigestResult};
use crate::models::PaperRecord;

/// Merge records from all topics into one collection.
///
/// Records are keyed by `id`. A repeated id replaces the earlier record in
/// place, so the last-processed topic owns a cross-listed paper while the
/// slot of its first appearance is kept. The result is then stably sorted by
/// `updated_at`, newest first.
#[must_use]
pub fn merge_papers(records: impl IntoIterator<Item = PaperRecord>) -> Vec<PaperRecord> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<PaperRecord> = Vec::new();
    let mut duplicates = 0usize;

    for record in records {
        match slots.get(&record.id).copied() {
            Some(slot) => {
                tracing::debug!(
                    id = %record.id,
                    from = %merged[slot].topic,
                    to = %record.topic,
                    "Cross-listed paper reassigned"
                );
                merged[slot] = record;
                duplicates += 1;
            }
            None => {
                slots.insert(record.id.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    // Vec::sort_by is stable: equal timestamps keep insertion order.
    merged.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    tracing::info!(unique = merged.len(), duplicates, "Merged paper collection");
    merged
}

/// Write the collection as pretty JSON, creating parent directories.
pub fn save_collection(path: &Path, papers: &[PaperRecord]) -> DigestResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DigestError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(papers)?;
    std::fs::write(path, json).map_err(|e| DigestError::io(path, e))?;

    tracing::info!(path = %path.display(), count = papers.len(), "Saved paper collection");
    Ok(())
}

/// Read a previously saved collection.
pub fn load_collection(path: &Path) -> DigestResult<Vec<PaperRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| DigestError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}
