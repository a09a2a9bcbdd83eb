//! Fetch pipeline: profiles → queries → filtered hits → merged collection → digest.
//!
//! Runs strictly in sequence, one query at a time.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use crate::client::SearchBackend;
use crate::collect::{merge_papers, save_collection};
use crate::config::Config;
use crate::digest::{locate_latest, write_digest};
use crate::error::{DigestError, DigestResult};
use crate::filter::filter_hits;
use crate::formatters::{EMPTY_DIGEST, format_digest_markdown, format_page_html};
use crate::models::{PaperRecord, TopicProfile, load_profiles};
use crate::query::plan_query;

/// Outcome of a fetch run.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// Records kept per profile before merging, in profile order.
    pub per_topic: Vec<(String, usize)>,

    /// Unique papers after merging.
    pub unique_papers: usize,

    /// Persisted collection.
    pub papers_path: PathBuf,

    /// Rendered digest document.
    pub digest_path: PathBuf,
}

/// Query every profile in order and merge the results.
///
/// # Errors
///
/// The first failing query aborts the run.
pub async fn collect_papers(
    backend: &dyn SearchBackend,
    profiles: &[TopicProfile],
) -> DigestResult<(Vec<PaperRecord>, Vec<(String, usize)>)> {
    let mut all = Vec::new();
    let mut per_topic = Vec::with_capacity(profiles.len());

    for profile in profiles {
        let query = plan_query(profile);
        tracing::info!(topic = %profile.name, query = %query, "Searching");

        let hits = backend.search(&query).await.map_err(|e| {
            tracing::error!(topic = %profile.name, query = %query, error = %e, "Search failed");
            DigestError::from(e)
        })?;

        let records = filter_hits(profile, hits);
        per_topic.push((profile.name.clone(), records.len()));
        all.extend(records);
    }

    Ok((merge_papers(all), per_topic))
}

/// Full fetch: load profiles, search, persist the collection and write the dated digest.
pub async fn run_fetch(
    config: &Config,
    backend: &dyn SearchBackend,
    date: NaiveDate,
) -> DigestResult<FetchReport> {
    let profiles = load_profiles(&config.topics_path)?;
    tracing::info!(profiles = profiles.len(), "Starting fetch");

    let (papers, per_topic) = collect_papers(backend, &profiles).await?;
    save_collection(&config.papers_path, &papers)?;

    let document = format_digest_markdown(date, &profiles, &papers);
    let digest_path = write_digest(&config.digest_dir, date, &config.digest_extension, &document)?;

    Ok(FetchReport {
        per_topic,
        unique_papers: papers.len(),
        papers_path: config.papers_path.clone(),
        digest_path,
    })
}

/// Render `index.html` from the latest digest, or a placeholder page if there is none.
pub fn run_page(config: &Config, now: NaiveDateTime) -> DigestResult<PathBuf> {
    let digest = match locate_latest(&config.digest_dir, &config.digest_extension) {
        Ok(path) => std::fs::read_to_string(&path).map_err(|e| DigestError::io(&path, e))?,
        Err(DigestError::NotFound { .. }) => {
            tracing::warn!(dir = %config.digest_dir.display(), "No digest found, rendering placeholder page");
            EMPTY_DIGEST.to_string()
        }
        Err(e) => return Err(e),
    };

    std::fs::create_dir_all(&config.page_dir).map_err(|e| DigestError::io(&config.page_dir, e))?;
    let path = config.page_dir.join("index.html");
    std::fs::write(&path, format_page_html(&digest, now)).map_err(|e| DigestError::io(&path, e))?;

    tracing::info!(path = %path.display(), "Static page written");
    Ok(path)
}
