//! Dated digest documents: naming, writing, and locating the latest one.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{DigestError, DigestResult};

/// File name for the digest of `date`.
#[must_use]
pub fn digest_file_name(date: NaiveDate, extension: &str) -> String {
    format!("digest_{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Matches `digest_YYYY-MM-DD.<ext>` file names.
#[derive(Debug, Clone)]
pub struct DigestPattern {
    regex: Regex,
    display: String,
}

impl DigestPattern {
    /// Pattern for the given extension (without the leading dot).
    #[must_use]
    pub fn new(extension: &str) -> Self {
        let regex = Regex::new(&format!(
            r"^digest_(\d{{4}}-\d{{2}}-\d{{2}})\.{}$",
            regex::escape(extension)
        ))
        .expect("digest pattern is a valid regex");
        Self { regex, display: format!("digest_YYYY-MM-DD.{extension}") }
    }

    /// Date embedded in a file name, or `None` if the name doesn't match or
    /// the date isn't a real calendar date.
    #[must_use]
    pub fn date_of(&self, file_name: &str) -> Option<NaiveDate> {
        let caps = self.regex.captures(file_name)?;
        NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
    }
}

impl std::fmt::Display for DigestPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Pick the candidate with the latest embedded date.
///
/// Non-matching names and invalid dates are skipped.
#[must_use]
pub fn select_latest<'a, I>(pattern: &DigestPattern, names: I) -> Option<(&'a str, NaiveDate)>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| pattern.date_of(name).map(|date| (name, date)))
        .max_by_key(|(_, date)| *date)
}

/// Find the most recent digest in `dir`.
///
/// # Errors
///
/// `NotFound` when no file matches, `Io` when the directory can't be listed.
pub fn locate_latest(dir: &Path, extension: &str) -> DigestResult<PathBuf> {
    let pattern = DigestPattern::new(extension);
    let entries = std::fs::read_dir(dir).map_err(|e| DigestError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DigestError::io(dir, e))?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }

    let (name, date) = select_latest(&pattern, names.iter().map(String::as_str)).ok_or_else(|| {
        DigestError::NotFound { dir: dir.to_path_buf(), pattern: pattern.to_string() }
    })?;

    tracing::info!(file = name, %date, candidates = names.len(), "Located latest digest");
    Ok(dir.join(name))
}

/// Write a digest document for `date` into `dir`, returning its path.
pub fn write_digest(dir: &Path, date: NaiveDate, extension: &str, content: &str) -> DigestResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| DigestError::io(dir, e))?;
    let path = dir.join(digest_file_name(date, extension));
    std::fs::write(&path, content).map_err(|e| DigestError::io(&path, e))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "Wrote digest");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_latest_by_date() {
        let pattern = DigestPattern::new("md");
        let names = ["digest_2024-01-01.md", "digest_2024-03-15.md", "digest_2023-12-31.md"];
        let (name, _) = select_latest(&pattern, names).unwrap();
        assert_eq!(name, "digest_2024-03-15.md");
    }

    #[test]
    fn test_invalid_dates_and_other_files_skipped() {
        let pattern = DigestPattern::new("md");
        let names = [
            "digest_2024-02-30.md",
            "digest_2025-13-01.md",
            "digest_2099-01-01.txt",
            "notes.md",
            "xdigest_2099-01-01.md",
            "digest_2024-02-29.md",
        ];
        let (name, date) = select_latest(&pattern, names).unwrap();
        assert_eq!(name, "digest_2024-02-29.md");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_no_candidates() {
        let pattern = DigestPattern::new("md");
        assert!(select_latest(&pattern, ["README.md"]).is_none());
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(digest_file_name(date, "md"), "digest_2024-03-05.md");
    }
}
