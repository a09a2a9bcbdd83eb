//! Configuration for the digest pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// arXiv API constants.
pub mod api {
    use std::time::Duration;

    /// Atom query endpoint.
    pub const QUERY_URL: &str = "https://export.arxiv.org/api/query";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay between consecutive queries (arXiv asks for 3s between calls).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(3);

    /// Maximum retries for transient HTTP failures.
    pub const MAX_RETRIES: u32 = 3;

    /// User agent sent with every request.
    pub const USER_AGENT: &str = concat!("arxiv-digest/", env!("CARGO_PKG_VERSION"));
}

/// File and branch defaults.
pub mod defaults {
    /// Topic profile file.
    pub const TOPICS_FILE: &str = "topics.yml";

    /// Topic registry consumed by the publisher.
    pub const REGISTRY_FILE: &str = "topic.json";

    /// Persisted paper collection.
    pub const PAPERS_FILE: &str = "data/arxiv.json";

    /// Static page output directory.
    pub const PAGE_DIR: &str = "out";

    /// Digest document extension.
    pub const DIGEST_EXTENSION: &str = "md";

    /// Per-topic output file stem.
    pub const OUTPUT_STEM: &str = "digest";

    /// Branch the registry is read from.
    pub const SOURCE_BRANCH: &str = "main";

    /// Branch per-topic outputs are published to.
    pub const PUBLISH_BRANCH: &str = "gh-pages";

    /// Remote used for pull and push.
    pub const REMOTE: &str = "origin";

    /// Result cap for profiles that don't set `max`.
    pub const MAX_RESULTS: u32 = 10;
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// arXiv query endpoint (overridable for mock servers).
    pub api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay before each search request.
    pub rate_limit_delay: Duration,

    /// Retries for transient HTTP failures.
    pub max_retries: u32,

    /// Repository working tree root.
    pub repo_root: PathBuf,

    /// Topic profile file (YAML).
    pub topics_path: PathBuf,

    /// Topic registry file (JSON array of `{name}` objects).
    pub registry_path: PathBuf,

    /// Where the merged paper collection is written.
    pub papers_path: PathBuf,

    /// Directory holding `digest_YYYY-MM-DD.<ext>` documents.
    pub digest_dir: PathBuf,

    /// Digest and per-topic output extension.
    pub digest_extension: String,

    /// Static page output directory.
    pub page_dir: PathBuf,

    /// Branch to read the registry from; `None` reads the working tree as is.
    pub source_branch: Option<String>,

    /// Branch receiving per-topic outputs.
    pub publish_branch: String,

    /// Remote for pull and push.
    pub remote: String,
}

impl Config {
    /// Create a configuration rooted at `repo_root` with default file layout.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        Self {
            api_url: api::QUERY_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            max_retries: api::MAX_RETRIES,
            topics_path: repo_root.join(defaults::TOPICS_FILE),
            registry_path: repo_root.join(defaults::REGISTRY_FILE),
            papers_path: repo_root.join(defaults::PAPERS_FILE),
            digest_dir: repo_root.clone(),
            digest_extension: defaults::DIGEST_EXTENSION.to_string(),
            page_dir: repo_root.join(defaults::PAGE_DIR),
            source_branch: Some(defaults::SOURCE_BRANCH.to_string()),
            publish_branch: defaults::PUBLISH_BRANCH.to_string(),
            remote: defaults::REMOTE.to_string(),
            repo_root,
        }
    }

    /// Create a test configuration pointing at a mock server and a scratch directory.
    #[must_use]
    pub fn for_testing(base_url: &str, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            api_url: format!("{}/api/query", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
            source_branch: None,
            ..Self::new(repo_root)
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `ARXIV_DIGEST_ROOT` sets the repository root (default: current directory),
    /// `ARXIV_API_URL` the query endpoint, `ARXIV_DIGEST_BRANCH` the publish branch.
    ///
    /// # Errors
    ///
    /// Returns error if the current directory cannot be determined.
    pub fn from_env() -> anyhow::Result<Self> {
        let root = match std::env::var_os("ARXIV_DIGEST_ROOT") {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir()?,
        };
        Ok(Self::new(root).with_env_overrides())
    }

    /// Apply `ARXIV_API_URL` and `ARXIV_DIGEST_BRANCH` if set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("ARXIV_API_URL") {
            self.api_url = url;
        }
        if let Ok(branch) = std::env::var("ARXIV_DIGEST_BRANCH") {
            self.publish_branch = branch;
        }
        self
    }

    /// Path of the per-topic output file.
    #[must_use]
    pub fn topic_output_path(&self, topic: &str) -> PathBuf {
        self.repo_root
            .join(topic)
            .join(format!("{}.{}", defaults::OUTPUT_STEM, self.digest_extension))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}
