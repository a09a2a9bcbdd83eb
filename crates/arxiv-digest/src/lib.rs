//! arXiv topic digests
//!
//! Collects recent arXiv papers for a set of topic profiles, writes a dated
//! digest, and publishes each topic's section to its own folder on a
//! dedicated git branch.
//!
//! # Pipeline
//!
//! - **Fetch**: [`query::plan_query`] builds one search per profile,
//!   [`filter::filter_hits`] drops excluded hits, and [`collect::merge_papers`]
//!   deduplicates and orders the collection before the digest is rendered.
//! - **Publish**: [`publish::Publisher`] locates the latest digest, splits it
//!   per topic with [`extract::extract_topic`], then commits and pushes.
//! - **Page**: [`pipeline::run_page`] renders a static HTML page.
//!
//! # Example
//!
//! ```no_run
//! use arxiv_digest::{client::ArxivClient, config::Config, pipeline::run_fetch};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ArxivClient::new(&config)?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let report = run_fetch(&config, &client, today).await?;
//!     println!("{} papers", report.unique_papers);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod collect;
pub mod config;
pub mod digest;
pub mod error;
pub mod extract;
pub mod filter;
pub mod formatters;
pub mod models;
pub mod pipeline;
pub mod publish;
pub mod query;

pub use client::{ArxivClient, SearchBackend};
pub use config::Config;
pub use error::{ClientError, DigestError, DigestResult};
pub use extract::Extraction;
pub use models::{PaperRecord, TopicProfile};
pub use publish::Publisher;
