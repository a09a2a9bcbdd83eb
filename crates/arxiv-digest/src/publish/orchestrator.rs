//! Publish run: resolve topics, switch branch, split the digest, commit and push.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::command::CommandRunner;
use super::git::{CommitOutcome, Git};
use super::registry::load_registry;
use crate::config::Config;
use crate::digest::locate_latest;
use crate::error::{DigestError, DigestResult};
use crate::extract::{Extraction, extract_topic};

/// Steps of a publish run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    ResolveTopics,
    AcquirePublishContext,
    LocateDigest,
    ExtractAndWrite,
    CommitAndPush,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ResolveTopics => "resolve_topics",
            Self::AcquirePublishContext => "acquire_publish_context",
            Self::LocateDigest => "locate_digest",
            Self::ExtractAndWrite => "extract_and_write",
            Self::CommitAndPush => "commit_and_push",
        })
    }
}

/// Working-tree state carried between steps.
#[derive(Debug, Clone)]
pub struct PublishContext {
    /// Working tree root.
    pub repo_root: PathBuf,

    /// Branch currently checked out by this run, if it switched to one.
    pub checked_out: Option<String>,

    /// Branch receiving the per-topic outputs.
    pub publish_branch: String,

    /// Whether the publish branch was created by this run.
    pub created: bool,
}

impl PublishContext {
    fn new(config: &Config) -> Self {
        Self {
            repo_root: config.repo_root.clone(),
            checked_out: None,
            publish_branch: config.publish_branch.clone(),
            created: false,
        }
    }
}

/// Result of writing one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicOutcome {
    pub topic: String,
    pub path: PathBuf,
    /// False when the placeholder was written.
    pub found: bool,
}

/// Summary of a completed publish run.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub branch: String,
    pub branch_created: bool,
    pub digest_path: PathBuf,
    pub topics: Vec<TopicOutcome>,
    pub commit: CommitOutcome,
}

impl PublishReport {
    /// Topics whose heading was missing from the digest.
    pub fn missing_topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().filter(|t| !t.found).map(|t| t.topic.as_str())
    }
}

/// Commit message for a run date.
#[must_use]
pub fn commit_message(date: NaiveDate) -> String {
    format!("feat: sync {} digest to topic folders", date.format("%Y-%m-%d"))
}

/// Drives a publish run against a working tree.
///
/// Steps run in order and the first failure ends the run. Nothing is rolled
/// back: files and branch state produced before the failure stay as they are.
#[derive(Debug)]
pub struct Publisher<R> {
    config: Config,
    git: Git<R>,
}

impl<R: CommandRunner> Publisher<R> {
    #[must_use]
    pub fn new(config: Config, runner: R) -> Self {
        let git = Git::new(runner, config.repo_root.clone());
        Self { config, git }
    }

    /// Git wrapper used by this publisher.
    #[must_use]
    pub fn git(&self) -> &Git<R> {
        &self.git
    }

    /// Run every step for `date`.
    ///
    /// # Errors
    ///
    /// Any fatal step error. Missing topic sections are not errors; they show
    /// up in [`PublishReport::topics`].
    pub async fn run(&self, date: NaiveDate) -> DigestResult<PublishReport> {
        let mut ctx = PublishContext::new(&self.config);

        let topics = self
            .resolve_topics(&mut ctx)
            .await
            .inspect_err(|e| log_failure(PublishStage::ResolveTopics, e))?;

        self.acquire_publish_context(&mut ctx)
            .await
            .inspect_err(|e| log_failure(PublishStage::AcquirePublishContext, e))?;

        let digest_path =
            self.locate_digest().inspect_err(|e| log_failure(PublishStage::LocateDigest, e))?;

        let outcomes = self
            .extract_and_write(&ctx, &digest_path, &topics)
            .inspect_err(|e| log_failure(PublishStage::ExtractAndWrite, e))?;

        let commit = self
            .commit_and_push(&ctx, date)
            .await
            .inspect_err(|e| log_failure(PublishStage::CommitAndPush, e))?;

        Ok(PublishReport {
            branch: ctx.publish_branch,
            branch_created: ctx.created,
            digest_path,
            topics: outcomes,
            commit,
        })
    }

    /// Read the registry, from the source branch when one is configured.
    async fn resolve_topics(&self, ctx: &mut PublishContext) -> DigestResult<Vec<String>> {
        if let Some(source) = &self.config.source_branch {
            self.git.checkout(source).await?;
            ctx.checked_out = Some(source.clone());
            self.git.pull(&self.config.remote, source).await?;
        }
        load_registry(&self.config.registry_path)
    }

    /// Switch to the publish branch, creating it from the current position if absent.
    async fn acquire_publish_context(&self, ctx: &mut PublishContext) -> DigestResult<()> {
        let branch = &ctx.publish_branch;
        if self.git.branch_exists(branch, &self.config.remote).await? {
            self.git.checkout(branch).await?;
            self.git.pull(&self.config.remote, branch).await?;
        } else {
            tracing::info!(branch = %branch, "Publish branch missing, creating it");
            self.git.create_branch(branch).await?;
            ctx.created = true;
        }
        ctx.checked_out = Some(branch.clone());
        tracing::info!(branch = %branch, created = ctx.created, "On publish branch");
        Ok(())
    }

    fn locate_digest(&self) -> DigestResult<PathBuf> {
        let path = locate_latest(&self.config.digest_dir, &self.config.digest_extension)?;
        tracing::info!(path = %path.display(), "Located digest");
        Ok(path)
    }

    /// Write each topic's section to `<topic>/digest.<ext>`.
    fn extract_and_write(
        &self,
        ctx: &PublishContext,
        digest_path: &Path,
        topics: &[String],
    ) -> DigestResult<Vec<TopicOutcome>> {
        let document =
            std::fs::read_to_string(digest_path).map_err(|e| DigestError::io(digest_path, e))?;

        let mut outcomes = Vec::with_capacity(topics.len());
        for topic in topics {
            let extraction = extract_topic(&document, topic);
            if let Extraction::Missing(_) = &extraction {
                tracing::warn!(topic = %topic, digest = %digest_path.display(), "Topic section not found");
            }

            let dir = ctx.repo_root.join(topic);
            std::fs::create_dir_all(&dir).map_err(|e| DigestError::io(&dir, e))?;
            let path = self.config.topic_output_path(topic);
            std::fs::write(&path, extraction.content()).map_err(|e| DigestError::io(&path, e))?;

            tracing::debug!(topic = %topic, path = %path.display(), "Topic written");
            outcomes.push(TopicOutcome {
                topic: topic.clone(),
                path,
                found: extraction.is_found(),
            });
        }
        Ok(outcomes)
    }

    /// Stage, commit and push. An empty commit is a no-op but still pushes.
    async fn commit_and_push(&self, ctx: &PublishContext, date: NaiveDate) -> DigestResult<CommitOutcome> {
        self.git.add_all().await?;
        let outcome = self.git.commit(&commit_message(date)).await?;
        self.git.push(&self.config.remote, &ctx.publish_branch).await?;
        Ok(outcome)
    }
}

fn log_failure(stage: PublishStage, error: &DigestError) {
    tracing::error!(stage = %stage, kind = error.kind(), error = %error, "Publish step failed");
}
