//! Git operations used by the publisher.

use std::path::{Path, PathBuf};

use super::command::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::{DigestError, DigestResult};

/// Phrases git prints when a commit has nothing staged.
const NOTHING_TO_COMMIT: &[&str] = &["nothing to commit", "nothing added to commit"];

/// Result of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was created.
    Committed,
    /// Nothing was staged; no commit created.
    NothingToCommit,
}

/// Thin git wrapper over a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct Git<R> {
    runner: R,
    repo: PathBuf,
}

impl<R: CommandRunner> Git<R> {
    /// Git bound to a working tree.
    #[must_use]
    pub fn new(runner: R, repo: impl Into<PathBuf>) -> Self {
        Self { runner, repo: repo.into() }
    }

    /// Working tree root.
    #[must_use]
    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Underlying runner.
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn spec(&self, args: &[&str]) -> CommandSpec {
        // Stable English messages: commit outcome detection reads them.
        CommandSpec::new("git", args.iter().copied(), &self.repo).with_env("LC_ALL", "C")
    }

    /// Run and return output whatever the exit status; only a failure to start is an error.
    async fn try_run(&self, args: &[&str]) -> DigestResult<(CommandSpec, CommandOutput)> {
        let spec = self.spec(args);
        match self.runner.run(&spec).await {
            Ok(output) => Ok((spec, output)),
            Err(e) => {
                tracing::error!(command = %spec, error = %e, "Failed to start command");
                Err(DigestError::command(spec.to_string(), "failed to start", e.to_string()))
            }
        }
    }

    /// Run and fail on non-zero exit.
    async fn run(&self, args: &[&str]) -> DigestResult<CommandOutput> {
        let (spec, output) = self.try_run(args).await?;
        if output.success {
            tracing::info!(command = %spec, "Git command succeeded");
            Ok(output)
        } else {
            Err(command_failed(&spec, &output))
        }
    }

    /// True if `branch` exists locally or as a remote-tracking branch of `remote`.
    pub async fn branch_exists(&self, branch: &str, remote: &str) -> DigestResult<bool> {
        let local = format!("refs/heads/{branch}");
        let (_, output) = self.try_run(&["rev-parse", "--verify", "--quiet", &local]).await?;
        if output.success {
            return Ok(true);
        }
        let tracking = format!("refs/remotes/{remote}/{branch}");
        let (_, output) = self.try_run(&["rev-parse", "--verify", "--quiet", &tracking]).await?;
        tracing::debug!(branch, exists = output.success, "Checked publish branch");
        Ok(output.success)
    }

    /// `git checkout <branch>`
    pub async fn checkout(&self, branch: &str) -> DigestResult<()> {
        self.run(&["checkout", branch]).await.map(drop)
    }

    /// `git checkout -b <branch>`
    pub async fn create_branch(&self, branch: &str) -> DigestResult<()> {
        self.run(&["checkout", "-b", branch]).await.map(drop)
    }

    /// `git pull <remote> <branch>`
    pub async fn pull(&self, remote: &str, branch: &str) -> DigestResult<()> {
        self.run(&["pull", remote, branch]).await.map(drop)
    }

    /// `git add .`
    pub async fn add_all(&self) -> DigestResult<()> {
        self.run(&["add", "."]).await.map(drop)
    }

    /// `git commit -m <message>`; an empty index is a no-op, not an error.
    pub async fn commit(&self, message: &str) -> DigestResult<CommitOutcome> {
        let (spec, output) = self.try_run(&["commit", "-m", message]).await?;
        if output.success {
            tracing::info!(command = %spec, "Committed");
            return Ok(CommitOutcome::Committed);
        }
        if NOTHING_TO_COMMIT.iter().any(|phrase| output.mentions(phrase)) {
            tracing::info!(command = %spec, "Nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }
        Err(command_failed(&spec, &output))
    }

    /// `git push <remote> <branch>`
    pub async fn push(&self, remote: &str, branch: &str) -> DigestResult<()> {
        self.run(&["push", remote, branch]).await.map(drop)
    }
}

fn command_failed(spec: &CommandSpec, output: &CommandOutput) -> DigestError {
    let detail = if output.stderr.trim().is_empty() { &output.stdout } else { &output.stderr };
    tracing::error!(
        command = %spec,
        status = %output.status_text(),
        stderr = %detail.trim(),
        "Git command failed"
    );
    DigestError::command(spec.to_string(), output.status_text(), detail.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replies with the first matching canned output, success otherwise.
    struct Canned {
        replies: Vec<(&'static str, CommandOutput)>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl CommandRunner for Canned {
        async fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput> {
            let line = command.args.join(" ");
            self.seen.lock().unwrap().push(line.clone());
            Ok(self
                .replies
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix))
                .map(|(_, out)| out.clone())
                .unwrap_or_else(|| CommandOutput::ok("")))
        }
    }

    fn git(replies: Vec<(&'static str, CommandOutput)>) -> Git<Canned> {
        Git::new(Canned { replies, seen: Mutex::new(Vec::new()) }, "/repo")
    }

    #[tokio::test]
    async fn test_commit_nothing_staged_is_noop() {
        let git = git(vec![(
            "commit",
            CommandOutput::failed("On branch gh-pages\nnothing to commit, working tree clean\n", ""),
        )]);
        assert_eq!(git.commit("msg").await.unwrap(), CommitOutcome::NothingToCommit);
    }

    #[tokio::test]
    async fn test_commit_other_failure_is_fatal() {
        let git = git(vec![("commit", CommandOutput::failed("", "fatal: unable to write index"))]);
        let err = git.commit("msg").await.unwrap_err();
        assert!(err.to_string().contains("git commit -m msg"));
        assert!(err.to_string().contains("unable to write index"));
    }

    #[tokio::test]
    async fn test_branch_exists_falls_back_to_remote() {
        let git = git(vec![("rev-parse --verify --quiet refs/heads/", CommandOutput::failed("", ""))]);
        assert!(git.branch_exists("gh-pages", "origin").await.unwrap());
        let seen = git.runner().seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "rev-parse --verify --quiet refs/heads/gh-pages",
                "rev-parse --verify --quiet refs/remotes/origin/gh-pages",
            ]
        );
    }

    #[tokio::test]
    async fn test_commands_run_with_c_locale_in_repo() {
        let git = git(vec![]);
        let spec = git.spec(&["status"]);
        assert_eq!(spec.cwd, PathBuf::from("/repo"));
        assert!(spec.env.contains(&("LC_ALL".to_string(), "C".to_string())));
    }
}
