//! External command boundary.
//!
//! Every subprocess goes through [`CommandRunner`], so the orchestrator can be
//! driven by a scripted runner in tests and a retry policy can be layered on
//! later without touching orchestration code.

use std::fmt;
use std::path::PathBuf;

/// A command to run: program, arguments, working directory and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name.
    pub program: String,

    /// Arguments, passed without shell interpretation.
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: PathBuf,

    /// Extra environment variables.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// New command in `cwd`.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Arguments as string slices.
    #[must_use]
    pub fn arg_strs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// What a finished command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status was zero.
    pub success: bool,

    /// Exit code, if the process exited normally.
    pub code: Option<i32>,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { success: true, code: Some(0), stdout: stdout.into(), stderr: String::new() }
    }

    /// Failed output with exit code 1.
    #[must_use]
    pub fn failed(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self { success: false, code: Some(1), stdout: stdout.into(), stderr: stderr.into() }
    }

    /// Human-readable exit status.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {code}"),
            None => "terminated by signal".to_string(),
        }
    }

    /// True if stdout or stderr contains `needle`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }
}

/// Runs external commands.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture output.
    ///
    /// A non-zero exit is reported in [`CommandOutput::success`], not as an
    /// `Err`; `Err` means the process could not be started at all.
    async fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput>;
}

/// Runs commands as real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait::async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput> {
        let output = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(std::process::Stdio::null())
            .output()
            .await?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_arguments_with_spaces() {
        let cmd = CommandSpec::new("git", ["commit", "-m", "feat: sync digest"], ".");
        assert_eq!(cmd.to_string(), "git commit -m \"feat: sync digest\"");
    }

    #[test]
    fn test_output_mentions_either_stream() {
        let out = CommandOutput::failed("nothing to commit, working tree clean", "");
        assert!(out.mentions("nothing to commit"));
        assert_eq!(out.status_text(), "exit status: 1");
    }

    #[tokio::test]
    async fn test_system_runner_missing_program_is_err() {
        let runner = SystemRunner;
        let missing = runner
            .run(&CommandSpec::new("definitely-not-a-real-binary-xyz", Vec::<String>::new(), "."))
            .await;
        assert!(missing.is_err());
    }
}
