//! System git backend
//!
//! Every operation shells out to the `git` binary with an isolated
//! environment. Output that may contain the token remote URL is redacted
//! before it is returned in an error.

use crate::core::error::{GitError, ReleaseError, ReleaseResult, ResultExt};
use crate::utils::redact;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variables passed through to git (everything else is cleared)
const PASSTHROUGH_ENV: &[&str] = &[
  "PATH",
  "HOME",
  "XDG_CONFIG_HOME",
  "GIT_AUTHOR_NAME",
  "GIT_AUTHOR_EMAIL",
  "GIT_COMMITTER_NAME",
  "GIT_COMMITTER_EMAIL",
];

/// Git backend using system git
pub struct SystemGit {
  /// Working tree root reported by git
  pub(crate) repo_path: PathBuf,

  /// Secret scrubbed from any git output we surface
  pub(crate) secret: Option<String>,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// `path` may be any directory inside the working tree.
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") || !path.exists() {
        return Err(ReleaseError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ReleaseError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);

    Ok(Self {
      repo_path: PathBuf::from(stdout.trim()),
      secret: None,
    })
  }

  /// Redact `secret` from every error produced by this backend
  pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
    self.secret = Some(secret.into());
    self
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables except identity and lookup paths
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    for key in PASSTHROUGH_ENV {
      if let Ok(value) = std::env::var(key) {
        cmd.env(key, value);
      }
    }
    // Never block on a credential prompt
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Scrub the configured secret from git output
  pub(crate) fn scrub(&self, raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    match &self.secret {
      Some(secret) => redact(&text, secret),
      None => text.to_string(),
    }
  }

  pub(crate) fn command_failed(&self, command: &str, stderr: &[u8]) -> ReleaseError {
    let stderr = self.scrub(stderr);
    ReleaseError::Git(GitError::CommandFailed {
      command: command.to_string(),
      stderr: if stderr.trim().is_empty() {
        "stderr is empty".to_string()
      } else {
        stderr
      },
    })
  }
}
