//! Tag and remote operations for SystemGit

use super::TagStore;
use super::system_git::SystemGit;
use crate::core::error::{GitError, ReleaseError, ReleaseResult, ResultExt};

impl SystemGit {
  /// Check whether `refs/tags/{name}` exists
  pub fn has_tag(&self, name: &str) -> ReleaseResult<bool> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--verify", "--quiet"])
      .arg(format!("refs/tags/{}", name))
      .output()
      .context("Failed to run git rev-parse")?;

    Ok(output.status.success())
  }

  /// Create an annotated tag with a pinned committer date
  ///
  /// `GIT_COMMITTER_DATE` dates the tag object itself, so tags line up with
  /// the build time rather than the time this tool ran.
  pub fn create_tag(&self, name: &str, target: &str, message: &str, committer_date: &str) -> ReleaseResult<()> {
    println!("GIT_COMMITTER_DATE={} git tag {} {}", committer_date, name, target);

    let output = self
      .git_cmd()
      .env("GIT_COMMITTER_DATE", committer_date)
      .args(["tag", "-m", message, name, target])
      .output()
      .context("Failed to create tag")?;

    if !output.status.success() {
      return Err(self.command_failed(&format!("git tag -m {} {} {}", message, name, target), &output.stderr));
    }

    Ok(())
  }

  /// Push a tag to a remote, reporting combined output on failure
  pub fn push_tag_to_remote(&self, remote_name: &str, tag: &str) -> ReleaseResult<()> {
    println!("git push {} {}", remote_name, tag);

    let output = self
      .git_cmd()
      .args(["push", remote_name])
      .arg(format!("refs/tags/{}", tag))
      .output()
      .context("Failed to push tag")?;

    if !output.status.success() {
      let mut combined = self.scrub(&output.stdout);
      combined.push_str(&self.scrub(&output.stderr));
      return Err(ReleaseError::Git(GitError::PushFailed {
        remote: remote_name.to_string(),
        refname: tag.to_string(),
        reason: combined,
      }));
    }

    Ok(())
  }

  /// Nearest annotated tag reachable from the parent of `tag`
  pub fn describe_previous_tag(&self, tag: &str) -> ReleaseResult<String> {
    let output = self
      .git_cmd()
      .args(["describe", &format!("{}~1", tag), "--abbrev=0"])
      .output()
      .context("Failed to run git describe")?;

    if !output.status.success() {
      return Err(self.command_failed(&format!("git describe {}~1 --abbrev=0", tag), &output.stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// List all remotes as (name, fetch URL)
  pub fn list_remotes(&self) -> ReleaseResult<Vec<(String, String)>> {
    let output = self
      .git_cmd()
      .args(["remote", "-v"])
      .output()
      .context("Failed to list remotes")?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut remotes = Vec::new();

    for line in stdout.lines() {
      // Format: "origin  git@github.com:user/repo.git (fetch)"
      let parts: Vec<&str> = line.split_whitespace().collect();
      if parts.len() >= 2 && line.contains("(fetch)") {
        remotes.push((parts[0].to_string(), parts[1].to_string()));
      }
    }

    Ok(remotes)
  }

  /// Remove `name` if present, then add it pointing at `url`
  ///
  /// The URL usually embeds a token, so it is never echoed.
  pub fn replace_remote(&self, name: &str, url: &str) -> ReleaseResult<()> {
    if self.list_remotes()?.iter().any(|(n, _)| n == name) {
      println!("git remote remove {}", name);
      let output = self
        .git_cmd()
        .args(["remote", "remove", name])
        .output()
        .context("Failed to remove remote")?;
      if !output.status.success() {
        return Err(self.command_failed("git remote remove", &output.stderr));
      }
    }

    println!("git remote add {} ~~REDACTED~~", name);
    let output = self
      .git_cmd()
      .args(["remote", "add", name, url])
      .output()
      .context("Failed to add remote")?;

    if !output.status.success() {
      return Err(self.command_failed("git remote add", &output.stderr));
    }

    Ok(())
  }
}

impl TagStore for SystemGit {
  fn tag_exists(&self, name: &str) -> ReleaseResult<bool> {
    self.has_tag(name)
  }

  fn create_annotated_tag(&self, name: &str, target: &str, message: &str, committer_date: &str) -> ReleaseResult<()> {
    self.create_tag(name, target, message, committer_date)
  }

  fn push_tag(&self, remote: &str, name: &str) -> ReleaseResult<()> {
    self.push_tag_to_remote(remote, name)
  }

  fn previous_tag(&self, name: &str) -> ReleaseResult<String> {
    self.describe_previous_tag(name)
  }
}
