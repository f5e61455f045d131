//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Tag on the first commit of every test repository
pub const PREVIOUS_TAG: &str = "4.13.0-ec.2-202302010000.p0";

/// A throwaway git checkout with one tagged commit
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("README.md"), "# microshift\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;
    // describe only considers annotated tags
    git(&path, &["tag", "-m", PREVIOUS_TAG, PREVIOUS_TAG])?;

    Ok(Self { _root: root, path })
  }

  /// Write a file and commit it, returning the full commit SHA
  pub fn commit_file(&self, file: &str, content: &str, message: &str) -> Result<String> {
    std::fs::write(self.path.join(file), content)?;
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Write the project version file
  pub fn write_version_file(&self, ocp_version: &str) -> Result<()> {
    std::fs::write(
      self.path.join("Makefile.version.aarch64.var"),
      format!("OCP_VERSION := {}\n", ocp_version),
    )?;
    Ok(())
  }

  pub fn has_tag(&self, tag: &str) -> bool {
    git(&self.path, &["rev-parse", "--verify", "--quiet", &format!("refs/tags/{}", tag)]).is_ok()
  }

  pub fn tag_message(&self, tag: &str) -> Result<String> {
    let output = git(&self.path, &["tag", "-l", "--format=%(contents:subject)", tag])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn remotes(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["remote"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Environment pointing both mirrors and the GitHub API at a mock server
pub fn mock_env(server_url: &str) -> Vec<(String, String)> {
  vec![
    (
      "RELEASE_NOTES_MIRROR_ARM".to_string(),
      format!("{}/aarch64/microshift", server_url),
    ),
    (
      "RELEASE_NOTES_MIRROR_X86".to_string(),
      format!("{}/x86_64/microshift", server_url),
    ),
    ("RELEASE_NOTES_API_URL".to_string(), server_url.to_string()),
  ]
}

/// Run candidate-release and return its output whatever the exit status
pub fn run_candidate_release_raw(cwd: &Path, args: &[&str], envs: &[(String, String)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_candidate-release");

  let mut cmd = Command::new(bin);
  cmd
    .current_dir(cwd)
    .args(args)
    .env_remove("GITHUB_TOKEN")
    .env_remove("RUST_LOG");
  for (key, value) in envs {
    cmd.env(key, value);
  }

  cmd.output().context("Failed to run candidate-release")
}

/// Run candidate-release, failing unless it exits successfully
pub fn run_candidate_release(cwd: &Path, args: &[&str], envs: &[(String, String)]) -> Result<Output> {
  let output = run_candidate_release_raw(cwd, args, envs)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "candidate-release failed: candidate-release {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Directory listing page as served by the mirror
pub fn listing_page(versions: &[&str]) -> String {
  let mut html = String::from("<html><body><table>\n");
  for version in versions {
    html.push_str(&format!(
      "<tr class=\"file\"><td></td><td><a href=\"{v}/\">\
       <svg width=\"1.5em\" height=\"1em\"><use xlink:href=\"#folder\"></use></svg>\
       <span class=\"name\">{v}</span></a></td><td>-</td></tr>\n",
      v = version
    ));
  }
  html.push_str("</table></body></html>\n");
  html
}

/// rpm_list content naming the product RPM for a build
pub fn rpm_list(rpm: &str, arch: &str) -> String {
  let dir = rpm.trim_end_matches(".rpm");
  format!(
    "Packages/{dir}__{arch}/microshift-networking{rest}\nPackages/{dir}__{arch}/{rpm}\n",
    dir = dir,
    arch = arch,
    rest = rpm.trim_start_matches("microshift"),
    rpm = rpm
  )
}
