//! Integration tests for argument, configuration and failure handling

use crate::helpers::{TestRepo, listing_page, mock_env, run_candidate_release, run_candidate_release_raw};
use anyhow::Result;
use mockito::{Matcher, Server};

fn with_token(mut envs: Vec<(String, String)>) -> Vec<(String, String)> {
  envs.push(("GITHUB_TOKEN".to_string(), "test-token".to_string()));
  envs
}

#[test]
fn test_missing_token_is_user_error() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_candidate_release_raw(&repo.path, &["--version-to-scan", "4.13"], &[])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("GITHUB_TOKEN does not appear to be set"));
  assert!(stderr.contains("--token"));
  Ok(())
}

#[test]
fn test_token_flag_is_accepted() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_candidate_release(
    &repo.path,
    &["--token", "flag-token", "--no-ec", "--no-rc", "--version-to-scan", "4.13"],
    &[],
  )?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("No new releases found."));
  Ok(())
}

#[test]
fn test_families_default_to_version_file() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_version_file("4.14.0-0.nightly-arm64-2024-03-13-041907")?;

  let mut server = Server::new();
  let page = listing_page(&["4.12.0-ec.5", "4.13.0-rc.2", "4.14.0-ec.1"]);
  for arch in ["aarch64", "x86_64"] {
    server
      .mock("GET", format!("/{}/microshift/ocp-dev-preview/", arch).as_str())
      .with_status(200)
      .with_body(&page)
      .create();
    server
      .mock("GET", format!("/{}/microshift/ocp-dev-preview/4.14.0-ec.1/el9/os/rpm_list", arch).as_str())
      .with_status(200)
      .with_body(format!(
        "Packages/x/microshift-4.14.0~ec.1-202307170726.p0.g1a2b3c4.assembly.ec.1.el9.{}.rpm\n",
        arch
      ))
      .create();
    server
      .mock("GET", format!("/{}/microshift/ocp-dev-preview/4.13.0-rc.2/el9/os/rpm_list", arch).as_str())
      .with_status(200)
      .with_body(format!(
        "Packages/x/microshift-4.13.0~rc.2-202305100000.p0.gdeadbee.assembly.rc.2.el9.{}.rpm\n",
        arch
      ))
      .create();
  }
  // 4.12 is outside the current and previous minor
  let old = server
    .mock("GET", Matcher::Regex("^/.*/4\\.12\\.0-ec\\.5/".to_string()))
    .expect(0)
    .create();
  let lookups = server
    .mock("GET", Matcher::Regex("^/repos/openshift/microshift/releases/tags/".to_string()))
    .with_status(200)
    .with_body(r#"{"tag_name":"x","html_url":"https://github.com/openshift/microshift/releases/tag/x"}"#)
    .expect(4)
    .create();

  let output = run_candidate_release(&repo.path, &["--no-rc"], &with_token(mock_env(&server.url())))?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("No new releases found."));
  old.assert();
  lookups.assert();
  Ok(())
}

#[test]
fn test_missing_version_file_suggests_flag() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_candidate_release_raw(&repo.path, &[], &with_token(Vec::new()))?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("Could not read version from"));
  assert!(stderr.contains("--version-to-scan"));
  Ok(())
}

#[test]
fn test_invalid_version_to_scan() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_candidate_release_raw(&repo.path, &["--version-to-scan", "4"], &with_token(Vec::new()))?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid version to scan '4'"));
  Ok(())
}

#[test]
fn test_explicit_config_must_exist() -> Result<()> {
  let repo = TestRepo::new()?;

  let output = run_candidate_release_raw(
    &repo.path,
    &["--config", "missing.toml", "--version-to-scan", "4.13"],
    &with_token(Vec::new()),
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration file not found"));
  Ok(())
}

#[test]
fn test_listing_failure_is_remote_error() -> Result<()> {
  let repo = TestRepo::new()?;

  let mut server = Server::new();
  server
    .mock("GET", "/aarch64/microshift/ocp/")
    .with_status(503)
    .with_body("maintenance")
    .create();

  let output = run_candidate_release_raw(
    &repo.path,
    &["--no-ec", "--version-to-scan", "4.13"],
    &with_token(mock_env(&server.url())),
  )?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr.contains("returned HTTP 503"));
  Ok(())
}
