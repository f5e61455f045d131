//! Integration tests for discovering and publishing candidates

use crate::helpers::{
  PREVIOUS_TAG, TestRepo, listing_page, mock_env, rpm_list, run_candidate_release, run_candidate_release_raw,
};
use anyhow::Result;
use mockito::{Matcher, Server};

const TOKEN: &str = "ghp_integrationsecret";

fn ec3_rpm(short_sha: &str, arch: &str) -> String {
  format!(
    "microshift-4.13.0~ec.3-202302130757.p0.g{}.assembly.ec.3.el9.{}.rpm",
    short_sha, arch
  )
}

/// Serve ocp-dev-preview/4.13.0-ec.3 from both mirrors
///
/// The aarch64 manifest only exists under the `elrhel-9` OS segment.
fn serve_ec3(server: &mut Server, short_sha: &str) -> Vec<mockito::Mock> {
  let page = listing_page(&["4.12.0-ec.1", "4.13.0-ec.3", "latest-4.13"]);
  vec![
    server
      .mock("GET", "/aarch64/microshift/ocp-dev-preview/")
      .with_status(200)
      .with_body(&page)
      .create(),
    server
      .mock("GET", "/aarch64/microshift/ocp-dev-preview/4.13.0-ec.3/el9/os/rpm_list")
      .with_status(404)
      .create(),
    server
      .mock("GET", "/aarch64/microshift/ocp-dev-preview/4.13.0-ec.3/elrhel-9/os/rpm_list")
      .with_status(200)
      .with_body(rpm_list(&ec3_rpm(short_sha, "aarch64"), "aarch64"))
      .create(),
    server
      .mock("GET", "/x86_64/microshift/ocp-dev-preview/")
      .with_status(200)
      .with_body(&page)
      .create(),
    server
      .mock("GET", "/x86_64/microshift/ocp-dev-preview/4.13.0-ec.3/el9/os/rpm_list")
      .with_status(200)
      .with_body(rpm_list(&ec3_rpm(short_sha, "x86_64"), "x86_64"))
      .create(),
  ]
}

fn env_with_token(server: &Server) -> Vec<(String, String)> {
  let mut envs = mock_env(&server.url());
  envs.push(("GITHUB_TOKEN".to_string(), TOKEN.to_string()));
  envs
}

#[test]
fn test_dry_run_reports_notes_without_publishing() -> Result<()> {
  let repo = TestRepo::new()?;
  let sha = repo.commit_file("feature.txt", "new feature\n", "Add feature")?;
  let short = &sha[..7];

  let mut server = Server::new();
  let _mirror = serve_ec3(&mut server, short);
  let lookup = server
    .mock("GET", "/repos/openshift/microshift/releases/tags/4.13.0-ec.3-202302130757.p0")
    .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
    .with_status(404)
    .with_body(r#"{"message":"Not Found"}"#)
    .expect(2)
    .create();
  let notes = server
    .mock("POST", "/repos/openshift/microshift/releases/generate-notes")
    .match_body(Matcher::PartialJson(serde_json::json!({
      "tag_name": "4.13.0-ec.3-202302130757.p0",
      "target_commitish": short,
      "previous_tag_name": PREVIOUS_TAG,
    })))
    .with_status(200)
    .with_body(r###"{"name":"4.13.0-ec.3","body":"## What's Changed\n* Add feature by @dev"}"###)
    .expect(1)
    .create();
  let create = server
    .mock("POST", "/repos/openshift/microshift/releases")
    .expect(0)
    .create();

  let output = run_candidate_release(
    &repo.path,
    &["--no-rc", "--dry-run", "--version-to-scan", "4.13"],
    &env_with_token(&server),
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains(&format!(
    "Dry run for new release 4.13.0-ec.3-202302130757.p0 on commit {} from 202302130757",
    short
  )));
  assert!(stdout.contains("This is a candidate release for 4.13.0."));
  assert!(stdout.contains("* Add feature by @dev"));
  assert!(stdout.contains("GIT_COMMITTER_DATE=2023-02-13 07:57 git tag 4.13.0-ec.3-202302130757.p0"));
  // One build published for two architectures is one release
  assert_eq!(stdout.matches("Dry run for new release").count(), 1);

  // The tag is created locally; nothing else is touched
  assert!(repo.has_tag("4.13.0-ec.3-202302130757.p0"));
  assert_eq!(repo.tag_message("4.13.0-ec.3-202302130757.p0")?, "4.13.0-ec.3-202302130757.p0");
  assert!(repo.remotes()?.is_empty());

  lookup.assert();
  notes.assert();
  create.assert();
  Ok(())
}

#[test]
fn test_existing_release_means_nothing_to_do() -> Result<()> {
  let repo = TestRepo::new()?;
  let sha = repo.commit_file("feature.txt", "new feature\n", "Add feature")?;

  let mut server = Server::new();
  let _mirror = serve_ec3(&mut server, &sha[..7]);
  server
    .mock("GET", "/repos/openshift/microshift/releases/tags/4.13.0-ec.3-202302130757.p0")
    .with_status(200)
    .with_body(
      r#"{"tag_name":"4.13.0-ec.3-202302130757.p0","html_url":"https://github.com/openshift/microshift/releases/tag/4.13.0-ec.3-202302130757.p0","prerelease":true}"#,
    )
    .create();
  let notes = server
    .mock("POST", "/repos/openshift/microshift/releases/generate-notes")
    .expect(0)
    .create();

  let output = run_candidate_release(
    &repo.path,
    &["--no-rc", "--version-to-scan", "4.13"],
    &env_with_token(&server),
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("No new releases found."));
  assert!(!repo.has_tag("4.13.0-ec.3-202302130757.p0"));
  notes.assert();
  Ok(())
}

#[test]
fn test_json_lists_candidates_per_mirror() -> Result<()> {
  let repo = TestRepo::new()?;
  let sha = repo.commit_file("feature.txt", "new feature\n", "Add feature")?;
  let short = &sha[..7];

  let mut server = Server::new();
  let _mirror = serve_ec3(&mut server, short);
  server
    .mock("GET", "/repos/openshift/microshift/releases/tags/4.13.0-ec.3-202302130757.p0")
    .with_status(404)
    .create();

  let output = run_candidate_release(
    &repo.path,
    &["--no-rc", "--json", "--version-to-scan", "4.13"],
    &env_with_token(&server),
  )?;

  let candidates: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  let candidates = candidates.as_array().expect("JSON array");
  assert_eq!(candidates.len(), 2);
  for candidate in candidates {
    assert_eq!(candidate["release_name"], "4.13.0-ec.3-202302130757.p0");
    assert_eq!(candidate["commit_reference"], short);
    assert_eq!(candidate["candidate_type"], "ec");
    assert_eq!(candidate["candidate_number"], 3);
    assert_eq!(candidate["release_channel"], "ocp-dev-preview");
  }
  assert!(!repo.has_tag("4.13.0-ec.3-202302130757.p0"));
  Ok(())
}

#[test]
fn test_push_failure_keeps_tag_and_hides_token() -> Result<()> {
  let repo = TestRepo::new()?;
  let sha = repo.commit_file("feature.txt", "new feature\n", "Add feature")?;
  // Nothing listens on port 1, so the push fails fast
  std::fs::write(repo.path.join("release-notes.toml"), "[github]\ngit_host = \"127.0.0.1:1\"\n")?;

  let mut server = Server::new();
  let _mirror = serve_ec3(&mut server, &sha[..7]);
  server
    .mock("GET", "/repos/openshift/microshift/releases/tags/4.13.0-ec.3-202302130757.p0")
    .with_status(404)
    .create();
  server
    .mock("POST", "/repos/openshift/microshift/releases/generate-notes")
    .with_status(200)
    .with_body(r###"{"name":"4.13.0-ec.3","body":"## What's Changed"}"###)
    .create();
  let create = server
    .mock("POST", "/repos/openshift/microshift/releases")
    .expect(0)
    .create();

  let output = run_candidate_release_raw(
    &repo.path,
    &["--no-rc", "--version-to-scan", "4.13"],
    &env_with_token(&server),
  )?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr.contains("Push of 4.13.0-ec.3-202302130757.p0 to token-remote failed"));
  assert!(!stdout.contains(TOKEN));
  assert!(!stderr.contains(TOKEN));
  assert!(repo.has_tag("4.13.0-ec.3-202302130757.p0"));
  assert_eq!(repo.remotes()?, vec!["token-remote".to_string()]);
  create.assert();
  Ok(())
}
