//! GitHub releases REST client

use crate::core::config::GitHubConfig;
use crate::core::error::{HttpError, ReleaseError, ReleaseResult};
use crate::utils::join_url;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_VERSION: &str = "2022-11-28";

/// A release as returned by the API (fields we use)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
  pub tag_name: String,
  pub html_url: String,
  #[serde(default)]
  pub body: Option<String>,
}

/// Result of looking a release up by tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseLookup {
  Found(ReleaseInfo),
  NotFound,
}

/// Notes produced by the generate-notes endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedNotes {
  pub body: String,
}

#[derive(Debug, Serialize)]
struct GenerateNotesRequest<'a> {
  tag_name: &'a str,
  target_commitish: &'a str,
  previous_tag_name: &'a str,
}

/// Payload for creating a release
#[derive(Debug, Clone, Serialize)]
pub struct NewRelease<'a> {
  pub tag_name: &'a str,
  pub name: &'a str,
  pub body: &'a str,
  pub draft: bool,
  pub prerelease: bool,
}

/// Release operations the tool needs from the hosting platform
pub trait ReleaseHost {
  /// Look a release up by tag; only a 404 maps to `NotFound`
  fn lookup_release(&self, tag: &str) -> ReleaseResult<ReleaseLookup>;

  /// Ask the platform to generate notes for the range `previous_tag..target`
  fn generate_notes(&self, tag: &str, target: &str, previous_tag: &str) -> ReleaseResult<GeneratedNotes>;

  /// Create a release
  fn create_release(&self, release: &NewRelease<'_>) -> ReleaseResult<ReleaseInfo>;
}

/// Token-authenticated client for one repository
pub struct GitHubClient {
  http: Client,
  api_url: String,
  org: String,
  repo: String,
  token: String,
}

impl GitHubClient {
  pub fn new(config: &GitHubConfig, token: &str, timeout: Duration) -> ReleaseResult<Self> {
    let http = Client::builder()
      .timeout(timeout)
      .user_agent("microshift-release-notes")
      .build()?;

    Ok(Self {
      http,
      api_url: config.api_url.clone(),
      org: config.org.clone(),
      repo: config.repo.clone(),
      token: token.to_string(),
    })
  }

  fn repo_url(&self, path: &str) -> String {
    join_url(&self.api_url, &["repos", &self.org, &self.repo, path])
  }

  fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
    builder
      .header(ACCEPT, "application/vnd.github+json")
      .header(AUTHORIZATION, format!("Bearer {}", self.token))
      .header("X-GitHub-Api-Version", API_VERSION)
  }

  fn send_json<T: DeserializeOwned>(&self, method: &str, url: &str, builder: RequestBuilder) -> ReleaseResult<T> {
    debug!("{} {}", method, url);
    let response = self.authorized(builder).send()?;
    let status = response.status();

    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      return Err(ReleaseError::Http(HttpError::Status {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body,
      }));
    }

    Ok(response.json()?)
  }
}

impl ReleaseHost for GitHubClient {
  fn lookup_release(&self, tag: &str) -> ReleaseResult<ReleaseLookup> {
    let url = self.repo_url(&format!("releases/tags/{}", tag));
    match self.send_json::<ReleaseInfo>("GET", &url, self.http.get(&url)) {
      Ok(info) => Ok(ReleaseLookup::Found(info)),
      Err(err) if err.is_not_found() => Ok(ReleaseLookup::NotFound),
      Err(err) => Err(err),
    }
  }

  fn generate_notes(&self, tag: &str, target: &str, previous_tag: &str) -> ReleaseResult<GeneratedNotes> {
    let url = self.repo_url("releases/generate-notes");
    let request = GenerateNotesRequest {
      tag_name: tag,
      target_commitish: target,
      previous_tag_name: previous_tag,
    };
    self.send_json("POST", &url, self.http.post(&url).json(&request))
  }

  fn create_release(&self, release: &NewRelease<'_>) -> ReleaseResult<ReleaseInfo> {
    let url = self.repo_url("releases");
    self.send_json("POST", &url, self.http.post(&url).json(release))
  }
}
