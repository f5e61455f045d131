//! Discovery of candidate builds that have no release yet
//!
//! For each mirror channel: list the published versions, keep those in the
//! requested families, read each version's rpm_list, find the product RPM,
//! parse its build metadata and ask GitHub whether a release with the derived
//! name already exists.

use crate::core::config::MirrorConfig;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::github::{ReleaseHost, ReleaseLookup};
use crate::mirror::filename::parse_build_timestamp;
use crate::mirror::{
  BuildIdentifier, CandidateType, FilenameGrammar, MirrorSource, ReleaseChannel, channel_listing_url, extract_versions,
  rpm_list_url,
};
use crate::release::family::VersionFamily;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

/// A build on the mirror with no matching release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRelease {
  pub release_name: String,
  pub commit_reference: String,
  pub product_version: String,
  pub candidate_type: CandidateType,
  pub candidate_number: u32,
  pub release_channel: ReleaseChannel,
  pub build_timestamp: String,
}

impl CandidateRelease {
  pub fn new(build: BuildIdentifier, channel: ReleaseChannel) -> Self {
    Self {
      release_name: build.release_name(),
      commit_reference: build.commit_reference,
      product_version: build.product_version,
      candidate_type: build.candidate_type,
      candidate_number: build.candidate_number,
      release_channel: channel,
      build_timestamp: build.build_timestamp,
    }
  }

  /// Mirror directory name of the build, e.g. `4.13.0-ec.3`
  pub fn version_label(&self) -> String {
    format!("{}-{}.{}", self.product_version, self.candidate_type, self.candidate_number)
  }

  /// Build time with minute precision
  pub fn build_time(&self) -> ReleaseResult<NaiveDateTime> {
    parse_build_timestamp(&self.build_timestamp)
  }
}

/// What happened to one version during a scan
#[derive(Debug)]
pub enum VersionOutcome {
  /// No release exists yet
  New(CandidateRelease),
  /// Released already, or no product RPM in the manifest
  Skipped,
  /// The version could not be processed
  Failed(ReleaseError),
}

/// Outcome for one version label of a channel
#[derive(Debug)]
pub struct VersionReport {
  pub version: String,
  pub outcome: VersionOutcome,
}

/// Discovery engine over a mirror and a release host
pub struct Discovery<'a> {
  mirror: &'a dyn MirrorSource,
  host: &'a dyn ReleaseHost,
  grammar: FilenameGrammar,
  product: String,
  os_tags: Vec<String>,
}

impl<'a> Discovery<'a> {
  pub fn new(mirror: &'a dyn MirrorSource, host: &'a dyn ReleaseHost, config: &MirrorConfig) -> ReleaseResult<Self> {
    Ok(Self {
      mirror,
      host,
      grammar: FilenameGrammar::new(&config.product)?,
      product: config.product.clone(),
      os_tags: config.os_tags.clone(),
    })
  }

  /// Scan a channel and report on every version in the requested families
  ///
  /// Only the listing fetch can fail the scan; per-version problems are
  /// recorded as [`VersionOutcome::Failed`] and the scan moves on.
  pub fn scan(
    &self,
    families: &[VersionFamily],
    mirror_base: &str,
    channel: ReleaseChannel,
  ) -> ReleaseResult<Vec<VersionReport>> {
    let listing_url = channel_listing_url(mirror_base, channel);
    info!("Fetching {} ...", listing_url);
    let page = self.mirror.fetch_text(&listing_url)?;

    let mut reports = Vec::new();
    for version in extract_versions(&page) {
      // Skip very old candidates outside the requested families
      if !families.iter().any(|family| family.contains(&version)) {
        continue;
      }

      let outcome = match self.check_for_new_releases(mirror_base, channel, &version) {
        Ok(Some(candidate)) => VersionOutcome::New(candidate),
        Ok(None) => VersionOutcome::Skipped,
        Err(err) => VersionOutcome::Failed(err),
      };
      reports.push(VersionReport { version, outcome });
    }

    Ok(reports)
  }

  /// Candidates for every version of a channel that has no release yet
  ///
  /// Versions that failed are logged with their channel and skipped.
  pub fn find_new_releases(
    &self,
    families: &[VersionFamily],
    mirror_base: &str,
    channel: ReleaseChannel,
  ) -> ReleaseResult<Vec<CandidateRelease>> {
    let mut found = Vec::new();
    for report in self.scan(families, mirror_base, channel)? {
      match report.outcome {
        VersionOutcome::New(candidate) => found.push(candidate),
        VersionOutcome::Skipped => {}
        VersionOutcome::Failed(err) => warn!("could not process {} {}: {}", channel, report.version, err),
      }
    }
    Ok(found)
  }

  /// Candidate for one version, or `None` when released already or no RPM is listed
  pub fn check_for_new_releases(
    &self,
    mirror_base: &str,
    channel: ReleaseChannel,
    version: &str,
  ) -> ReleaseResult<Option<CandidateRelease>> {
    let rpm_list = self.fetch_manifest(mirror_base, channel, version)?;

    // Look for the product RPM itself, e.g.
    // Packages/microshift-4.13.0~ec.3-....el8__aarch64/microshift-4.13.0~ec.3-....el8.aarch64.rpm
    let version_prefix = version.split('-').next().unwrap_or(version);
    let rpm_name_prefix = format!("{}-{}", self.product, version_prefix);

    let Some(rpm_filename) = find_package_filename(&rpm_list, &rpm_name_prefix) else {
      warn!("Did not find {} in {}", rpm_name_prefix, rpm_list.join(",\n"));
      return Ok(None);
    };

    info!("Examining RPM {}", rpm_filename);
    let build = self.grammar.parse(rpm_filename)?;
    let candidate = CandidateRelease::new(build, channel);

    info!("Checking for release {}...", candidate.release_name);
    if let ReleaseLookup::Found(existing) = self.host.lookup_release(&candidate.release_name)? {
      info!("Found an existing release {}, no work to do", existing.html_url);
      return Ok(None);
    }
    info!("Not found");

    Ok(Some(candidate))
  }

  /// Fetch the version's rpm_list, probing each OS path segment in order
  ///
  /// The OS segment changed name between releases. Each failed probe is
  /// logged; when all fail, the last error is returned.
  fn fetch_manifest(&self, mirror_base: &str, channel: ReleaseChannel, version: &str) -> ReleaseResult<Vec<String>> {
    let mut last_err = None;

    for os_tag in &self.os_tags {
      let url = rpm_list_url(mirror_base, channel, version, os_tag);
      info!("Fetching {} ...", url);
      match self.mirror.fetch_text(&url) {
        Ok(text) => return Ok(text.lines().map(str::to_string).collect()),
        Err(err) => {
          warn!("{}", err);
          last_err = Some(err);
        }
      }
    }

    Err(last_err.unwrap_or_else(|| ReleaseError::message("No OS path segments configured for rpm_list lookup")))
  }
}

/// First manifest entry whose file name starts with `prefix`
pub fn find_package_filename<'l>(lines: &'l [String], prefix: &str) -> Option<&'l str> {
  lines
    .iter()
    .map(|line| line.trim().rsplit('/').next().unwrap_or(""))
    .find(|name| name.starts_with(prefix))
}
