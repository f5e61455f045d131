//! Build metadata encoded in candidate RPM filenames
//!
//! An EC RPM filename looks like
//! `microshift-4.13.0~ec.4-202303070857.p0.gcf0bce2.assembly.ec.4.el9.aarch64.rpm`
//! and an RC one like
//! `microshift-4.13.0~rc.0-202303212136.p0.gbd6fb96.assembly.rc.0.el9.aarch64.rpm`.

use crate::core::error::{GrammarError, ReleaseError, ReleaseResult};
use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Format of the build timestamp embedded in filenames (e.g. `202402022103`)
pub const BUILD_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Which kind of candidate a build is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateType {
  /// Engineering candidate
  Ec,
  /// Release candidate
  Rc,
}

impl CandidateType {
  pub fn as_str(self) -> &'static str {
    match self {
      CandidateType::Ec => "ec",
      CandidateType::Rc => "rc",
    }
  }
}

impl fmt::Display for CandidateType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CandidateType {
  type Err = ReleaseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "ec" => Ok(CandidateType::Ec),
      "rc" => Ok(CandidateType::Rc),
      other => Err(ReleaseError::message(format!("Unknown candidate type '{}'", other))),
    }
  }
}

/// Fields extracted from one package filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildIdentifier {
  pub product_version: String,
  pub candidate_type: CandidateType,
  pub candidate_number: u32,
  pub build_timestamp: String,
  pub patch_number: u32,
  pub commit_reference: String,
}

impl BuildIdentifier {
  /// Release and tag name, e.g. `4.14.0-ec.3-202307170726.p0`
  ///
  /// Older releases were named like `4.13.0-ec-2`, but some sprints published
  /// several builds per candidate, so the timestamp and patch are included.
  pub fn release_name(&self) -> String {
    format!(
      "{}-{}.{}-{}.p{}",
      self.product_version, self.candidate_type, self.candidate_number, self.build_timestamp, self.patch_number
    )
  }
}

/// Build time from a filename timestamp, with minute precision
pub fn parse_build_timestamp(timestamp: &str) -> ReleaseResult<NaiveDateTime> {
  Ok(NaiveDateTime::parse_from_str(timestamp, BUILD_TIMESTAMP_FORMAT)?)
}

/// Compiled filename grammar for one product
#[derive(Debug, Clone)]
pub struct FilenameGrammar {
  pattern: Regex,
}

impl FilenameGrammar {
  /// Build the grammar for packages named `{product}-...`
  pub fn new(product: &str) -> ReleaseResult<Self> {
    let pattern = format!(
      r"{}-(?P<product_version>\d+\.\d+\.\d+)~(?P<candidate_type>ec|rc)\.(?P<candidate_number>\d+)-(?P<build_timestamp>\d+)\.p(?P<patch_number>\d+)\.g(?P<commit_reference>[0-9a-f]+)\.",
      regex::escape(product)
    );
    let pattern =
      Regex::new(&pattern).map_err(|e| ReleaseError::message(format!("Invalid filename grammar for '{}': {}", product, e)))?;
    Ok(Self { pattern })
  }

  /// Extract build metadata, failing unless every field is present
  pub fn parse(&self, filename: &str) -> ReleaseResult<BuildIdentifier> {
    let mismatch = || {
      ReleaseError::Grammar(GrammarError {
        filename: filename.to_string(),
      })
    };

    let caps = self.pattern.captures(filename).ok_or_else(mismatch)?;

    Ok(BuildIdentifier {
      product_version: caps["product_version"].to_string(),
      candidate_type: caps["candidate_type"].parse()?,
      candidate_number: caps["candidate_number"].parse().map_err(|_| mismatch())?,
      build_timestamp: caps["build_timestamp"].to_string(),
      patch_number: caps["patch_number"].parse().map_err(|_| mismatch())?,
      commit_reference: caps["commit_reference"].to_string(),
    })
  }
}
