//! Package mirror layout and parsing
//!
//! - **client**: fetching listing pages and manifests
//! - **filename**: build metadata from RPM filenames
//! - **listing**: version labels from directory listing HTML

pub mod client;
pub mod filename;
pub mod listing;

pub use client::{HttpMirror, MirrorSource};
pub use filename::{BuildIdentifier, CandidateType, FilenameGrammar};
pub use listing::extract_versions;

use crate::utils::join_url;
use serde::Serialize;
use std::fmt;

/// Mirror directory a candidate is published under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReleaseChannel {
  /// Engineering candidates (`ocp-dev-preview`)
  #[serde(rename = "ocp-dev-preview")]
  DevPreview,
  /// Release candidates (`ocp`)
  #[serde(rename = "ocp")]
  Stable,
}

impl ReleaseChannel {
  pub fn as_str(self) -> &'static str {
    match self {
      ReleaseChannel::DevPreview => "ocp-dev-preview",
      ReleaseChannel::Stable => "ocp",
    }
  }
}

impl fmt::Display for ReleaseChannel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// URL of a channel's version listing page
pub fn channel_listing_url(base: &str, channel: ReleaseChannel) -> String {
  join_url(base, &[&format!("{}/", channel)])
}

/// URL of the package manifest for one version and OS path segment
pub fn rpm_list_url(base: &str, channel: ReleaseChannel, version: &str, os_tag: &str) -> String {
  join_url(base, &[channel.as_str(), version, os_tag, "os", "rpm_list"])
}

/// URL of a version's directory, as linked from release notes
pub fn version_dir_url(base: &str, channel: ReleaseChannel, version_label: &str) -> String {
  join_url(base, &[channel.as_str(), &format!("{}/", version_label)])
}
