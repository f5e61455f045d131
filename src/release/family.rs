//! Version families (`major.minor`) selecting which mirror versions to scan

use crate::core::error::{ConfigError, ReleaseError, ReleaseResult};
use semver::Version;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A `major.minor` version prefix such as `4.13`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionFamily(String);

impl VersionFamily {
  pub fn new(major: u64, minor: u64) -> Self {
    Self(format!("{}.{}", major, minor))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Whether a mirror version label (`4.13.0-ec.3`) belongs to this family
  pub fn contains(&self, version_label: &str) -> bool {
    family_prefix(version_label) == self.0
  }
}

impl FromStr for VersionFamily {
  type Err = ReleaseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let valid = match s.split_once('.') {
      Some((major, minor)) => is_number(major) && is_number(minor),
      None => false,
    };
    if !valid {
      return Err(ReleaseError::with_help(
        format!("Invalid version to scan '{}'", s),
        "Versions to scan are major.minor pairs such as 4.14",
      ));
    }
    Ok(Self(s.to_string()))
  }
}

impl fmt::Display for VersionFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

fn is_number(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// First two dot-separated components of a label (`4.13.0-ec.3` -> `4.13`)
pub fn family_prefix(version_label: &str) -> String {
  version_label.split('.').take(2).collect::<Vec<_>>().join(".")
}

/// Default families from the text of the project version file
///
/// The file holds a make assignment such as
/// `OCP_VERSION := 4.16.0-0.nightly-arm64-2024-03-13-041907`. The result is
/// the current minor version followed by the previous one, since the previous
/// minor may still be producing release candidates while the current one
/// produces engineering candidates.
pub fn families_from_version_text(content: &str) -> Result<Vec<VersionFamily>, String> {
  let value = content
    .lines()
    .rev()
    .find(|line| line.contains('='))
    .and_then(|line| line.rsplit('=').next())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .ok_or_else(|| "no version assignment found".to_string())?;

  let version = Version::parse(value).map_err(|e| format!("'{}' is not a valid version: {}", value, e))?;

  let mut families = vec![VersionFamily::new(version.major, version.minor)];
  if version.minor > 0 {
    families.push(VersionFamily::new(version.major, version.minor - 1));
  }
  Ok(families)
}

/// Default families read from the project version file
pub fn families_from_version_file(path: &Path) -> ReleaseResult<Vec<VersionFamily>> {
  let content = fs::read_to_string(path).map_err(|e| {
    ReleaseError::Config(ConfigError::VersionFile {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })
  })?;

  families_from_version_text(&content).map_err(|reason| {
    ReleaseError::Config(ConfigError::VersionFile {
      path: path.to_path_buf(),
      reason,
    })
  })
}
