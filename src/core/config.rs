use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for candidate-release
/// Searched in order: release-notes.toml, .release-notes.toml, .config/release-notes.toml
///
/// Every field has a default, so running without a file targets the
/// openshift/microshift repository and the public OpenShift mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
  #[serde(default)]
  pub github: GitHubConfig,
  #[serde(default)]
  pub mirror: MirrorConfig,
  /// Project file holding the version under development, relative to the repo root
  #[serde(default = "default_version_file")]
  pub version_file: PathBuf,
}

/// Where releases and tags are published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
  #[serde(default = "default_org")]
  pub org: String,

  #[serde(default = "default_repo")]
  pub repo: String,

  /// REST API root (overridable for GitHub Enterprise or tests)
  #[serde(default = "default_api_url")]
  pub api_url: String,

  /// Name of the git remote carrying the token, recreated on every publishing run
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Host used to build the token remote URL
  #[serde(default = "default_git_host")]
  pub git_host: String,
}

/// Where candidate builds are discovered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
  /// Package name prefix of the RPM that identifies a build (e.g. "microshift")
  #[serde(default = "default_product")]
  pub product: String,

  /// Human-readable product name used in the release notes repo snippet
  #[serde(default = "default_display_name")]
  pub display_name: String,

  #[serde(default = "default_aarch64_base")]
  pub aarch64_base: String,

  #[serde(default = "default_x86_64_base")]
  pub x86_64_base: String,

  /// OS path segments probed, in order, for a version's rpm_list
  #[serde(default = "default_os_tags")]
  pub os_tags: Vec<String>,

  /// Timeout applied to every HTTP request, in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_version_file() -> PathBuf {
  PathBuf::from("Makefile.version.aarch64.var")
}

fn default_org() -> String {
  "openshift".to_string()
}

fn default_repo() -> String {
  "microshift".to_string()
}

fn default_api_url() -> String {
  "https://api.github.com".to_string()
}

fn default_remote() -> String {
  "token-remote".to_string()
}

fn default_git_host() -> String {
  "github.com".to_string()
}

fn default_product() -> String {
  "microshift".to_string()
}

fn default_display_name() -> String {
  "MicroShift".to_string()
}

fn default_aarch64_base() -> String {
  "https://mirror.openshift.com/pub/openshift-v4/aarch64/microshift".to_string()
}

fn default_x86_64_base() -> String {
  "https://mirror.openshift.com/pub/openshift-v4/x86_64/microshift".to_string()
}

fn default_os_tags() -> Vec<String> {
  vec!["el9".to_string(), "elrhel-9".to_string()]
}

fn default_timeout_secs() -> u64 {
  60
}

impl Default for GitHubConfig {
  fn default() -> Self {
    Self {
      org: default_org(),
      repo: default_repo(),
      api_url: default_api_url(),
      remote: default_remote(),
      git_host: default_git_host(),
    }
  }
}

impl Default for MirrorConfig {
  fn default() -> Self {
    Self {
      product: default_product(),
      display_name: default_display_name(),
      aarch64_base: default_aarch64_base(),
      x86_64_base: default_x86_64_base(),
      os_tags: default_os_tags(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      github: GitHubConfig::default(),
      mirror: MirrorConfig::default(),
      version_file: default_version_file(),
    }
  }
}

/// Environment variables that override file settings
pub const ENV_MIRROR_AARCH64: &str = "RELEASE_NOTES_MIRROR_ARM";
pub const ENV_MIRROR_X86_64: &str = "RELEASE_NOTES_MIRROR_X86";
pub const ENV_API_URL: &str = "RELEASE_NOTES_API_URL";

impl ToolConfig {
  /// Find config file in search order: release-notes.toml, .release-notes.toml, .config/release-notes.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release-notes.toml"),
      path.join(".release-notes.toml"),
      path.join(".config").join("release-notes.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load configuration
  ///
  /// An explicit path must exist. Without one, the search locations under
  /// `dir` are tried and the built-in defaults are used when none exist.
  pub fn load(dir: &Path, explicit: Option<&Path>) -> ReleaseResult<Self> {
    let config_path = match explicit {
      Some(path) if !path.exists() => {
        return Err(ReleaseError::Config(ConfigError::NotFound {
          path: path.to_path_buf(),
        }));
      }
      Some(path) => Some(path.to_path_buf()),
      None => Self::find_config_path(dir),
    };

    let Some(config_path) = config_path else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    Self::from_toml(&content).with_context(|| format!("Failed to parse config from {}", config_path.display()))
  }

  /// Parse configuration from TOML text
  pub fn from_toml(content: &str) -> ReleaseResult<Self> {
    let config: ToolConfig = toml_edit::de::from_str(content)?;
    Ok(config)
  }

  /// Apply environment overrides using the given lookup
  ///
  /// Takes a lookup function rather than reading the process environment so
  /// callers (and tests) decide where values come from.
  pub fn apply_env<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(base) = lookup(ENV_MIRROR_AARCH64).filter(|v| !v.is_empty()) {
      self.mirror.aarch64_base = base;
    }
    if let Some(base) = lookup(ENV_MIRROR_X86_64).filter(|v| !v.is_empty()) {
      self.mirror.x86_64_base = base;
    }
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
      self.github.api_url = url;
    }
  }

  /// Validate configuration values
  pub fn validate(&self) -> ReleaseResult<()> {
    for (field, value) in [
      ("github.org", &self.github.org),
      ("github.repo", &self.github.repo),
      ("github.remote", &self.github.remote),
      ("mirror.product", &self.mirror.product),
    ] {
      if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
      }
    }

    for (field, value) in [
      ("github.api_url", &self.github.api_url),
      ("mirror.aarch64_base", &self.mirror.aarch64_base),
      ("mirror.x86_64_base", &self.mirror.x86_64_base),
    ] {
      if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(invalid(field, &format!("'{}' is not an http(s) URL", value)));
      }
    }

    if self.mirror.os_tags.is_empty() {
      return Err(invalid("mirror.os_tags", "at least one OS path segment is required"));
    }

    if self.mirror.timeout_secs == 0 {
      return Err(invalid("mirror.timeout_secs", "must be greater than zero"));
    }

    Ok(())
  }

  /// URL of the git remote that authenticates with `token`
  pub fn token_remote_url(&self, token: &str) -> String {
    format!(
      "https://x-access-token:{}@{}/{}/{}",
      token, self.github.git_host, self.github.org, self.github.repo
    )
  }
}

fn invalid(field: &str, reason: &str) -> ReleaseError {
  ReleaseError::Config(ConfigError::InvalidValue {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
