//! Run context - build once, pass everywhere
//!
//! Holds everything a publishing run needs (configuration, repository root,
//! credentials, dry-run switch) so that no operation reaches for process-wide
//! state. Built in `main`, passed by reference to the command.

use crate::core::config::ToolConfig;
use crate::core::error::{ConfigError, ReleaseError, ReleaseResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shared state for one run of the tool
#[derive(Debug, Clone)]
pub struct RunContext {
  /// Root of the git checkout that receives tags
  pub repo_root: PathBuf,

  /// Effective configuration (defaults < file < environment)
  pub config: ToolConfig,

  /// Bearer token for GitHub API calls and the token remote
  pub token: String,

  /// False in dry-run mode: nothing is pushed and no release is created
  pub take_action: bool,
}

impl RunContext {
  /// Build the run context, validating configuration and credentials.
  pub fn build(repo_root: &Path, config: ToolConfig, token: Option<String>, dry_run: bool) -> ReleaseResult<Self> {
    config.validate()?;

    let token = token
      .map(|t| t.trim().to_string())
      .filter(|t| !t.is_empty())
      .ok_or(ReleaseError::Config(ConfigError::MissingToken))?;

    Ok(Self {
      repo_root: repo_root.to_path_buf(),
      config,
      token,
      take_action: !dry_run,
    })
  }

  /// Timeout applied to every HTTP request
  pub fn http_timeout(&self) -> Duration {
    Duration::from_secs(self.config.mirror.timeout_secs)
  }

  /// Absolute path of the project version file
  pub fn version_file(&self) -> PathBuf {
    self.repo_root.join(&self.config.version_file)
  }
}
