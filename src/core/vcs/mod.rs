pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::ReleaseResult;

/// Tag operations the publishing driver needs from version control
///
/// Implemented by [`SystemGit`]; tests substitute an in-memory store.
pub trait TagStore {
  /// Check whether a tag with this exact name exists locally
  fn tag_exists(&self, name: &str) -> ReleaseResult<bool>;

  /// Create an annotated tag on `target` with the given committer date (`%Y-%m-%d %H:%M`)
  fn create_annotated_tag(&self, name: &str, target: &str, message: &str, committer_date: &str) -> ReleaseResult<()>;

  /// Push a single tag to a remote
  fn push_tag(&self, remote: &str, name: &str) -> ReleaseResult<()>;

  /// Name of the nearest annotated tag reachable from the parent of `name`
  fn previous_tag(&self, name: &str) -> ReleaseResult<String>;
}
