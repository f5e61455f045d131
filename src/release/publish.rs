//! Tagging and publishing of discovered candidates

use crate::core::error::ReleaseResult;
use crate::core::vcs::TagStore;
use crate::github::{NewRelease, ReleaseHost, ReleaseInfo};
use crate::release::discovery::CandidateRelease;
use crate::release::notes::NoteComposer;
use std::collections::HashMap;
use tracing::error;

/// Committer date format for release tags
pub const TAG_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Collapse candidates built from the same commit
///
/// The same commit is often published to both channels and both
/// architectures. Later entries replace earlier ones; the order of first
/// appearance is kept.
pub fn dedupe_by_commit(candidates: Vec<CandidateRelease>) -> Vec<CandidateRelease> {
  let mut index: HashMap<String, usize> = HashMap::new();
  let mut unique: Vec<CandidateRelease> = Vec::new();

  for candidate in candidates {
    match index.get(&candidate.commit_reference) {
      Some(&slot) => unique[slot] = candidate,
      None => {
        index.insert(candidate.commit_reference.clone(), unique.len());
        unique.push(candidate);
      }
    }
  }

  unique
}

/// Result of handling one candidate
#[derive(Debug)]
pub enum PublishOutcome {
  /// Dry run: the notes that would have been published
  DryRun { notes: String },
  /// The created release
  Published(ReleaseInfo),
}

/// Drives tag creation and release publishing for candidates
pub struct Publisher<'a> {
  tags: &'a dyn TagStore,
  host: &'a dyn ReleaseHost,
  composer: &'a NoteComposer,
  remote: String,
  take_action: bool,
}

impl<'a> Publisher<'a> {
  pub fn new(
    tags: &'a dyn TagStore,
    host: &'a dyn ReleaseHost,
    composer: &'a NoteComposer,
    remote: impl Into<String>,
    take_action: bool,
  ) -> Self {
    Self {
      tags,
      host,
      composer,
      remote: remote.into(),
      take_action,
    }
  }

  /// Tag, describe and publish one candidate
  ///
  /// The tag is created locally even in dry-run mode because describing the
  /// previous tag needs it. Nothing leaves the machine unless taking action.
  /// A failed push or release creation leaves the local tag in place.
  pub fn publish(&self, candidate: &CandidateRelease) -> ReleaseResult<PublishOutcome> {
    let tag = &candidate.release_name;
    let commit = &candidate.commit_reference;

    if !self.tags.tag_exists(tag)? {
      let date = candidate.build_time()?.format(TAG_DATE_FORMAT).to_string();
      self.tags.create_annotated_tag(tag, commit, tag, &date)?;
    }

    let previous_tag = self.tags.previous_tag(tag)?;
    let generated = self.host.generate_notes(tag, commit, &previous_tag)?;
    let notes = self.composer.compose(candidate, &previous_tag, &generated.body);

    if !self.take_action {
      return Ok(PublishOutcome::DryRun { notes });
    }

    if let Err(err) = self.tags.push_tag(&self.remote, tag) {
      error!("Failed to push tag {}: {}", tag, err);
      return Err(err);
    }

    let release = NewRelease {
      tag_name: tag,
      name: tag,
      body: &notes,
      draft: false,
      prerelease: true,
    };
    match self.host.create_release(&release) {
      Ok(created) => Ok(PublishOutcome::Published(created)),
      Err(err) => {
        error!("Failed to create the release {}: {}", tag, err);
        Err(err)
      }
    }
  }
}
