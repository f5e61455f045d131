//! Release note composition
//!
//! Notes are a fixed preamble with download locations followed by the notes
//! GitHub generates for the commit range. The API rejects bodies above
//! [`MAX_RELEASE_NOTE_BODY_SIZE`], so oversized notes are cut at a line
//! boundary while the final line (the "Full Changelog" compare link) is kept.

use crate::core::config::MirrorConfig;
use crate::mirror::{ReleaseChannel, version_dir_url};
use crate::release::discovery::CandidateRelease;
use crate::utils::{char_len, char_prefix, join_url};
use tracing::debug;

/// Largest body the releases API accepts, in characters
pub const MAX_RELEASE_NOTE_BODY_SIZE: usize = 125_000;

/// Inserted where notes were cut
pub const TRUNCATED_MESSAGE: &str = "\n\n(release notes were truncated)\n\n";

/// Builds release bodies for candidates of one product
#[derive(Debug, Clone)]
pub struct NoteComposer {
  product: String,
  display_name: String,
  aarch64_base: String,
  x86_64_base: String,
  os_tag: String,
}

impl NoteComposer {
  pub fn new(config: &MirrorConfig) -> Self {
    Self {
      product: config.product.clone(),
      display_name: config.display_name.clone(),
      aarch64_base: config.aarch64_base.clone(),
      x86_64_base: config.x86_64_base.clone(),
      os_tag: config.os_tags.first().cloned().unwrap_or_else(|| "el9".to_string()),
    }
  }

  /// Full release body for `candidate`
  pub fn compose(&self, candidate: &CandidateRelease, previous_tag: &str, generated_body: &str) -> String {
    debug!(
      "composing notes for {} (changes since {})",
      candidate.release_name, previous_tag
    );
    let notes = format!("{}\n{}", self.preamble(candidate), generated_body);
    truncate_notes(&notes, MAX_RELEASE_NOTE_BODY_SIZE)
  }

  /// Download links and a `.repo` snippet per architecture
  pub fn preamble(&self, candidate: &CandidateRelease) -> String {
    let label = candidate.version_label();
    let channel = candidate.release_channel;

    format!(
      "\nThis is a candidate release for {version}.\n\
       \n\
       See the mirror for build artifacts:\n\
       - {x86_dir}\n\
       - {arm_dir}\n\
       \n\
       Or add this RPM repository to your x86 systems:\n\
       \n\
       {x86_repo}\
       \n\
       or for aarch64 systems:\n\
       \n\
       {arm_repo}\
       \n",
      version = candidate.product_version,
      x86_dir = version_dir_url(&self.x86_64_base, channel, &label),
      arm_dir = version_dir_url(&self.aarch64_base, channel, &label),
      x86_repo = self.repo_snippet(candidate, &self.x86_64_base, channel),
      arm_repo = self.repo_snippet(candidate, &self.aarch64_base, channel),
    )
  }

  fn repo_snippet(&self, candidate: &CandidateRelease, base: &str, channel: ReleaseChannel) -> String {
    let label = candidate.version_label();
    let baseurl = join_url(base, &[channel.as_str(), &label, &self.os_tag, "os/"]);

    format!(
      "```\n\
       [{product}-{version}-{kind}-{number}]\n\
       name={display} {version} EarlyAccess {kind}.{number} RPMs\n\
       baseurl={baseurl}\n\
       enabled=1\n\
       gpgcheck=0\n\
       skip_if_unavailable=0\n\
       ```\n",
      product = self.product,
      display = self.display_name,
      version = candidate.product_version,
      kind = candidate.candidate_type,
      number = candidate.candidate_number,
      baseurl = baseurl,
    )
  }
}

/// Cut `notes` to at most `max` characters, keeping the final line
///
/// The final line is kept whole and preceded by [`TRUNCATED_MESSAGE`]; the
/// text before it is cut back to the last complete line that fits. If the
/// final line alone cannot fit, the notes are cut at a line boundary and
/// end with the marker instead.
pub fn truncate_notes(notes: &str, max: usize) -> String {
  if char_len(notes) <= max {
    return notes.to_string();
  }

  let text = notes.trim_end_matches('\n');
  let (head, last_line) = match text.rfind('\n') {
    Some(idx) => (&text[..=idx], &text[idx + 1..]),
    None => ("", text),
  };

  let marker_len = char_len(TRUNCATED_MESSAGE);
  let reserved = char_len(last_line) + marker_len;
  if reserved > max {
    let kept = keep_whole_lines(char_prefix(text, max.saturating_sub(marker_len)));
    let mut out = String::with_capacity(kept.len() + TRUNCATED_MESSAGE.len());
    out.push_str(kept);
    out.push_str(TRUNCATED_MESSAGE);
    return out;
  }

  let kept = keep_whole_lines(char_prefix(head, max - reserved));
  let mut out = String::with_capacity(kept.len() + TRUNCATED_MESSAGE.len() + last_line.len());
  out.push_str(kept);
  out.push_str(TRUNCATED_MESSAGE);
  out.push_str(last_line);
  out
}

/// Drop a dangling partial line
fn keep_whole_lines(text: &str) -> &str {
  if text.is_empty() || text.ends_with('\n') {
    return text;
  }
  match text.rfind('\n') {
    Some(idx) => text[..idx].trim_end(),
    None => "",
  }
}
