//! Publish command: discover unreleased candidates and release them

use crate::core::context::RunContext;
use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::github::GitHubClient;
use crate::mirror::{HttpMirror, ReleaseChannel};
use crate::release::family::families_from_version_file;
use crate::release::{
  CandidateRelease, Discovery, NoteComposer, PublishOutcome, Publisher, VersionFamily, dedupe_by_commit,
};
use tracing::info;

/// Options of a publishing run
#[derive(Debug, Clone)]
pub struct PublishArgs {
  /// Scan engineering candidates
  pub ec: bool,
  /// Scan release candidates
  pub rc: bool,
  /// Families given on the command line; empty means use the version file
  pub versions_to_scan: Vec<String>,
  /// Print discovered candidates as JSON instead of publishing
  pub json: bool,
}

/// Run the publish command
pub fn run_publish(ctx: &RunContext, args: &PublishArgs) -> ReleaseResult<()> {
  let families = resolve_families(ctx, &args.versions_to_scan)?;
  info!(
    "Scanning versions {}",
    families.iter().map(VersionFamily::as_str).collect::<Vec<_>>().join(", ")
  );

  let mirror = HttpMirror::new(ctx.http_timeout())?;
  let github = GitHubClient::new(&ctx.config.github, &ctx.token, ctx.http_timeout())?;
  let discovery = Discovery::new(&mirror, &github, &ctx.config.mirror)?;

  let new_releases = discover(&discovery, ctx, args, &families)?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&new_releases)?);
    return Ok(());
  }

  if new_releases.is_empty() {
    println!("No new releases found.");
    return Ok(());
  }
  println!();

  let git = SystemGit::open(&ctx.repo_root)?.with_secret(ctx.token.clone());
  if ctx.take_action {
    git.replace_remote(&ctx.config.github.remote, &ctx.config.token_remote_url(&ctx.token))?;
  }

  let composer = NoteComposer::new(&ctx.config.mirror);
  let publisher = Publisher::new(&git, &github, &composer, &ctx.config.github.remote, ctx.take_action);

  for candidate in dedupe_by_commit(new_releases) {
    match publisher.publish(&candidate)? {
      PublishOutcome::DryRun { notes } => {
        println!(
          "Dry run for new release {} on commit {} from {}",
          candidate.release_name, candidate.commit_reference, candidate.build_timestamp
        );
        println!("{}", notes);
      }
      PublishOutcome::Published(created) => {
        println!("Created new release {}", created.tag_name);
        println!();
        println!("{}", created.html_url);
        println!();
        println!("{}", created.body.as_deref().unwrap_or_default());
      }
    }
  }

  Ok(())
}

/// Families from the command line, or from the project version file
fn resolve_families(ctx: &RunContext, versions_to_scan: &[String]) -> ReleaseResult<Vec<VersionFamily>> {
  if versions_to_scan.is_empty() {
    return families_from_version_file(&ctx.version_file());
  }
  versions_to_scan.iter().map(|v| v.parse()).collect()
}

/// Candidates across the enabled channels, aarch64 mirror first
fn discover(
  discovery: &Discovery<'_>,
  ctx: &RunContext,
  args: &PublishArgs,
  families: &[VersionFamily],
) -> ReleaseResult<Vec<CandidateRelease>> {
  let mut channels = Vec::new();
  if args.ec {
    channels.push(ReleaseChannel::DevPreview);
  }
  if args.rc {
    channels.push(ReleaseChannel::Stable);
  }

  let mirror = &ctx.config.mirror;
  let mut found = Vec::new();
  for channel in channels {
    for base in [&mirror.aarch64_base, &mirror.x86_64_base] {
      found.extend(discovery.find_new_releases(families, base, channel)?);
    }
  }

  Ok(found)
}
