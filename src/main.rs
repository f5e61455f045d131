mod commands;
mod core;
mod github;
mod mirror;
mod release;
mod utils;

use clap::Parser;
use commands::publish::{PublishArgs, run_publish};
use core::config::ToolConfig;
use core::context::RunContext;
use core::error::{ReleaseError, ReleaseResult, print_error};
use std::path::PathBuf;

/// Publish GitHub releases for MicroShift engineering and release candidates
///
/// Scans the OpenShift mirror for EC/RC builds, and for every build that has
/// no release yet creates the tag and a pre-release with download links.
#[derive(Parser)]
#[command(name = "candidate-release")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Include engineering candidates (default)
  #[arg(long, overrides_with = "no_ec")]
  ec: bool,

  /// Do not include engineering candidates
  #[arg(long, overrides_with = "ec")]
  no_ec: bool,

  /// Include release candidates (default)
  #[arg(long, overrides_with = "no_rc")]
  rc: bool,

  /// Do not include release candidates
  #[arg(long, overrides_with = "rc")]
  no_rc: bool,

  /// Report but take no action
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// A major.minor version to scan. May be repeated. Defaults to the current
  /// and previous minor version from the project version file.
  #[arg(long = "version-to-scan", value_name = "VERSION")]
  versions_to_scan: Vec<String>,

  /// GitHub token used for the API and for pushing tags
  #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
  token: Option<String>,

  /// Root of the git checkout to tag (defaults to the current directory)
  #[arg(long)]
  repo_root: Option<PathBuf>,

  /// Configuration file (defaults to release-notes.toml search)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Print discovered candidates as JSON and exit
  #[arg(long)]
  json: bool,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn get_styles() -> clap::builder::Styles {
  let header = anstyle::Style::new()
    .bold()
    .underline()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));

  clap::builder::Styles::styled()
    .usage(header)
    .header(header)
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  core::telemetry::init_tracing(cli.verbose);

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> ReleaseResult<()> {
  let repo_root = match cli.repo_root {
    Some(path) => path,
    None => std::env::current_dir()?,
  };

  // Precedence: flags > environment > config file > defaults
  let mut config = ToolConfig::load(&repo_root, cli.config.as_deref())?;
  config.apply_env(|key| std::env::var(key).ok());

  let ctx = RunContext::build(&repo_root, config, cli.token, cli.dry_run)?;

  let args = PublishArgs {
    ec: cli.ec || !cli.no_ec,
    rc: cli.rc || !cli.no_rc,
    versions_to_scan: cli.versions_to_scan,
    json: cli.json,
  };
  run_publish(&ctx, &args)
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
