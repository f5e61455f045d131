//! Tracing initialisation for the candidate-release binary.
//!
//! Diagnostics (fetched URLs, skipped versions, API failures) go through
//! `tracing` to stderr; command results stay on stdout.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG`; otherwise logs at `debug` when `verbose` is set and
/// at `info` when it is not. Only the first call takes effect.
pub fn init_tracing(verbose: bool) {
  let level = if verbose { Level::DEBUG } else { Level::INFO };
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .try_init()
    .ok();
}
