//! Core engine for candidate-release
//!
//! - **config**: Tool configuration (release-notes.toml, environment overrides)
//! - **context**: Run context threaded through discovery and publishing
//! - **error**: Error types with contextual help messages and exit codes
//! - **telemetry**: Tracing subscriber setup
//! - **vcs**: Git operations abstraction (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod telemetry;
pub mod vcs;
