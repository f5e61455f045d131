//! CLI commands for candidate-release
//!
//! - **publish**: find candidate builds on the mirror without a GitHub
//!   release, then tag and release them (or report in dry-run mode)
//!
//! Commands accept `&RunContext` so configuration and credentials are
//! resolved once in `main`.

pub mod publish;
