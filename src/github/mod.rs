//! GitHub release API access

pub mod client;

pub use client::{GeneratedNotes, GitHubClient, NewRelease, ReleaseHost, ReleaseInfo, ReleaseLookup};
