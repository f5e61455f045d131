//! Candidate release reconciliation
//!
//! Builds published to the mirror are matched against releases on GitHub;
//! anything missing is tagged and released with composed notes.
//!
//! # Flow
//!
//! 1. **family**: which `major.minor` lines to look at
//! 2. **discovery**: mirror listing -> rpm_list -> build metadata -> existence check
//! 3. **publish**: dedupe by commit, tag, push, create the release
//! 4. **notes**: preamble plus generated notes, truncated to the API limit
//!
//! A candidate is only ever built for a release name with no existing
//! release, and is consumed exactly once by [`publish::Publisher`].

pub mod discovery;
pub mod family;
pub mod notes;
pub mod publish;

pub use discovery::{CandidateRelease, Discovery};
pub use family::VersionFamily;
pub use notes::NoteComposer;
pub use publish::{PublishOutcome, Publisher, dedupe_by_commit};
