//! Integration tests for candidate-release
//!
//! Each test builds a throwaway git repository, serves the mirror and the
//! GitHub API from a mockito server, and runs the compiled binary.

mod helpers;
mod test_cli;
mod test_publish;
