//! Error types for candidate-release with contextual messages and exit codes
//!
//! Every failure is categorised so `main` can pick an exit code and, where one
//! exists, print a hint that points the operator at the fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for candidate-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing token)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Remote error (mirror or GitHub API)
  Remote = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for candidate-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Mirror and GitHub transport errors
  Http(HttpError),

  /// A package filename did not match the build grammar
  Grammar(GrammarError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Git(_) => ExitCode::System,
      ReleaseError::Http(_) => ExitCode::Remote,
      ReleaseError::Grammar(_) => ExitCode::Remote,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::Http(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }

  /// True when the error is an HTTP 404 from a remote endpoint
  pub fn is_not_found(&self) -> bool {
    matches!(self, ReleaseError::Http(HttpError::Status { status: 404, .. }))
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Http(e) => write!(f, "{}", e),
      ReleaseError::Grammar(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<reqwest::Error> for ReleaseError {
  fn from(err: reqwest::Error) -> Self {
    let url = err.url().map(|u| u.to_string()).unwrap_or_else(|| "<unknown>".to_string());
    let reason = if err.is_timeout() {
      format!("request timed out: {}", err)
    } else {
      err.to_string()
    };
    ReleaseError::Http(HttpError::Transport { url, reason })
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<chrono::ParseError> for ReleaseError {
  fn from(err: chrono::ParseError) -> Self {
    ReleaseError::message(format!("Timestamp parse error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// An explicitly requested config file does not exist
  NotFound { path: PathBuf },

  /// No GitHub token was supplied
  MissingToken,

  /// A configuration value failed validation
  InvalidValue { field: String, reason: String },

  /// The project version file could not be used to derive version families
  VersionFile { path: PathBuf, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingToken => Some(
        "Export GITHUB_TOKEN with a token allowed to create releases, or pass --token.".to_string(),
      ),
      ConfigError::VersionFile { .. } => {
        Some("Pass --version-to-scan (repeatable) to choose the versions explicitly.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Configuration file not found: {}", path.display())
      }
      ConfigError::MissingToken => write!(f, "GITHUB_TOKEN does not appear to be set"),
      ConfigError::InvalidValue { field, reason } => {
        write!(f, "Invalid configuration value for {}: {}", field, reason)
      }
      ConfigError::VersionFile { path, reason } => {
        write!(f, "Could not read version from {}: {}", path.display(), reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    refname: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("permission denied") || reason.contains("403") {
          Some("Check that the token has write access to the repository contents.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run from a clone of the repository or pass --repo-root (tried {})",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed {
        remote,
        refname,
        reason,
      } => {
        write!(f, "Push of {} to {} failed: {}", refname, remote, reason)
      }
    }
  }
}

/// Mirror and GitHub transport errors
#[derive(Debug)]
pub enum HttpError {
  /// The request never produced a response (DNS, TLS, timeout, ...)
  Transport { url: String, reason: String },

  /// The server answered with a non-success status
  Status {
    method: String,
    url: String,
    status: u16,
    body: String,
  },
}

impl HttpError {
  fn help_message(&self) -> Option<String> {
    match self {
      HttpError::Status { status: 401, .. } => Some("The GitHub token was rejected; check that it has not expired.".to_string()),
      HttpError::Status { status: 403, .. } => {
        Some("The GitHub token lacks permission for this repository, or the rate limit was hit.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for HttpError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HttpError::Transport { url, reason } => write!(f, "Request to {} failed: {}", url, reason),
      HttpError::Status {
        method,
        url,
        status,
        body,
      } => {
        write!(f, "{} {} returned HTTP {}", method, url, status)?;
        if !body.is_empty() {
          write!(f, "\nResponse: {}", body)?;
        }
        Ok(())
      }
    }
  }
}

/// A package filename that does not follow the build grammar
#[derive(Debug)]
pub struct GrammarError {
  pub filename: String,
}

impl fmt::Display for GrammarError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Could not parse version info from '{}'", self.filename)
  }
}

/// Result type alias for candidate-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
