//! HTTP access to the package mirror

use crate::core::error::{HttpError, ReleaseError, ReleaseResult};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Source of mirror documents (listing pages and rpm_list manifests)
pub trait MirrorSource {
  /// Fetch a document as text; non-2xx statuses are errors
  fn fetch_text(&self, url: &str) -> ReleaseResult<String>;
}

/// Mirror client over blocking HTTP
pub struct HttpMirror {
  client: Client,
}

impl HttpMirror {
  /// Create a client whose requests fail after `timeout`
  pub fn new(timeout: Duration) -> ReleaseResult<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("candidate-release/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { client })
  }
}

impl MirrorSource for HttpMirror {
  fn fetch_text(&self, url: &str) -> ReleaseResult<String> {
    debug!("GET {}", url);
    let response = self.client.get(url).send()?;
    let status = response.status();

    if !status.is_success() {
      return Err(ReleaseError::Http(HttpError::Status {
        method: "GET".to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        body: String::new(),
      }));
    }

    Ok(response.text()?)
  }
}
