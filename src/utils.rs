//! Small string helpers shared by the mirror, GitHub and git layers

/// Replace every occurrence of `secret` in `text`
///
/// Used on anything that may echo a token-bearing remote URL back to us
/// (git stderr, push output) before it reaches logs or error messages.
pub fn redact(text: &str, secret: &str) -> String {
  if secret.is_empty() {
    return text.to_string();
  }
  text.replace(secret, "~~REDACTED~~")
}

/// Join a base URL and path segments with exactly one `/` between each part
///
/// Empty segments are dropped. A trailing slash is only emitted when the last
/// non-empty segment ends with one, so directory URLs stay directory URLs.
pub fn join_url(base: &str, segments: &[&str]) -> String {
  let mut url = base.trim_end_matches('/').to_string();
  let mut trailing_slash = base.ends_with('/') && segments.iter().all(|s| s.is_empty());

  for segment in segments {
    let trimmed = segment.trim_matches('/');
    if trimmed.is_empty() {
      continue;
    }
    url.push('/');
    url.push_str(trimmed);
    trailing_slash = segment.ends_with('/');
  }

  if trailing_slash {
    url.push('/');
  }
  url
}

/// Number of characters (not bytes) in a string
pub fn char_len(text: &str) -> usize {
  text.chars().count()
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}
