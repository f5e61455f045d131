//! Version labels from mirror directory listing pages
//!
//! A page like `.../microshift/ocp-dev-preview/` contains rows such as
//!
//! ```html
//! <tr class="file">
//!     <td>
//!         <a href="4.12.0-rc.6/">
//!             <svg ...><use xlink:href="#folder"></use></svg>
//!             <span class="name">4.12.0-rc.6</span>
//!         </a>
//!     </td>
//! </tr>
//! ```
//!
//! so the text of every `<span class="name">` is a version label. Entries
//! starting with `latest-` are symlinks to real versions and are skipped.

use tracing::warn;

/// Prefix of the symlink-style entries that are not real versions
pub const PLACEHOLDER_PREFIX: &str = "latest-";

/// Elements whose content is never parsed as markup
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Incremental scanner over directory listing markup
#[derive(Debug, Default)]
pub struct VersionListParser {
  in_version: bool,
  /// Version labels in document order
  pub versions: Vec<String>,
  /// Problems found in the markup; scanning stops at the first one
  pub errors: Vec<String>,
}

impl VersionListParser {
  pub fn new() -> Self {
    Self::default()
  }

  /// Scan a complete page
  ///
  /// Only `<` followed by a letter, `/`, `!` or `?` opens markup; any other
  /// `<` is text. `<script>` and `<style>` bodies are raw text and skipped.
  pub fn feed(&mut self, html: &str) {
    let mut pos = 0;
    let mut text_start = 0;

    while pos < html.len() {
      let Some(lt) = html[pos..].find('<') else {
        break;
      };
      let tag_start = pos + lt;
      let tag = &html[tag_start..];

      if !starts_markup(tag) {
        pos = tag_start + 1;
        continue;
      }
      self.handle_data(&html[text_start..tag_start]);

      if tag.starts_with("<!--") {
        match tag.find("-->") {
          Some(end) => pos = tag_start + end + 3,
          None => {
            self.error(tag_start, "unterminated comment");
            return;
          }
        }
        text_start = pos;
        continue;
      }

      let Some(end) = find_tag_end(tag) else {
        self.error(tag_start, "unterminated tag");
        return;
      };
      let inner = &tag[1..end];
      pos = tag_start + end + 1;

      if let Some(name) = inner.strip_prefix('/') {
        self.handle_endtag(name.trim());
      } else if inner.starts_with('!') || inner.starts_with('?') {
        // doctype or processing instruction
      } else {
        let (name, attrs) = parse_start_tag(inner);
        self.handle_starttag(&name, &attrs);

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !inner.ends_with('/') {
          let Some(close) = find_raw_text_end(&html[pos..], &name) else {
            self.error(tag_start, &format!("unterminated <{}> element", name));
            return;
          };
          pos += close;
        }
      }
      text_start = pos;
    }

    if text_start < html.len() {
      self.handle_data(&html[text_start..]);
    }
  }

  fn handle_starttag(&mut self, tag: &str, attrs: &[(String, String)]) {
    if !tag.eq_ignore_ascii_case("span") {
      return;
    }
    self.in_version = attrs
      .iter()
      .find(|(key, _)| key == "class")
      .is_some_and(|(_, value)| value == "name");
  }

  fn handle_endtag(&mut self, _tag: &str) {
    self.in_version = false;
  }

  fn handle_data(&mut self, data: &str) {
    if !self.in_version {
      return;
    }
    let data = data.trim();
    if data.is_empty() || data.starts_with(PLACEHOLDER_PREFIX) {
      return;
    }
    self.versions.push(data.to_string());
  }

  fn error(&mut self, offset: usize, message: &str) {
    self.errors.push(format!("{} at byte {}", message, offset));
  }
}

/// Extract version labels from a directory listing page
///
/// Never fails: markup problems are logged and whatever was extracted before
/// the problem is returned.
pub fn extract_versions(html: &str) -> Vec<String> {
  let mut parser = VersionListParser::new();
  parser.feed(html);
  for message in &parser.errors {
    warn!("error processing HTML: {}", message);
  }
  parser.versions
}

/// Whether `<` at the start of `tag` opens markup rather than being text
fn starts_markup(tag: &str) -> bool {
  tag[1..]
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Offset in `body` where the end tag `</name` of a raw text element starts
fn find_raw_text_end(body: &str, name: &str) -> Option<usize> {
  let lower = body.to_ascii_lowercase();
  let needle = format!("</{}", name);
  let mut from = 0;
  while let Some(idx) = lower[from..].find(&needle) {
    let at = from + idx;
    match lower[at + needle.len()..].chars().next() {
      Some(c) if c == '>' || c == '/' || c.is_whitespace() => return Some(at),
      None => return Some(at),
      _ => from = at + needle.len(),
    }
  }
  None
}

/// Index of the `>` closing the tag that starts at `tag[0] == '<'`, skipping quoted values
fn find_tag_end(tag: &str) -> Option<usize> {
  let mut quote: Option<char> = None;
  for (idx, ch) in tag.char_indices().skip(1) {
    match (quote, ch) {
      (Some(q), c) if c == q => quote = None,
      (Some(_), _) => {}
      (None, '"') | (None, '\'') => quote = Some(ch),
      (None, '>') => return Some(idx),
      (None, _) => {}
    }
  }
  None
}

/// Split `span class="name" id=x` into a lowercase tag name and attributes
fn parse_start_tag(inner: &str) -> (String, Vec<(String, String)>) {
  let inner = inner.trim_end_matches('/').trim();
  let name_end = inner.find(|c: char| c.is_whitespace()).unwrap_or(inner.len());
  let name = inner[..name_end].to_ascii_lowercase();

  let mut attrs = Vec::new();
  let mut rest = inner[name_end..].trim_start();

  while !rest.is_empty() {
    let key_end = rest
      .find(|c: char| c.is_whitespace() || c == '=')
      .unwrap_or(rest.len());
    let key = rest[..key_end].to_ascii_lowercase();
    rest = rest[key_end..].trim_start();

    let value = if let Some(after_eq) = rest.strip_prefix('=') {
      let after_eq = after_eq.trim_start();
      match after_eq.chars().next() {
        Some(q @ ('"' | '\'')) => {
          let body = &after_eq[1..];
          let close = body.find(q).unwrap_or(body.len());
          rest = body.get(close + 1..).unwrap_or("");
          body[..close].to_string()
        }
        _ => {
          let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
          rest = &after_eq[end..];
          after_eq[..end].to_string()
        }
      }
    } else {
      String::new()
    };

    if !key.is_empty() {
      attrs.push((key, value));
    }
    rest = rest.trim_start();
  }

  (name, attrs)
}
