//! Crash group identity: grouping key, stable fingerprint, and display title.

use crate::types::RawCrashRow;

/// Joins key fields; not expected inside exception types, messages or versions.
const KEY_SEPARATOR: char = '\u{1f}';

/// Titles keep at most this many message characters before truncating.
const TITLE_MESSAGE_MAX: usize = 50;
const TITLE_MESSAGE_KEEP: usize = 47;

/// Deduplication identity of a crash group. Exact, case-sensitive match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrashGroupKey(String);

impl CrashGroupKey {
  pub fn new(exception_type: &str, exception_message: &str, app_version: &str) -> Self {
    let mut key =
      String::with_capacity(exception_type.len() + exception_message.len() + app_version.len() + 2);
    key.push_str(exception_type);
    key.push(KEY_SEPARATOR);
    key.push_str(exception_message);
    key.push(KEY_SEPARATOR);
    key.push_str(app_version);
    Self(key)
  }

  pub fn from_row(row: &RawCrashRow) -> Self {
    Self::new(&row.exception_type, &row.exception_message, &row.app_version)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Compact blake3 digest of the key (32 hex chars).
  pub fn fingerprint(&self) -> String {
    let hex = blake3::hash(self.0.as_bytes()).to_hex();
    hex[..32].to_string()
  }
}

/// `"<ShortType>: <message>"`, message truncated to 47 chars + "..." past 50.
pub fn title(exception_type: &str, message: &str) -> String {
  let short_type = exception_type.rsplit('.').next().unwrap_or(exception_type);
  if message.is_empty() {
    return short_type.to_string();
  }
  format!("{}: {}", short_type, truncate(message))
}

fn truncate(message: &str) -> String {
  if message.chars().count() <= TITLE_MESSAGE_MAX {
    return message.to_string();
  }
  let kept: String = message.chars().take(TITLE_MESSAGE_KEEP).collect();
  format!("{}...", kept)
}
