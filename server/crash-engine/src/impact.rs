//! Impact classification, summary ranking, and fix-suggestion text.
//!
//! Thresholds are fixed business heuristics; only the active-user baseline is
//! configurable.

use std::cmp::Ordering;

use crate::types::{CrashSummary, ImpactLevel, StackFrame};

/// Fatal crashes: high above these, medium at or above the next pair.
const FATAL_HIGH_USERS: u64 = 100;
const FATAL_HIGH_PCT: f64 = 5.0;
const FATAL_MEDIUM_USERS: u64 = 10;
const FATAL_MEDIUM_PCT: f64 = 1.0;

const NON_FATAL_HIGH_USERS: u64 = 500;
const NON_FATAL_HIGH_PCT: f64 = 10.0;
const NON_FATAL_HIGH_OCCURRENCES: u64 = 1000;
const NON_FATAL_MEDIUM_USERS: u64 = 50;
const NON_FATAL_MEDIUM_PCT: f64 = 2.0;
const NON_FATAL_MEDIUM_OCCURRENCES: u64 = 100;

/// Canned advice keyed by a substring of the exception type. First match wins.
const ADVICE: &[(&str, &str)] = &[
  (
    "NullPointerException",
    "Add null checks or use safe calls before dereferencing values that may be absent",
  ),
  (
    "IndexOutOfBoundsException",
    "Validate indices against the collection size before accessing elements",
  ),
  (
    "IllegalArgumentException",
    "Validate arguments at the call site and make sure callers pass values in the expected range",
  ),
  (
    "ClassCastException",
    "Check the runtime type before casting or use a safe cast",
  ),
  (
    "ConcurrentModificationException",
    "Avoid modifying a collection while iterating it; use an iterator's remove or a concurrent collection",
  ),
  (
    "OutOfMemoryError",
    "Reduce memory pressure by releasing large objects, downsampling bitmaps, and checking for leaks",
  ),
  (
    "StackOverflowError",
    "Look for unbounded recursion and add a base case or convert it to iteration",
  ),
];

const GENERIC_ADVICE: &str =
  "Review the stack trace and the surrounding code to identify the root cause";

/// Maps crash reach and frequency to an [`ImpactLevel`] against a fixed
/// active-user baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactClassifier {
  total_users: i64,
}

impl Default for ImpactClassifier {
  fn default() -> Self {
    Self::new(10_000)
  }
}

impl ImpactClassifier {
  pub fn new(total_users: i64) -> Self {
    Self { total_users }
  }

  pub fn total_users(&self) -> i64 {
    self.total_users
  }

  /// Percentage of the baseline reached; 0 when the baseline is not positive.
  pub fn affected_pct(&self, affected_users: u64) -> f64 {
    if self.total_users <= 0 {
      return 0.0;
    }
    affected_users as f64 / self.total_users as f64 * 100.0
  }

  pub fn classify(&self, affected_users: u64, occurrences: u64, is_fatal: bool) -> ImpactLevel {
    let pct = self.affected_pct(affected_users);

    if is_fatal {
      if affected_users > FATAL_HIGH_USERS || pct > FATAL_HIGH_PCT {
        ImpactLevel::High
      } else if affected_users >= FATAL_MEDIUM_USERS || pct >= FATAL_MEDIUM_PCT {
        ImpactLevel::Medium
      } else {
        ImpactLevel::Low
      }
    } else if affected_users > NON_FATAL_HIGH_USERS
      || pct > NON_FATAL_HIGH_PCT
      || occurrences > NON_FATAL_HIGH_OCCURRENCES
    {
      ImpactLevel::High
    } else if affected_users >= NON_FATAL_MEDIUM_USERS
      || pct >= NON_FATAL_MEDIUM_PCT
      || occurrences >= NON_FATAL_MEDIUM_OCCURRENCES
    {
      ImpactLevel::Medium
    } else {
      ImpactLevel::Low
    }
  }
}

/// Ranking order: higher impact first, then more occurrences first.
pub fn compare_summaries(a: &CrashSummary, b: &CrashSummary) -> Ordering {
  b.impact
    .cmp(&a.impact)
    .then_with(|| b.occurrences.cmp(&a.occurrences))
}

/// Stable in-place ranking; full ties keep their input order.
pub fn sort_summaries(summaries: &mut [CrashSummary]) {
  summaries.sort_by(compare_summaries);
}

/// Canned advice for a well-known exception type, if any.
pub fn advice_for(exception_type: &str) -> Option<&'static str> {
  ADVICE
    .iter()
    .find(|(needle, _)| exception_type.contains(needle))
    .map(|(_, advice)| *advice)
}

/// Narrative fix suggestion built from the throw site (first frame).
pub fn fix_suggestion(
  exception_type: &str,
  frames: &[StackFrame],
  message: &str,
  app_version: &str,
) -> String {
  let top = frames.first();
  let mut parts: Vec<String> = Vec::new();

  match top.map(|f| f.class.as_str()).filter(|c| !c.is_empty()) {
    Some(class) => parts.push(format!("The crash originates in {}", class)),
    None => parts.push("The crash originates in an unknown class".to_string()),
  }

  if let Some(frame) = top {
    if !frame.method.is_empty() {
      parts.push(format!("Method: {}", frame.method));
    }
    if !frame.file.is_empty() && frame.line > 0 {
      parts.push(format!("Location: {}:{}", frame.file, frame.line));
    }
  }

  parts.push(format!("It happens when a {} is thrown", exception_type));

  if !message.is_empty() {
    parts.push(format!("Error message: \"{}\"", message));
  }

  parts.push(advice_for(exception_type).unwrap_or(GENERIC_ADVICE).to_string());

  if !app_version.is_empty() {
    parts.push(format!("Seen in app version {}", app_version));
  }

  format!("{}.", parts.join(". "))
}
