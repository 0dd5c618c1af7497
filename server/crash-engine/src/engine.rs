//! Core engine: groups crash rows into ranked summaries and fronts the detail
//! and trend builders.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::config::Config;
use crate::detail;
use crate::fingerprint::{self, CrashGroupKey};
use crate::impact::{self, ImpactClassifier};
use crate::trend;
use crate::types::*;

/// The crash analysis engine. Holds only read-only configuration, so one
/// instance can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Engine {
  config: Config,
  classifier: ImpactClassifier,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self {
      classifier: ImpactClassifier::new(config.total_users),
      config,
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn classifier(&self) -> &ImpactClassifier {
    &self.classifier
  }

  /// Deduplicate rows into crash groups, ranked by impact then occurrences.
  pub fn aggregate(&self, rows: &[RawCrashRow]) -> Vec<CrashSummary> {
    aggregate(rows, &self.classifier)
  }

  /// The `limit` highest ranked crash groups.
  pub fn top_crashes(&self, rows: &[RawCrashRow], limit: usize) -> Vec<CrashSummary> {
    let mut summaries = self.aggregate(rows);
    summaries.truncate(limit);
    summaries
  }

  pub fn details(&self, row: &RawCrashRow) -> CrashDetails {
    detail::build_details(row, &self.classifier)
  }

  /// Details for the first row carrying `crash_id`.
  pub fn find_details(&self, rows: &[RawCrashRow], crash_id: &str) -> Option<CrashDetails> {
    rows
      .iter()
      .find(|r| r.crash_id == crash_id)
      .map(|r| self.details(r))
  }

  /// Trend report using the configured top-crash and breakdown limits.
  pub fn trend(
    &self,
    stats_rows: &[DimensionCountRow],
    crash_free_rows: &[CrashFreeRow],
    top_summaries: &[CrashSummary],
    time_range: &str,
  ) -> TrendAnalysis {
    trend::build_trend_with_limits(
      stats_rows,
      crash_free_rows,
      top_summaries,
      time_range,
      self.config.top_crashes_limit,
      self.config.breakdown_limit,
    )
  }
}

/// Per-group accumulator. The representative is the first row seen.
struct CrashGroup<'a> {
  key: CrashGroupKey,
  representative: &'a RawCrashRow,
  occurrences: u64,
  users: HashSet<&'a str>,
}

/// Group rows by (exception type, message, app version) and rank the groups.
///
/// Rows without a user id count as occurrences but not as affected users.
pub fn aggregate(rows: &[RawCrashRow], classifier: &ImpactClassifier) -> Vec<CrashSummary> {
  let mut index: HashMap<CrashGroupKey, usize> = HashMap::new();
  let mut groups: Vec<CrashGroup<'_>> = Vec::new();

  for row in rows {
    let key = CrashGroupKey::from_row(row);
    let slot = match index.get(&key) {
      Some(&i) => i,
      None => {
        index.insert(key.clone(), groups.len());
        groups.push(CrashGroup {
          key,
          representative: row,
          occurrences: 0,
          users: HashSet::new(),
        });
        groups.len() - 1
      }
    };

    let group = &mut groups[slot];
    group.occurrences += 1;
    if let Some(user) = row.user_id.as_deref().filter(|u| !u.is_empty()) {
      group.users.insert(user);
    }
  }

  let mut summaries: Vec<CrashSummary> = groups
    .iter()
    .map(|g| {
      summarize(
        g.representative,
        &g.key,
        g.users.len() as u64,
        g.occurrences,
        classifier,
      )
    })
    .collect();
  impact::sort_summaries(&mut summaries);

  trace!(rows = rows.len(), groups = summaries.len(), "aggregated crash rows");
  summaries
}

/// Summary for a group represented by `row`.
pub(crate) fn summarize(
  row: &RawCrashRow,
  key: &CrashGroupKey,
  affected_users: u64,
  occurrences: u64,
  classifier: &ImpactClassifier,
) -> CrashSummary {
  let message = if row.exception_message.is_empty() {
    row.exception_type.clone()
  } else {
    row.exception_message.clone()
  };

  CrashSummary {
    id: row.crash_id.clone(),
    fingerprint: key.fingerprint(),
    timestamp: row.timestamp.clone(),
    impact: classifier.classify(affected_users, occurrences, row.is_fatal),
    affected_users,
    occurrences,
    app_version: row.app_version.clone(),
    platform: row.platform.clone(),
    message,
    is_fatal: row.is_fatal,
    title: fingerprint::title(&row.exception_type, &row.exception_message),
  }
}
