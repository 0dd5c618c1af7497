//! Trend reports: per-day crash-free series, top crashes, and a ranked
//! device/dimension breakdown.

use std::collections::HashMap;

use tracing::trace;

use crate::types::{
  CrashFreeRow, CrashSummary, CrashTrend, DeviceBreakdown, DimensionCountRow, TrendAnalysis,
};

pub const DEFAULT_TOP_CRASHES: usize = 10;
pub const DEFAULT_BREAKDOWN_LIMIT: usize = 10;

/// Rate assumed for a day without a reported crash-free rate.
const CRASH_FREE_DEFAULT: f64 = 100.0;

/// Build a trend report with the default limit of 10 crashes and 10 devices.
pub fn build_trend(
  stats_rows: &[DimensionCountRow],
  crash_free_rows: &[CrashFreeRow],
  top_summaries: &[CrashSummary],
  time_range: &str,
) -> TrendAnalysis {
  build_trend_with_limits(
    stats_rows,
    crash_free_rows,
    top_summaries,
    time_range,
    DEFAULT_TOP_CRASHES,
    DEFAULT_BREAKDOWN_LIMIT,
  )
}

/// `top_summaries` must already be ranked; it is only truncated here.
pub fn build_trend_with_limits(
  stats_rows: &[DimensionCountRow],
  crash_free_rows: &[CrashFreeRow],
  top_summaries: &[CrashSummary],
  time_range: &str,
  top_crashes_limit: usize,
  breakdown_limit: usize,
) -> TrendAnalysis {
  let trends: Vec<CrashTrend> = crash_free_rows
    .iter()
    .map(|r| CrashTrend {
      date: r.date.clone(),
      crash_count: r.crash_count,
      affected_users: r.affected_users,
      crash_free_rate: r.crash_free_rate.unwrap_or(CRASH_FREE_DEFAULT),
    })
    .collect();

  let crash_free_percentage = overall_crash_free(&trends);
  let device_breakdown = breakdown(stats_rows, breakdown_limit);
  let top_crashes = top_summaries.iter().take(top_crashes_limit).cloned().collect();

  trace!(
    days = trends.len(),
    dimensions = stats_rows.len(),
    time_range,
    "built crash trend"
  );

  TrendAnalysis {
    time_range: time_range.to_string(),
    trends,
    top_crashes,
    device_breakdown,
    crash_free_percentage,
  }
}

/// Mean of the daily rates, 100 when there are no days.
pub fn overall_crash_free(trends: &[CrashTrend]) -> f64 {
  if trends.is_empty() {
    return CRASH_FREE_DEFAULT;
  }
  let sum: f64 = trends.iter().map(|t| t.crash_free_rate).sum();
  round2(sum / trends.len() as f64)
}

/// Sum counts per key, rank by count (ties keep first-seen order), and keep
/// the top `limit`. Percentages are shares of the full total.
pub fn breakdown(rows: &[DimensionCountRow], limit: usize) -> Vec<DeviceBreakdown> {
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut totals: Vec<(&str, u64)> = Vec::new();
  let mut grand_total: u64 = 0;

  for row in rows {
    grand_total += row.count;
    match index.get(row.key.as_str()) {
      Some(&i) => totals[i].1 += row.count,
      None => {
        index.insert(row.key.as_str(), totals.len());
        totals.push((row.key.as_str(), row.count));
      }
    }
  }

  totals.sort_by(|a, b| b.1.cmp(&a.1));

  totals
    .into_iter()
    .take(limit)
    .map(|(device, count)| DeviceBreakdown {
      device: device.to_string(),
      count,
      percentage: if grand_total == 0 {
        0.0
      } else {
        round2(count as f64 / grand_total as f64 * 100.0)
      },
    })
    .collect()
}

fn round2(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}
