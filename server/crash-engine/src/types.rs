//! Core types for the crash engine (inbound rows + output records).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the query layer hands over)
// ---------------------------------------------------------------------------

/// One crash/ANR event row. Unknown fields are ignored; missing or `null`
/// fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCrashRow {
  #[serde(default, deserialize_with = "nullable")]
  pub crash_id: String,
  #[serde(default, deserialize_with = "nullable")]
  pub timestamp: String,
  /// "crash", "anr", ...
  #[serde(default, deserialize_with = "nullable")]
  pub event_name: String,
  #[serde(default, deserialize_with = "nullable")]
  pub platform: String,
  #[serde(default, deserialize_with = "nullable")]
  pub app_version: String,
  #[serde(default, deserialize_with = "nullable")]
  pub bundle_id: String,
  #[serde(default, deserialize_with = "nullable")]
  pub exception_type: String,
  #[serde(default, deserialize_with = "nullable")]
  pub exception_message: String,
  #[serde(default)]
  pub stack_trace: Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub is_fatal: bool,
  #[serde(default, deserialize_with = "nullable")]
  pub device_model: String,
  #[serde(default, deserialize_with = "nullable")]
  pub os_version: String,
  /// Available memory in bytes.
  #[serde(default)]
  pub memory_available: Option<u64>,
  /// Available storage in bytes.
  #[serde(default)]
  pub storage_available: Option<u64>,
  #[serde(default)]
  pub orientation: Option<String>,
  #[serde(default)]
  pub battery_level: Option<f64>,
  #[serde(default)]
  pub user_id: Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub session_id: String,
  /// JSON-encoded object of developer-set keys.
  #[serde(default)]
  pub custom_keys: Option<String>,
  /// JSON-encoded array of breadcrumbs.
  #[serde(default)]
  pub breadcrumbs: Option<String>,
}

/// One pre-aggregated day of crash-free statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrashFreeRow {
  #[serde(default, deserialize_with = "nullable")]
  pub date: String,
  #[serde(default, deserialize_with = "nullable", alias = "crashes")]
  pub crash_count: u64,
  #[serde(default, deserialize_with = "nullable", alias = "users_affected")]
  pub affected_users: u64,
  /// Percentage 0..=100; missing means the day was crash free.
  #[serde(default, alias = "crash_free_percentage")]
  pub crash_free_rate: Option<f64>,
}

/// One pre-aggregated count for a grouping dimension (usually device model).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionCountRow {
  #[serde(default, deserialize_with = "nullable", alias = "device_model", alias = "dimension")]
  pub key: String,
  #[serde(default, deserialize_with = "nullable", alias = "crash_count")]
  pub count: u64,
}

/// Treat an explicit JSON `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Impact level
// ---------------------------------------------------------------------------

/// Coarse severity. Ordering is `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
  Low,
  Medium,
  High,
}

impl ImpactLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
    }
  }
}

impl fmt::Display for ImpactLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ---------------------------------------------------------------------------
// Stack traces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
  pub method: String,
  pub class: String,
  pub file: String,
  pub line: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub column: Option<u32>,
  /// Well-known platform library the frame belongs to, e.g. "androidx".
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub library: Option<String>,
}

/// Parsed exception header plus frames, throw site first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTrace {
  pub exception_type: String,
  pub message: String,
  pub frames: Vec<StackFrame>,
}

// ---------------------------------------------------------------------------
// Summaries and details (JSON contract: what we emit)
// ---------------------------------------------------------------------------

/// A deduplicated crash group, or a singleton group for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashSummary {
  /// Crash id of the group's representative (first seen) row.
  pub id: String,
  /// Stable hex digest of the group key.
  pub fingerprint: String,
  pub timestamp: String,
  pub impact: ImpactLevel,
  pub affected_users: u64,
  pub occurrences: u64,
  pub app_version: String,
  pub platform: String,
  pub message: String,
  pub is_fatal: bool,
  pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
  pub model: String,
  pub os_version: String,
  pub memory: String,
  pub storage: String,
  pub orientation: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub battery_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashContext {
  pub app_version: String,
  pub os_version: String,
  pub device: String,
  pub memory: String,
  pub breadcrumbs: Vec<serde_json::Value>,
  pub custom_keys: BTreeMap<String, serde_json::Value>,
  pub session_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashDetails {
  pub summary: CrashSummary,
  pub stack_trace: StackTrace,
  pub context: CrashContext,
  pub device: DeviceInfo,
  pub fix_suggestion: String,
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashTrend {
  pub date: String,
  pub crash_count: u64,
  pub affected_users: u64,
  pub crash_free_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceBreakdown {
  pub device: String,
  pub count: u64,
  /// Share of the full (untruncated) total, 0..=100, two decimals.
  pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
  pub time_range: String,
  pub trends: Vec<CrashTrend>,
  pub top_crashes: Vec<CrashSummary>,
  pub device_breakdown: Vec<DeviceBreakdown>,
  pub crash_free_percentage: f64,
}
