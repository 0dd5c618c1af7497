//! Single-crash detail records: parsed trace, device snapshot, context, and a
//! fix suggestion.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::engine;
use crate::fingerprint::CrashGroupKey;
use crate::impact::{self, ImpactClassifier};
use crate::stacktrace;
use crate::types::{CrashContext, CrashDetails, DeviceInfo, RawCrashRow};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Build the full detail record for one row, treated as a group of one.
pub fn build_details(row: &RawCrashRow, classifier: &ImpactClassifier) -> CrashDetails {
  let summary = engine::summarize(row, &CrashGroupKey::from_row(row), 1, 1, classifier);
  let stack_trace = stacktrace::parse(row.stack_trace.as_deref());

  let fix_suggestion = impact::fix_suggestion(
    &row.exception_type,
    &stack_trace.frames,
    &row.exception_message,
    &row.app_version,
  );

  CrashDetails {
    summary,
    stack_trace,
    context: context_of(row),
    device: device_of(row),
    fix_suggestion,
  }
}

pub fn device_of(row: &RawCrashRow) -> DeviceInfo {
  DeviceInfo {
    model: row.device_model.clone(),
    os_version: row.os_version.clone(),
    memory: format_bytes(row.memory_available),
    storage: format_bytes(row.storage_available),
    orientation: row
      .orientation
      .clone()
      .filter(|o| !o.is_empty())
      .unwrap_or_else(|| "unknown".to_string()),
    battery_level: row.battery_level,
  }
}

pub fn context_of(row: &RawCrashRow) -> CrashContext {
  CrashContext {
    app_version: row.app_version.clone(),
    os_version: row.os_version.clone(),
    device: row.device_model.clone(),
    memory: format_bytes(row.memory_available),
    breadcrumbs: decode_breadcrumbs(row.breadcrumbs.as_deref()),
    custom_keys: decode_custom_keys(row.custom_keys.as_deref()),
    session_id: row.session_id.clone(),
    user_id: row.user_id.clone().filter(|u| !u.is_empty()),
  }
}

/// `"1.5GB"` from 1 GiB up, `"512MB"` below; `"Unknown"` when absent or zero.
pub fn format_bytes(bytes: Option<u64>) -> String {
  match bytes {
    None | Some(0) => "Unknown".to_string(),
    Some(b) if b as f64 >= GIB => format!("{:.1}GB", round_half_up(b as f64 / GIB, 1)),
    Some(b) => format!("{:.0}MB", round_half_up(b as f64 / MIB, 0)),
  }
}

/// Round to `decimals` places, halves away from zero.
fn round_half_up(v: f64, decimals: i32) -> f64 {
  let scale = 10f64.powi(decimals);
  (v * scale).round() / scale
}

/// Decode a JSON array of breadcrumbs. Undecodable text is kept verbatim as
/// the only breadcrumb; absent text yields none.
pub fn decode_breadcrumbs(raw: Option<&str>) -> Vec<Value> {
  let raw = match raw {
    Some(r) if !r.trim().is_empty() => r,
    _ => return Vec::new(),
  };
  match serde_json::from_str::<Vec<Value>>(raw) {
    Ok(crumbs) => crumbs,
    Err(e) => {
      debug!(error = %e, "breadcrumbs are not a JSON array, keeping raw text");
      vec![Value::String(raw.to_string())]
    }
  }
}

/// Decode a JSON object of custom keys; anything else yields an empty map.
pub fn decode_custom_keys(raw: Option<&str>) -> BTreeMap<String, Value> {
  let raw = match raw.map(str::trim) {
    Some(r) if !r.is_empty() => r,
    _ => return BTreeMap::new(),
  };
  serde_json::from_str(raw).unwrap_or_else(|e| {
    debug!(error = %e, "custom keys are not a JSON object, ignoring");
    BTreeMap::new()
  })
}
