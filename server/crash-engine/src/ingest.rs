//! Decoding of JSON payloads handed over by the query layer.

use crate::error::EngineError;
use crate::types::{CrashFreeRow, DimensionCountRow, RawCrashRow};

/// Decode a JSON array of crash rows.
pub fn parse_rows(json: &str) -> Result<Vec<RawCrashRow>, EngineError> {
  Ok(serde_json::from_str(json)?)
}

/// Decode a JSON array of per-day crash-free rows.
pub fn parse_crash_free_rows(json: &str) -> Result<Vec<CrashFreeRow>, EngineError> {
  Ok(serde_json::from_str(json)?)
}

/// Decode a JSON array of per-dimension counts.
pub fn parse_dimension_rows(json: &str) -> Result<Vec<DimensionCountRow>, EngineError> {
  Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_row_array() {
    let rows = parse_rows(r#"[{"crash_id":"a"},{"crash_id":"b","is_fatal":true}]"#).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].is_fatal);
  }

  #[test]
  fn malformed_payload_is_a_json_error() {
    let err = parse_rows("{not an array").unwrap_err();
    assert!(matches!(err, EngineError::Json(_)));
    assert!(err.to_string().starts_with("json:"));
  }

  #[test]
  fn parses_trend_tables() {
    let days = parse_crash_free_rows(r#"[{"date":"2025-01-15","crash_count":2,"crash_free_rate":null}]"#).unwrap();
    assert_eq!(days[0].crash_free_rate, None);
    let dims = parse_dimension_rows(r#"[{"key":"Pixel 7","count":4}]"#).unwrap();
    assert_eq!(dims[0].count, 4);
  }
}
