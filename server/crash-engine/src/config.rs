//! Engine configuration with sane defaults and environment overrides.

use std::str::FromStr;

use tracing::debug;

use crate::error::EngineError;

pub const ENV_TOTAL_USERS: &str = "CRASH_ENGINE_TOTAL_USERS";
pub const ENV_TOP_CRASHES: &str = "CRASH_ENGINE_TOP_CRASHES";
pub const ENV_BREAKDOWN_LIMIT: &str = "CRASH_ENGINE_BREAKDOWN_LIMIT";

/// Tunables for crash analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Approximate active-user population used as the impact percentage baseline.
  /// Zero or negative values are accepted; impact percentages then read as 0.
  pub total_users: i64,
  /// Max crash summaries carried into a trend report.
  pub top_crashes_limit: usize,
  /// Max entries in a trend report's device breakdown.
  pub breakdown_limit: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      total_users: 10_000,
      top_crashes_limit: 10,
      breakdown_limit: 10,
    }
  }
}

impl Config {
  /// Defaults overridden by `CRASH_ENGINE_*` environment variables.
  pub fn from_env() -> Result<Self, EngineError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Defaults overridden by whatever `lookup` returns for each variable name.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut config = Self::default();
    if let Some(v) = parse_override(&lookup, ENV_TOTAL_USERS)? {
      config.total_users = v;
    }
    if let Some(v) = parse_override(&lookup, ENV_TOP_CRASHES)? {
      config.top_crashes_limit = v;
    }
    if let Some(v) = parse_override(&lookup, ENV_BREAKDOWN_LIMIT)? {
      config.breakdown_limit = v;
    }
    Ok(config)
  }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Result<Option<T>, EngineError>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
  T::Err: std::fmt::Display,
{
  let raw = match lookup(key) {
    Some(raw) if !raw.trim().is_empty() => raw,
    _ => return Ok(None),
  };
  let value = raw
    .trim()
    .parse::<T>()
    .map_err(|e| EngineError::validation(key, &format!("invalid number {:?}: {}", raw, e)))?;
  debug!(key, value = %raw.trim(), "config override applied");
  Ok(Some(value))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key| map.get(key).cloned()
  }

  #[test]
  fn defaults_match_documented_baseline() {
    let config = Config::default();
    assert_eq!(config.total_users, 10_000);
    assert_eq!(config.top_crashes_limit, 10);
    assert_eq!(config.breakdown_limit, 10);
  }

  #[test]
  fn missing_variables_keep_defaults() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, Config::default());
  }

  #[test]
  fn overrides_are_applied() {
    let config = Config::from_lookup(lookup_from(&[
      (ENV_TOTAL_USERS, "250000"),
      (ENV_TOP_CRASHES, " 5 "),
      (ENV_BREAKDOWN_LIMIT, "3"),
    ]))
    .unwrap();
    assert_eq!(config.total_users, 250_000);
    assert_eq!(config.top_crashes_limit, 5);
    assert_eq!(config.breakdown_limit, 3);
  }

  #[test]
  fn blank_value_is_ignored() {
    let config = Config::from_lookup(lookup_from(&[(ENV_TOTAL_USERS, "  ")])).unwrap();
    assert_eq!(config.total_users, 10_000);
  }

  #[test]
  fn negative_baseline_is_accepted() {
    let config = Config::from_lookup(lookup_from(&[(ENV_TOTAL_USERS, "-1")])).unwrap();
    assert_eq!(config.total_users, -1);
  }

  #[test]
  fn invalid_number_names_the_variable() {
    let err = Config::from_lookup(lookup_from(&[(ENV_TOP_CRASHES, "ten")])).unwrap_err();
    assert!(err.to_string().contains(ENV_TOP_CRASHES));
  }
}
