//! Named reporting windows and their labels.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
  #[serde(rename = "24h")]
  Last24Hours,
  #[default]
  #[serde(rename = "7d")]
  Last7Days,
  #[serde(rename = "30d")]
  Last30Days,
  #[serde(rename = "90d")]
  Last90Days,
}

impl TimeRange {
  pub fn code(self) -> &'static str {
    match self {
      Self::Last24Hours => "24h",
      Self::Last7Days => "7d",
      Self::Last30Days => "30d",
      Self::Last90Days => "90d",
    }
  }

  /// Human label used as a trend report's `time_range`.
  pub fn label(self) -> &'static str {
    match self {
      Self::Last24Hours => "Last 24 hours",
      Self::Last7Days => "Last 7 days",
      Self::Last30Days => "Last 30 days",
      Self::Last90Days => "Last 90 days",
    }
  }

  pub fn duration(self) -> Duration {
    match self {
      Self::Last24Hours => Duration::hours(24),
      Self::Last7Days => Duration::days(7),
      Self::Last30Days => Duration::days(30),
      Self::Last90Days => Duration::days(90),
    }
  }

  /// Inclusive start of the window ending at `now`.
  pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
    now - self.duration()
  }
}

impl fmt::Display for TimeRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

impl FromStr for TimeRange {
  type Err = EngineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "24h" | "1d" => Ok(Self::Last24Hours),
      "7d" => Ok(Self::Last7Days),
      "30d" => Ok(Self::Last30Days),
      "90d" => Ok(Self::Last90Days),
      _ => Err(EngineError::validation("time_range", "expected 24h|7d|30d|90d")),
    }
  }
}
