//! Crash Analysis Engine: deterministic, rule-based crash intelligence.
//!
//! Takes crash/ANR rows already queried from the telemetry warehouse, groups
//! them into crash groups, classifies impact, parses stack traces, and builds
//! detail and trend reports.
//!
//! No DB, no network; pure, synchronous computation over in-memory data.

pub mod config;
pub mod detail;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod impact;
pub mod ingest;
pub mod stacktrace;
pub mod time_range;
pub mod trend;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use impact::ImpactClassifier;
pub use ingest::{parse_crash_free_rows, parse_dimension_rows, parse_rows};
pub use time_range::TimeRange;
pub use types::{
  CrashDetails, CrashFreeRow, CrashSummary, DimensionCountRow, ImpactLevel, RawCrashRow,
  StackTrace, TrendAnalysis,
};
