//! Integration tests for the crash engine.

use crash_engine::{
  parse_crash_free_rows, parse_dimension_rows, parse_rows, Config, Engine, ImpactLevel, TimeRange,
};

fn fixture_rows() -> Vec<crash_engine::RawCrashRow> {
  let json = r#"[
    {
      "crash_id": "evt-001",
      "timestamp": "2025-01-15T10:30:00Z",
      "event_name": "crash",
      "platform": "ANDROID",
      "app_version": "4.2.0",
      "bundle_id": "com.example.shop",
      "exception_type": "java.lang.NullPointerException",
      "exception_message": "Attempt to invoke virtual method 'int java.lang.String.length()' on a null object reference",
      "stack_trace": "java.lang.NullPointerException: Attempt to invoke virtual method 'int java.lang.String.length()' on a null object reference\n\tat com.example.shop.cart.CartPresenter.render(CartPresenter.kt:73)\n\tat android.os.Handler.handleCallback(Handler.java:942)\n\tat java.lang.reflect.Method.invoke(Native Method)",
      "is_fatal": true,
      "device_model": "Pixel 7",
      "os_version": "14",
      "memory_available": 2147483648,
      "storage_available": 524288000,
      "user_id": "user-1",
      "session_id": "sess-1",
      "custom_keys": "{\"screen\":\"cart\"}",
      "breadcrumbs": "[\"open_cart\",\"tap_checkout\"]"
    },
    {
      "crash_id": "evt-002",
      "timestamp": "2025-01-15T10:31:00Z",
      "event_name": "crash",
      "platform": "ANDROID",
      "app_version": "4.2.0",
      "exception_type": "java.lang.NullPointerException",
      "exception_message": "Attempt to invoke virtual method 'int java.lang.String.length()' on a null object reference",
      "is_fatal": true,
      "user_id": "user-2",
      "breadcrumbs": "not-json"
    },
    {
      "crash_id": "evt-003",
      "timestamp": "2025-01-15T11:00:00Z",
      "event_name": "anr",
      "platform": "ANDROID",
      "app_version": "4.2.0",
      "exception_type": "ApplicationNotResponding",
      "exception_message": "Input dispatching timed out",
      "is_fatal": false,
      "user_id": null
    }
  ]"#;
  parse_rows(json).unwrap()
}

#[test]
fn aggregation_deduplicates_and_ranks() {
  let engine = Engine::with_defaults();
  let summaries = engine.aggregate(&fixture_rows());

  assert_eq!(summaries.len(), 2);
  let npe = &summaries[0];
  assert_eq!(npe.id, "evt-001");
  assert_eq!(npe.occurrences, 2);
  assert_eq!(npe.affected_users, 2);
  assert!(npe.is_fatal);
  assert_eq!(npe.impact, ImpactLevel::Low);
  assert_eq!(
    npe.title,
    "NullPointerException: Attempt to invoke virtual method 'int java.lang..."
  );

  let anr = &summaries[1];
  assert_eq!(anr.affected_users, 0);
  assert_eq!(anr.occurrences, 1);
}

#[test]
fn details_for_a_single_crash() {
  let engine = Engine::with_defaults();
  let details = engine.find_details(&fixture_rows(), "evt-001").unwrap();

  assert_eq!(details.stack_trace.exception_type, "java.lang.NullPointerException");
  assert_eq!(details.stack_trace.frames.len(), 2);
  assert_eq!(details.stack_trace.frames[0].class, "CartPresenter");
  assert_eq!(details.stack_trace.frames[1].library.as_deref(), Some("android"));

  assert_eq!(details.device.memory, "2.0GB");
  assert_eq!(details.device.storage, "500MB");
  assert_eq!(details.context.breadcrumbs.len(), 2);
  assert_eq!(details.context.custom_keys["screen"], "cart");

  assert!(details
    .fix_suggestion
    .contains("The crash originates in CartPresenter. Method: render. Location: CartPresenter.kt:73"));
  assert!(details.fix_suggestion.contains("null checks"));
}

#[test]
fn malformed_context_never_fails() {
  let engine = Engine::with_defaults();
  let details = engine.find_details(&fixture_rows(), "evt-002").unwrap();
  assert_eq!(details.context.breadcrumbs, vec![serde_json::json!("not-json")]);
  assert!(details.context.custom_keys.is_empty());
  assert_eq!(details.stack_trace.exception_type, "Unknown");
  assert_eq!(details.device.memory, "Unknown");
}

#[test]
fn trend_report_from_query_tables() {
  let engine = Engine::with_defaults();
  let summaries = engine.aggregate(&fixture_rows());

  let days = parse_crash_free_rows(
    r#"[
      {"date":"2025-01-14","crash_count":1,"affected_users":1,"crash_free_rate":99.5},
      {"date":"2025-01-15","crash_count":2,"affected_users":2,"crash_free_rate":98.75}
    ]"#,
  )
  .unwrap();
  let devices = parse_dimension_rows(
    r#"[
      {"device_model":"Pixel 7","count":2},
      {"device_model":"Galaxy S23","count":1},
      {"device_model":"Pixel 7","count":1}
    ]"#,
  )
  .unwrap();

  let range: TimeRange = "7d".parse().unwrap();
  let report = engine.trend(&devices, &days, &summaries, range.label());

  assert_eq!(report.time_range, "Last 7 days");
  assert_eq!(report.trends.len(), 2);
  assert_eq!(report.crash_free_percentage, 99.13);
  assert_eq!(report.top_crashes.len(), 2);
  assert_eq!(report.device_breakdown[0].device, "Pixel 7");
  assert_eq!(report.device_breakdown[0].count, 3);
  assert_eq!(report.device_breakdown[0].percentage, 75.0);
  assert_eq!(report.device_breakdown[1].percentage, 25.0);
}

#[test]
fn configured_limits_apply_to_trend() {
  let engine = Engine::new(Config {
    top_crashes_limit: 1,
    breakdown_limit: 1,
    ..Config::default()
  });
  let summaries = engine.aggregate(&fixture_rows());
  let devices = parse_dimension_rows(r#"[{"key":"a","count":1},{"key":"b","count":3}]"#).unwrap();
  let report = engine.trend(&devices, &[], &summaries, "Last 24 hours");

  assert_eq!(report.top_crashes.len(), 1);
  assert_eq!(report.device_breakdown.len(), 1);
  assert_eq!(report.device_breakdown[0].device, "b");
  assert_eq!(report.device_breakdown[0].percentage, 75.0);
  assert_eq!(report.crash_free_percentage, 100.0);
}

#[test]
fn deterministic_output_across_runs() {
  let rows = fixture_rows();
  let a = serde_json::to_string(&Engine::with_defaults().aggregate(&rows)).unwrap();
  let b = serde_json::to_string(&Engine::with_defaults().aggregate(&rows)).unwrap();
  assert_eq!(a, b, "Same inputs must produce identical JSON output");
  assert!(a.contains("\"impact\":\"low\""));
}
