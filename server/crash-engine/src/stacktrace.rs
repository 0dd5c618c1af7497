//! Free-text stack trace parsing.
//!
//! The first non-empty line is the exception header; every following line is
//! tried against [`FRAME_SHAPES`] in order, first match wins. Lines matching
//! nothing are skipped, so parsing never fails.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::types::{StackFrame, StackTrace};

pub const UNKNOWN_TYPE: &str = "Unknown";
pub const NO_TRACE_MESSAGE: &str = "No stack trace available";
pub const UNKNOWN_MESSAGE: &str = "Unknown error";

/// Symbol prefixes of well-known platform libraries (matched case-insensitively).
pub const LIBRARY_PREFIXES: &[&str] = &[
  "android.",
  "androidx.",
  "com.google.",
  "java.",
  "kotlin.",
  "swift.",
  "foundation.",
  "uikit.",
];

/// One line shape a frame can take.
///
/// Every pattern captures `symbol`; shapes that also capture `file` and `line`
/// produce a frame, the others only consume the line.
pub struct FrameShape {
  pub name: &'static str,
  pub pattern: &'static str,
}

pub const FRAME_SHAPES: &[FrameShape] = &[
  // at com.example.Foo.bar(Foo.kt:42) / (Foo.kt:42:7)
  FrameShape {
    name: "managed",
    pattern: r"^(?:at\s+)?(?P<symbol>[\w$<>]+(?:\.[\w$<>]+)+)\((?P<file>[^:()]+):(?P<line>\d+)(?::(?P<col>\d+))?\)$",
  },
  // at com.example.Foo.bar(Native Method)
  FrameShape {
    name: "managed_opaque",
    pattern: r"^(?:at\s+)?(?P<symbol>[\w$<>]+(?:\.[\w$<>]+)+)\((?P<args>[^)]*)\)$",
  },
  // #00 pc 000000000004fb0c  /system/lib64/libc.so (abort+164)
  FrameShape {
    name: "native",
    pattern: r"^#(?P<index>\d+)\s+pc\s+(?P<addr>[0-9a-fA-F]+)\s+(?P<file>\S+)\s+\((?P<symbol>[^+()]+)\+(?P<line>[^)]+)\)$",
  },
  // main (AppDelegate.swift:17)
  FrameShape {
    name: "generic",
    pattern: r"^(?P<symbol>\S+)\s+\((?P<file>[^:()]+):(?P<line>\d+)\)$",
  },
];

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?P<type>[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)(?::\s*(?P<message>.*))?$")
    .expect("header pattern is valid")
});

static SHAPES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
  FRAME_SHAPES
    .iter()
    .map(|shape| {
      let re = Regex::new(shape.pattern).expect("frame shape pattern is valid");
      (shape.name, re)
    })
    .collect()
});

/// Parse a raw stack trace blob. `None` or blank input yields the sentinel trace.
pub fn parse(text: Option<&str>) -> StackTrace {
  let mut lines = text
    .unwrap_or_default()
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty());

  let header = match lines.next() {
    Some(h) => h,
    None => {
      return StackTrace {
        exception_type: UNKNOWN_TYPE.to_string(),
        message: NO_TRACE_MESSAGE.to_string(),
        frames: Vec::new(),
      }
    }
  };

  let (exception_type, message) = match HEADER.captures(header) {
    Some(caps) => (
      caps["type"].to_string(),
      caps
        .name("message")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default(),
    ),
    None => (UNKNOWN_TYPE.to_string(), UNKNOWN_MESSAGE.to_string()),
  };

  let frames = lines.filter_map(parse_frame).collect();

  StackTrace {
    exception_type,
    message,
    frames,
  }
}

/// Parse one trimmed frame line, or `None` when it carries no usable frame.
pub fn parse_frame(line: &str) -> Option<StackFrame> {
  let Some((shape, caps)) = SHAPES
    .iter()
    .find_map(|(name, re)| re.captures(line).map(|caps| (*name, caps)))
  else {
    debug!(line, "stack line matches no frame shape");
    return None;
  };

  let frame = frame_from_captures(&caps);
  if frame.is_none() {
    debug!(shape, line, "stack line has no source location");
  }
  frame
}

fn frame_from_captures(caps: &Captures<'_>) -> Option<StackFrame> {
  let symbol = caps.name("symbol")?.as_str().trim();
  let file = caps.name("file")?.as_str().to_string();
  let line = caps.name("line")?.as_str().parse().unwrap_or(0);
  let column = caps.name("col").and_then(|c| c.as_str().parse().ok());

  let (class, method) = split_symbol(symbol);

  Some(StackFrame {
    method: method.to_string(),
    class: class.to_string(),
    file,
    line,
    column,
    library: detect_library(symbol),
  })
}

/// Split `com.example.Foo.bar` into (`Foo`, `bar`). Undotted symbols are both.
fn split_symbol(symbol: &str) -> (&str, &str) {
  match symbol.rsplit_once('.') {
    Some((owner, method)) => {
      let class = owner.rsplit('.').next().unwrap_or(owner);
      (class, method)
    }
    None => (symbol, symbol),
  }
}

/// Well-known library prefix of a symbol, without its trailing dot.
pub fn detect_library(symbol: &str) -> Option<String> {
  let lower = symbol.to_ascii_lowercase();
  LIBRARY_PREFIXES
    .iter()
    .find(|prefix| lower.starts_with(*prefix))
    .map(|prefix| prefix.trim_end_matches('.').to_string())
}
