//! Structured JSON logging to stderr.
//!
//! Every line is one JSON object:
//!
//! ```json
//! {"level":"error","msg":"baseline count query failed","guard":"highlights","parent":"H1","error":"connection error: refused","ts":"2025-01-16T10:30:00.000Z"}
//! ```
//!
//! Field values are rendered with `Display` and emitted as JSON strings.
//!
//! # Usage
//!
//! ```
//! use block_guard::log;
//!
//! log!(info, "guard registered", guard: "highlights", events: 2);
//! log!(warn, "child count out of bounds", projected: -1);
//! ```
//!
//! # Level
//!
//! The minimum level is process wide. It is read once from `BLOCK_GUARD_LOG`
//! (`debug`, `info`, `warn`, `error` or `off`; default `info`) unless a host
//! calls [`init`] first, typically at startup.
//!
//! # Capturing
//!
//! [`capture`] redirects the current thread's log lines into a buffer instead
//! of stderr. Captured lines bypass the level filter.

use crate::constants::{LOG_LEVEL_ENV, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Per-decision detail.
    Debug,
    /// Lifecycle events (registration).
    Info,
    /// Rejected mutations.
    Warn,
    /// Recovered failures (fail-open).
    Error,
}

impl Level {
    /// Lowercase name used in the `level` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a level filter. `Ok(None)` means logging is off.
    pub fn parse_filter(raw: &str) -> Result<Option<Self>, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Some(Self::Debug)),
            "info" => Ok(Some(Self::Info)),
            "warn" | "warning" => Ok(Some(Self::Warn)),
            "error" => Ok(Some(Self::Error)),
            "off" | "none" => Ok(None),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MIN_LEVEL: OnceLock<Option<Level>> = OnceLock::new();

thread_local! {
    static CAPTURE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Set the process-wide minimum level.
///
/// `None` turns logging off. Returns `false` if the level was already fixed,
/// either by an earlier call or by a log line that read `BLOCK_GUARD_LOG`.
pub fn init(min_level: Option<Level>) -> bool {
    MIN_LEVEL.set(min_level).is_ok()
}

/// The process-wide minimum level, reading `BLOCK_GUARD_LOG` on first use.
///
/// An unparsable value falls back to `info`.
pub fn min_level() -> Option<Level> {
    *MIN_LEVEL.get_or_init(|| {
        std::env::var(LOG_LEVEL_ENV)
            .ok()
            .map_or(Some(Level::Info), |raw| {
                Level::parse_filter(&raw).unwrap_or(Some(Level::Info))
            })
    })
}

/// Whether a line at `level` would be written to stderr.
pub fn enabled(level: Level) -> bool {
    min_level().is_some_and(|min| level >= min)
}

/// Run `f`, collecting every log line it emits on this thread.
///
/// ```
/// use block_guard::log;
///
/// let ((), lines) = log::capture(|| log!(error, "count failed", guard: "tabbed_content"));
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].contains(r#""guard":"tabbed_content""#));
/// ```
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let previous = CAPTURE.with(|c| c.replace(Some(Vec::new())));
    let result = f();
    let lines = CAPTURE.with(|c| c.replace(previous)).unwrap_or_default();
    (result, lines)
}

/// Write one log line. Used by [`log!`](crate::log!).
#[doc(hidden)]
pub fn __emit(level: Level, msg: &str, fields: &[(&str, &str)]) {
    let captured = CAPTURE.with(|c| match c.borrow_mut().as_mut() {
        Some(buf) => {
            buf.push(build_line(level, msg, fields, &now_iso()));
            true
        },
        None => false,
    });
    if captured || !enabled(level) {
        return;
    }
    let line = build_line(level, msg, fields, &now_iso());
    let _ = writeln!(std::io::stderr(), "{line}");
}

/// Build a structured log line.
pub(crate) fn build_line(level: Level, msg: &str, fields: &[(&str, &str)], ts: &str) -> String {
    // {"level":"info","msg":"...","key":"val",...,"ts":"..."}
    let mut out = String::with_capacity(48 + msg.len() + fields.len() * 24);
    out.push_str(r#"{"level":""#);
    out.push_str(level.as_str());
    out.push_str(r#"","msg":""#);
    push_escaped(&mut out, msg);
    out.push('"');

    for (key, value) in fields {
        out.push_str(r#",""#);
        push_escaped(&mut out, key);
        out.push_str(r#"":""#);
        push_escaped(&mut out, value);
        out.push('"');
    }

    out.push_str(r#","ts":""#);
    out.push_str(ts);
    out.push_str(r#""}"#);
    out
}

/// Append `s` to `out`, escaped as JSON string content (RFC 8259).
fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                let _ = write!(out, "\\u{:04x}", c as u32);
            },
            c => out.push(c),
        }
    }
}

fn now_iso() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_timestamp(now.as_secs(), now.subsec_millis())
}

/// Format Unix seconds + millis as `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Date conversion is Howard Hinnant's `civil_from_days`.
#[allow(clippy::similar_names)] // doe/doy/yoe are the algorithm's names
pub(crate) fn format_timestamp(secs: u64, millis: u32) -> String {
    let days = secs / SECONDS_PER_DAY;
    let rem = secs % SECONDS_PER_DAY;
    let (hh, mm, ss) = (
        rem / SECONDS_PER_HOUR,
        rem % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        rem % SECONDS_PER_MINUTE,
    );

    // Epoch shifted to 0000-03-01 so leap days fall at the end of a year
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hh:02}:{mm:02}:{ss:02}.{millis:03}Z")
}

/// Resolve a level keyword to [`Level`]. Unknown keywords fail to compile.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_level {
    (debug) => {
        $crate::log::Level::Debug
    };
    (info) => {
        $crate::log::Level::Info
    };
    (warn) => {
        $crate::log::Level::Warn
    };
    (error) => {
        $crate::log::Level::Error
    };
}

/// Structured logging macro with key-value pairs.
///
/// ```
/// use block_guard::log;
///
/// let parent = "T1";
/// log!(warn, "child count out of bounds", guard: "tabbed_content", parent: parent, projected: 5);
/// log!(info, "no fields");
/// ```
///
/// Field values are only formatted when the line will be written.
#[macro_export]
macro_rules! log {
    ($level:ident, $msg:expr $(, $key:ident : $value:expr)* $(,)?) => {{
        let level = $crate::__log_level!($level);
        if $crate::log::__wants(level) {
            let fields: &[(&str, &str)] = &[
                $( (stringify!($key), &format!("{}", $value)) ),*
            ];
            $crate::log::__emit(level, $msg, fields);
        }
    }};
}

/// Whether a line at `level` is wanted by stderr or an active capture.
#[doc(hidden)]
pub fn __wants(level: Level) -> bool {
    CAPTURE.with(|c| c.borrow().is_some()) || enabled(level)
}
