//! Classification of dashboard files by referenced snapshot table.
//!
//! Classification is a pure function of the raw file content: it sniffs
//! for the table markers that the embedded SQL queries carry. A file can
//! reference both tables, so the buckets are not mutually exclusive.

use std::fmt;

/// Marker for queries against the daily snapshot table.
const DAILY_MARKER: &str = "snapshot_daily_current";

/// Markers for queries against the period snapshot table.
///
/// Inside JSON strings a line break after `FROM snapshots` is encoded as
/// the two-character escape `\n`, but raw SQL blocks may carry a real
/// newline or continue with a space or closing quote — all four forms
/// must be checked.
const PERIOD_MARKERS: [&str; 4] = [
    "FROM snapshots ",
    "FROM snapshots\\n",
    "FROM snapshots'",
    "FROM snapshots\n",
];

/// Which snapshot table(s) a dashboard file queries.
///
/// Determines which rewrite rule table(s) apply: `Daily` and `Both` get
/// the daily table, `Period` and `Both` get the period table (daily first
/// for `Both`), and `Unknown` files are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Daily,
    Period,
    Both,
    Unknown,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Classification::Daily => "daily",
            Classification::Period => "period",
            Classification::Both => "both",
            Classification::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Classify raw dashboard content by which snapshot table(s) it queries.
pub fn classify(content: &str) -> Classification {
    let has_daily = content.contains(DAILY_MARKER);
    let has_period = PERIOD_MARKERS.iter().any(|m| content.contains(m));

    match (has_daily, has_period) {
        (true, true) => Classification::Both,
        (true, false) => Classification::Daily,
        (false, true) => Classification::Period,
        (false, false) => Classification::Unknown,
    }
}
