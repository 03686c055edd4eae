//! Rewrite pipeline: classify, apply rules, validate, write-if-changed.
//!
//! Each file is an independent unit of work processed to completion
//! before the next begins: read, classified, rewritten in memory,
//! validated as JSON, and written back only when the content changed and
//! still parses. A file that fails validation keeps its on-disk content
//! and the run continues — substring replacement has no syntactic
//! awareness, so the parse gate is the safety net against corrupting
//! structure.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::classify::{classify, Classification};
use crate::error::{Result, RewriteError};
use crate::rules::{daily_rules, period_rules, Rule};

/// Result of rewriting one file's content in memory.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub classification: Classification,
    pub content: String,
    pub replacements: usize,
}

/// What happened to a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
    /// Rewritten content failed JSON validation; the write was skipped
    /// and the on-disk file is untouched. Carries the parse error.
    SkippedInvalid(String),
}

/// Per-file report line data.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub name: String,
    pub classification: Classification,
    pub replacements: usize,
    pub outcome: Outcome,
}

/// Totals for a whole run. Skipped files contribute nothing to the
/// grand total since their replacements never reached disk.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub total_replacements: usize,
    pub files_changed: usize,
}

/// Apply a rule table in order against progressively mutated content.
///
/// Returns the new content and the number of occurrences replaced. Later
/// rules see the effects of earlier ones, which is why table order is
/// part of the contract.
pub fn apply_rules(content: &str, rules: &[Rule]) -> (String, usize) {
    let mut content = content.to_string();
    let mut total = 0;
    for r in rules {
        let count = content.matches(r.find).count();
        if count > 0 {
            debug!(pattern = r.find, count, "applying rule");
            content = content.replace(r.find, r.replace);
            total += count;
        }
    }
    (content, total)
}

/// Classify content and apply the matching built-in rule table(s).
///
/// Daily and Both get the daily table; Period and Both get the period
/// table. For Both the daily table runs first — defined order, applied
/// unconditionally. Unknown content passes through with zero
/// replacements.
pub fn rewrite(original: &str) -> Rewrite {
    rewrite_with(original, daily_rules(), period_rules())
}

/// [`rewrite`] with explicit rule tables.
pub fn rewrite_with(original: &str, daily: &[Rule], period: &[Rule]) -> Rewrite {
    let classification = classify(original);
    let mut content = original.to_string();
    let mut replacements = 0;

    if matches!(classification, Classification::Daily | Classification::Both) {
        let (next, n) = apply_rules(&content, daily);
        content = next;
        replacements += n;
    }
    if matches!(classification, Classification::Period | Classification::Both) {
        let (next, n) = apply_rules(&content, period);
        content = next;
        replacements += n;
    }

    Rewrite {
        classification,
        content,
        replacements,
    }
}

/// Rewrite every `.json` file in `dir` in place.
///
/// Files are processed in sorted filename order. A file whose rewritten
/// content fails to parse as JSON is skipped with a warning and the run
/// continues.
///
/// # Errors
///
/// Returns [`RewriteError::MissingDir`] if `dir` is not a directory and
/// [`RewriteError::NoDashboards`] if it contains no `.json` files.
pub fn process_dir(dir: &Path) -> Result<RunSummary> {
    process_dir_with(dir, daily_rules(), period_rules())
}

fn process_dir_with(dir: &Path, daily: &[Rule], period: &[Rule]) -> Result<RunSummary> {
    if !dir.is_dir() {
        return Err(RewriteError::MissingDir(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(RewriteError::NoDashboards(dir.to_path_buf()));
    }

    let mut reports = Vec::with_capacity(files.len());
    let mut total_replacements = 0;
    let mut files_changed = 0;

    for path in files {
        let report = process_file(&path, daily, period)?;
        match report.outcome {
            Outcome::Changed => {
                total_replacements += report.replacements;
                files_changed += 1;
            }
            Outcome::Unchanged => total_replacements += report.replacements,
            Outcome::SkippedInvalid(_) => {}
        }
        reports.push(report);
    }

    Ok(RunSummary {
        reports,
        total_replacements,
        files_changed,
    })
}

fn process_file(path: &Path, daily: &[Rule], period: &[Rule]) -> Result<FileReport> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let original = fs::read_to_string(path)?;
    let rewritten = rewrite_with(&original, daily, period);

    let outcome = if rewritten.content == original {
        Outcome::Unchanged
    } else {
        match serde_json::from_str::<serde_json::Value>(&rewritten.content) {
            Ok(_) => {
                fs::write(path, &rewritten.content)?;
                Outcome::Changed
            }
            Err(e) => {
                warn!(
                    file = %name,
                    error = %e,
                    "JSON validation failed after replacement, skipping write"
                );
                Outcome::SkippedInvalid(e.to_string())
            }
        }
    };

    Ok(FileReport {
        name,
        classification: rewritten.classification,
        replacements: rewritten.replacements,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use tempfile::TempDir;

    /// A daily dashboard with one totals path, valid JSON.
    fn daily_dashboard() -> String {
        r#"{
  "title": "Portfolio Overview",
  "panels": [
    {
      "rawSql": "SELECT json_extract(payload, '$.totals.market_value') FROM snapshot_daily_current"
    }
  ]
}"#
        .to_string()
    }

    fn period_dashboard() -> String {
        r#"{
  "title": "Monthly Intervals",
  "panels": [
    {
      "rawSql": "SELECT json_extract(payload, 'intervals[2].totals.market_value')\nFROM snapshots\nWHERE kind = 'M'"
    }
  ]
}"#
        .to_string()
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn apply_rules_counts_every_occurrence() {
        let rules = [Rule {
            find: "old",
            replace: "new",
        }];
        let (out, n) = apply_rules("old old old", &rules);
        assert_eq!(out, "new new new");
        assert_eq!(n, 3);
    }

    #[test]
    fn apply_rules_later_rules_see_mutated_content() {
        let rules = [
            Rule {
                find: "a",
                replace: "b",
            },
            Rule {
                find: "bb",
                replace: "c",
            },
        ];
        let (out, n) = apply_rules("ab", &rules);
        assert_eq!(out, "c");
        assert_eq!(n, 2);
    }

    #[test]
    fn daily_totals_path_moves_under_portfolio() {
        let result = rewrite(&daily_dashboard());
        assert_eq!(result.classification, Classification::Daily);
        assert_eq!(result.replacements, 1);
        assert!(result
            .content
            .contains("'$.portfolio.totals.market_value'"));
        assert!(!result.content.contains("'$.totals.market_value'"));
        serde_json::from_str::<serde_json::Value>(&result.content).unwrap();
    }

    #[test]
    fn period_interval_market_value_gains_total_prefix() {
        let result = rewrite(&period_dashboard());
        assert_eq!(result.classification, Classification::Period);
        assert_eq!(result.replacements, 1);
        assert!(result
            .content
            .contains("intervals[2].totals.total_market_value'"));
    }

    #[test]
    fn net_and_plain_goal_progress_map_to_distinct_targets() {
        let content = r#"{"rawSql": "FROM snapshot_daily_current '$.goal_progress_net.pct' '$.goal_progress.pct'"}"#;
        let result = rewrite(content);
        assert_eq!(result.replacements, 2);
        assert!(result.content.contains("'$.goals.net_of_interest.pct'"));
        assert!(result.content.contains("'$.goals.baseline.pct'"));
        assert!(!result.content.contains("goal_progress"));
    }

    #[test]
    fn unknown_content_passes_through_untouched() {
        let content = r#"{"title": "nothing to see", "path": "'$.totals.market_value'"}"#;
        // No table marker anywhere, so even a matching path is left alone.
        let result = rewrite(content);
        assert_eq!(result.classification, Classification::Unknown);
        assert_eq!(result.replacements, 0);
        assert_eq!(result.content, content);
    }

    #[test]
    fn both_applies_daily_then_period() {
        let content = r#"{"rawSql": "FROM snapshot_daily_current '$.totals.market_value' FROM snapshots 'intervals[%d].totals.market_value'"}"#;
        let result = rewrite(content);
        assert_eq!(result.classification, Classification::Both);
        assert_eq!(result.replacements, 2);
        assert!(result
            .content
            .contains("'$.portfolio.totals.market_value'"));
        assert!(result
            .content
            .contains("intervals[%d].totals.total_market_value'"));
    }

    #[test]
    fn rewrite_is_idempotent() {
        let first = rewrite(&daily_dashboard());
        let second = rewrite(&first.content);
        assert_eq!(second.replacements, 0);
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn process_dir_rewrites_and_summarizes() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "daily.json", &daily_dashboard());
        write_file(dir.path(), "period.json", &period_dashboard());
        write_file(dir.path(), "other.json", r#"{"title": "unrelated"}"#);
        write_file(dir.path(), "notes.txt", "not a dashboard");

        let summary = process_dir(dir.path()).unwrap();
        assert_eq!(summary.reports.len(), 3);
        assert_eq!(summary.total_replacements, 2);
        assert_eq!(summary.files_changed, 2);

        // Sorted filename order.
        let names: Vec<&str> = summary.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["daily.json", "other.json", "period.json"]);

        let other = &summary.reports[1];
        assert_eq!(other.classification, Classification::Unknown);
        assert_eq!(other.replacements, 0);
        assert_eq!(other.outcome, Outcome::Unchanged);

        let on_disk = fs::read_to_string(dir.path().join("daily.json")).unwrap();
        assert!(on_disk.contains("'$.portfolio.totals.market_value'"));
    }

    #[test]
    fn process_dir_twice_makes_no_further_changes() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "daily.json", &daily_dashboard());

        process_dir(dir.path()).unwrap();
        let after_first = fs::read_to_string(&path).unwrap();

        let summary = process_dir(dir.path()).unwrap();
        assert_eq!(summary.total_replacements, 0);
        assert_eq!(summary.files_changed, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn unknown_file_is_byte_identical_after_run() {
        let dir = TempDir::new().unwrap();
        let content = r#"{"title": "unrelated", "uid": "abc123"}"#;
        let path = write_file(dir.path(), "other.json", content);

        process_dir(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn invalid_rewrite_skips_write_and_run_continues() {
        let dir = TempDir::new().unwrap();
        let original = r#"{"rawSql": "FROM snapshot_daily_current", "k": "v"}"#;
        let path = write_file(dir.path(), "broken.json", original);
        write_file(dir.path(), "daily.json", &daily_dashboard());

        // A table crafted to corrupt structure: eats the quote after "v".
        let corrupting = [Rule {
            find: "v\"",
            replace: "v",
        }];
        let summary = process_dir_with(dir.path(), &corrupting, period_rules()).unwrap();

        let broken = &summary.reports[0];
        assert_eq!(broken.name, "broken.json");
        assert!(matches!(broken.outcome, Outcome::SkippedInvalid(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);

        // The skipped file contributes nothing to the totals.
        assert_eq!(summary.total_replacements, 0);
        assert_eq!(summary.files_changed, 0);
    }

    #[test]
    fn missing_dir_is_fatal() {
        let err = process_dir(Path::new("/nonexistent/dashboards")).unwrap_err();
        assert!(matches!(err, RewriteError::MissingDir(_)));
    }

    #[test]
    fn dir_without_json_files_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "readme.md", "no dashboards here");
        let err = process_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RewriteError::NoDashboards(_)));
    }
}
