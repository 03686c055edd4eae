//! # dashmig-core
//!
//! Rewrite engine for migrating dashboard JSONPath expressions to the
//! v5 snapshot schema.
//!
//! Each dashboard file is classified by which snapshot table its embedded
//! queries reference ([`Classification`]), then an ordered table of literal
//! substring replacements is applied ([`rules`]), the result is validated
//! as JSON, and the file is written back only when it changed and still
//! parses ([`rewrite`]).
//!
//! Paths are treated as opaque strings throughout — there is no query
//! grammar here, which is exactly why the post-rewrite JSON validation
//! gate exists.

pub mod classify;
pub mod error;
pub mod rewrite;
pub mod rules;

pub use classify::{classify, Classification};
pub use error::{Result, RewriteError};
pub use rewrite::{process_dir, rewrite, FileReport, Outcome, Rewrite, RunSummary};
pub use rules::{check_ordering, daily_rules, period_rules, Rule};
