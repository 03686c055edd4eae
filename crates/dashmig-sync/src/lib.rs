//! # dashmig-sync
//!
//! Builds and executes the ordered `scp`/`ssh` command sequence that
//! pushes local `dashboards/` and `provisioning/` trees to the remote
//! host, optionally restarting the containerized dashboard service
//! afterwards.
//!
//! The plan is built up front ([`plan`]) after the local source
//! directories are verified to exist, then handed to a
//! [`CommandRunner`]: either [`ProcessRunner`] (spawn, block, abort on
//! first failure) or [`DryRunner`] (print the shell-quoted command, never
//! spawn). Execution is strictly sequential with no timeout — a hung
//! remote command blocks the run, which is acceptable for an
//! operator-invoked maintenance tool.

pub mod command;
pub mod error;
pub mod runner;

pub use command::{SyncCommand, SyncConfig};
pub use error::{Result, SyncError};
pub use runner::{execute, plan, CommandRunner, DryRunner, ProcessRunner};
