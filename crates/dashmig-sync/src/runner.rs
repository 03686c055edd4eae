//! Plan construction and command execution.

use std::process::Command;

use tracing::{debug, info};

use crate::command::{SyncCommand, SyncConfig};
use crate::error::{Result, SyncError};

/// Name of the remote dashboard service container.
const SERVICE: &str = "grafana";

/// Build the ordered command sequence for a sync run.
///
/// Transfers come first (dashboards, then provisioning, per the subset
/// flags), followed by the restart command when requested.
///
/// # Errors
///
/// Returns [`SyncError::MissingSource`] if either local source directory
/// is absent — checked before any command is built, so a failed
/// precondition dispatches nothing.
pub fn plan(config: &SyncConfig) -> Result<Vec<SyncCommand>> {
    let dashboards_dir = config.base_dir.join("dashboards");
    let provisioning_dir = config.base_dir.join("provisioning");

    for dir in [&dashboards_dir, &provisioning_dir] {
        if !dir.is_dir() {
            return Err(SyncError::MissingSource(dir.clone()));
        }
    }

    let mut commands = Vec::new();
    if config.sync_dashboards() {
        commands.push(SyncCommand::CopyTree {
            src: dashboards_dir,
            target: config.remote_target(),
        });
    }
    if config.sync_provisioning() {
        commands.push(SyncCommand::CopyTree {
            src: provisioning_dir,
            target: config.remote_target(),
        });
    }
    if config.restart {
        commands.push(SyncCommand::Restart {
            login: config.remote_login(),
            service: SERVICE.to_string(),
        });
    }
    Ok(commands)
}

/// Executes one command of the plan.
pub trait CommandRunner {
    fn run(&mut self, command: &SyncCommand) -> Result<()>;
}

/// Spawns the command and blocks until it exits. Inherits stdio so the
/// operator sees transfer progress and ssh prompts directly.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, command: &SyncCommand) -> Result<()> {
        let (program, args) = command.program_args();
        debug!(command = %command, "spawning");
        let status = Command::new(program)
            .args(&args)
            .status()
            .map_err(|source| SyncError::Spawn {
                program: program.to_string(),
                source,
            })?;
        if !status.success() {
            return Err(SyncError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// Prints each command in shell-quoted form; never spawns a process.
#[derive(Debug, Default)]
pub struct DryRunner;

impl CommandRunner for DryRunner {
    fn run(&mut self, command: &SyncCommand) -> Result<()> {
        println!("+ {command}");
        Ok(())
    }
}

/// Run the plan in order, aborting on the first failure.
pub fn execute(runner: &mut dyn CommandRunner, commands: &[SyncCommand]) -> Result<()> {
    for command in commands {
        runner.run(command)?;
    }
    info!(count = commands.len(), "sync plan completed");
    Ok(())
}
