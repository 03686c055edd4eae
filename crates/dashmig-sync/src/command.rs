//! Sync configuration and command construction.

use std::fmt;
use std::path::PathBuf;

/// Configuration for a sync run: embedded defaults overridden by CLI
/// flags. No global state — the CLI populates this struct explicitly.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// SSH host or IP.
    pub host: String,
    /// SSH user.
    pub user: String,
    /// Destination directory on the server.
    pub dest: String,
    /// Local directory containing `dashboards/` and `provisioning/`.
    pub base_dir: PathBuf,
    /// Sync the dashboards subset only.
    pub dashboards: bool,
    /// Sync the provisioning subset only.
    pub provisioning: bool,
    /// Restart the dashboard service after sync.
    pub restart: bool,
    /// Print commands without executing.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            host: "192.168.12.221".to_string(),
            user: "jose".to_string(),
            dest: "/home/jose/grafana_lmi/grafana_lmi".to_string(),
            base_dir: PathBuf::from("."),
            dashboards: false,
            provisioning: false,
            restart: false,
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// `user@host:dest/` target for copy commands.
    pub fn remote_target(&self) -> String {
        format!("{}@{}:{}/", self.user, self.host, self.dest)
    }

    /// `user@host` login for remote command execution.
    pub fn remote_login(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Neither subset flag means "sync everything"; one flag narrows the
    /// run to that subset.
    pub fn sync_dashboards(&self) -> bool {
        self.dashboards || !self.provisioning
    }

    pub fn sync_provisioning(&self) -> bool {
        self.provisioning || !self.dashboards
    }
}

/// One external command in the sync plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    /// `scp -r <src> <target>` — recursive copy of a local tree.
    CopyTree { src: PathBuf, target: String },
    /// `ssh <login> docker restart <service>` — restart the remote
    /// containerized service.
    Restart { login: String, service: String },
}

impl SyncCommand {
    /// The program and argument vector to spawn.
    pub fn program_args(&self) -> (&'static str, Vec<String>) {
        match self {
            SyncCommand::CopyTree { src, target } => (
                "scp",
                vec![
                    "-r".to_string(),
                    src.display().to_string(),
                    target.clone(),
                ],
            ),
            SyncCommand::Restart { login, service } => (
                "ssh",
                vec![
                    login.clone(),
                    "docker".to_string(),
                    "restart".to_string(),
                    service.clone(),
                ],
            ),
        }
    }
}

impl fmt::Display for SyncCommand {
    /// Shell-quoted, human-reproducible rendering (used by dry-run).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (program, args) = self.program_args();
        write!(f, "{program}")?;
        for arg in &args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Quote an argument for copy-paste into a POSIX shell.
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@=%+,[]".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_embedded_literals() {
        let config = SyncConfig::default();
        assert_eq!(config.host, "192.168.12.221");
        assert_eq!(config.user, "jose");
        assert_eq!(
            config.remote_target(),
            "jose@192.168.12.221:/home/jose/grafana_lmi/grafana_lmi/"
        );
        assert_eq!(config.remote_login(), "jose@192.168.12.221");
    }

    #[test]
    fn no_subset_flag_means_sync_everything() {
        let config = SyncConfig::default();
        assert!(config.sync_dashboards());
        assert!(config.sync_provisioning());
    }

    #[test]
    fn one_subset_flag_narrows_the_run() {
        let config = SyncConfig {
            dashboards: true,
            ..SyncConfig::default()
        };
        assert!(config.sync_dashboards());
        assert!(!config.sync_provisioning());

        let config = SyncConfig {
            provisioning: true,
            ..SyncConfig::default()
        };
        assert!(!config.sync_dashboards());
        assert!(config.sync_provisioning());
    }

    #[test]
    fn both_subset_flags_sync_everything() {
        let config = SyncConfig {
            dashboards: true,
            provisioning: true,
            ..SyncConfig::default()
        };
        assert!(config.sync_dashboards());
        assert!(config.sync_provisioning());
    }

    #[test]
    fn copy_tree_renders_scp_invocation() {
        let cmd = SyncCommand::CopyTree {
            src: PathBuf::from("/tmp/grafana/dashboards"),
            target: "jose@192.168.12.221:/home/jose/grafana_lmi/grafana_lmi/".to_string(),
        };
        assert_eq!(
            cmd.to_string(),
            "scp -r /tmp/grafana/dashboards jose@192.168.12.221:/home/jose/grafana_lmi/grafana_lmi/"
        );
    }

    #[test]
    fn restart_renders_ssh_docker_invocation() {
        let cmd = SyncCommand::Restart {
            login: "jose@192.168.12.221".to_string(),
            service: "grafana".to_string(),
        };
        assert_eq!(cmd.to_string(), "ssh jose@192.168.12.221 docker restart grafana");
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = SyncCommand::CopyTree {
            src: PathBuf::from("/tmp/my dashboards"),
            target: "jose@host:/dest/".to_string(),
        };
        assert_eq!(cmd.to_string(), "scp -r '/tmp/my dashboards' jose@host:/dest/");
    }

    #[test]
    fn shell_quote_escapes_embedded_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
