//! dashmig CLI — v5 dashboard migration and provisioning sync.
//!
//! Commands: rewrite (migrate JSONPaths in dashboard files in place),
//! sync (push dashboards/provisioning trees to the server).

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use dashmig_core::{process_dir, Outcome, RunSummary};
use dashmig_sync::{execute, plan, DryRunner, ProcessRunner, SyncConfig};

#[derive(Parser)]
#[command(name = "dashmig")]
#[command(version)]
#[command(about = "Dashboard JSONPath migration and provisioning sync for the v5 snapshot schema")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite dashboard JSONPaths in place for the v5 snapshot schema
    Rewrite {
        /// Directory containing the dashboard .json files
        #[arg(default_value = "grafana/dashboards")]
        dir: PathBuf,
    },
    /// Sync dashboards and provisioning files to the server
    Sync(SyncArgs),
}

#[derive(Args)]
struct SyncArgs {
    /// SSH host or IP
    #[arg(long, default_value = "192.168.12.221")]
    host: String,
    /// SSH user
    #[arg(long, default_value = "jose")]
    user: String,
    /// Destination directory on the server
    #[arg(long, default_value = "/home/jose/grafana_lmi/grafana_lmi")]
    dest: String,
    /// Local directory containing dashboards/ and provisioning/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,
    /// Sync dashboards only
    #[arg(long)]
    dashboards: bool,
    /// Sync provisioning only
    #[arg(long)]
    provisioning: bool,
    /// Restart the dashboard service after sync
    #[arg(long)]
    restart: bool,
    /// Print commands without executing
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Rewrite { dir } => run_rewrite(&dir),
        Commands::Sync(args) => run_sync(args),
    };
    std::process::exit(code);
}

fn run_rewrite(dir: &Path) -> i32 {
    let summary = match process_dir(dir) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return 1;
        }
    };

    println!(
        "Found {} dashboard files in {}\n",
        summary.reports.len(),
        dir.display()
    );
    print_reports(&summary);
    println!(
        "\nDone: {} total replacements across {} files",
        summary.total_replacements, summary.files_changed
    );
    0
}

fn print_reports(summary: &RunSummary) {
    for report in &summary.reports {
        let class = report.classification.to_string();
        match &report.outcome {
            Outcome::Changed => println!(
                "  [{class:6}] {:45}  {:3} replacements",
                report.name, report.replacements
            ),
            Outcome::Unchanged => println!(
                "  [{class:6}] {:45}  {:3} replacements (unchanged)",
                report.name, report.replacements
            ),
            Outcome::SkippedInvalid(_) => println!(
                "  [{class:6}] {:45}  skipped (invalid JSON after rewrite)",
                report.name
            ),
        }
    }
}

fn run_sync(args: SyncArgs) -> i32 {
    let config = SyncConfig {
        host: args.host,
        user: args.user,
        dest: args.dest,
        base_dir: args.base_dir,
        dashboards: args.dashboards,
        provisioning: args.provisioning,
        restart: args.restart,
        dry_run: args.dry_run,
    };

    let commands = match plan(&config) {
        Ok(commands) => commands,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return 1;
        }
    };

    let result = if config.dry_run {
        execute(&mut DryRunner, &commands)
    } else {
        execute(&mut ProcessRunner, &commands)
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Command failed: {e}");
            e.exit_code()
        }
    }
}
