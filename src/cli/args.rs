use crate::replay::ReplayConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay a point ledger operation log
#[derive(Parser, Debug)]
#[command(name = "point-ledger")]
#[command(about = "Replay point charge/use operations and report balances or history", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing `op,user,amount` rows
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Which report to write to stdout
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "balances",
        help = "Report to print: 'balances' or 'history'"
    )]
    pub report: ReportKind,

    /// Number of operations per batch
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of users processed concurrently
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Worker threads processing users in parallel (default: CPU cores)"
    )]
    pub max_concurrent_users: Option<usize>,
}

/// Reports the replay can produce
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Balances,
    History,
}

impl CliArgs {
    /// Build a ReplayConfig, using defaults for anything not given
    pub fn to_replay_config(&self) -> ReplayConfig {
        if self.batch_size.is_some() || self.max_concurrent_users.is_some() {
            let default = ReplayConfig::default();
            ReplayConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_users
                    .unwrap_or(default.max_concurrent_users),
            )
        } else {
            ReplayConfig::default()
        }
    }
}
