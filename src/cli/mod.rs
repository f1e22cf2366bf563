// CLI module
// Command-line interface, argument parsing and log setup

mod args;

pub use args::{CliArgs, ReportKind};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints a message and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install a stderr log subscriber filtered by `RUST_LOG` (default: `warn`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
