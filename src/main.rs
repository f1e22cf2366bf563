//! Point Ledger CLI
//!
//! Replays a CSV log of point charge/use operations through the ledger and
//! prints the resulting balances or history to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --report history operations.csv > history.csv
//! RUST_LOG=info cargo run -- --batch-size 2000 --max-concurrent 8 operations.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (individual rejected operations are logged, not fatal)
//! - 1: Error (missing arguments, file not found, unreadable input, etc.)

use point_ledger::cli;
use point_ledger::replay::Replayer;
use std::process;

fn main() {
    let args = cli::parse_args();
    cli::init_tracing();

    let replayer = Replayer::new(args.to_replay_config());

    let mut output = std::io::stdout();
    if let Err(e) = replayer.run(&args.input_file, args.report, &mut output) {
        tracing::error!(error = %e, "replay failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
