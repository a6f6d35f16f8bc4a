use anyhow::Result;
use clap::Parser;
use tracing::error;

use retrace::{utils, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    match retrace::run(&args) {
        Ok(report) => {
            println!("{report}");
            Ok(())
        }
        Err(e) => {
            error!(action = "abort", component = "main", error = %e, "Query failed");
            std::process::exit(1);
        }
    }
}
