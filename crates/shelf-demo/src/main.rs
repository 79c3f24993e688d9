#![forbid(unsafe_code)]

//! Shelfwise demo binary entry point.

use shelf_demo::cli;
use shelf_demo::simulation;
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();

    let filter = EnvFilter::try_from_env("SHELF_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match simulation::run(&opts) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            eprintln!("Simulation failed: {e}");
            std::process::exit(1);
        }
    }
}
