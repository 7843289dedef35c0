//! archgraph CLI - architecture graphs from source code.
//!
//! Usage:
//!   archgraph collect <dir>                      # Analyze and write architecture.yaml
//!   archgraph collect <dir> -o graph.yaml        # Custom output file
//!   archgraph collect <dir> --format json        # JSON document instead of YAML

use archgraph::cli::{run, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
