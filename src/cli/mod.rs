//! CLI for archgraph.
//!
//! One command today:
//! - `collect <dir>`: analyze a source tree and write the graph document.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::analyzer;
use crate::model::Graph;
use crate::parser::SourceLanguage;

#[derive(Parser)]
#[command(name = "archgraph")]
#[command(about = "Build architecture graphs from source code")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect architecture from source code
    Collect {
        /// Directory of the source tree to analyze
        dir: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "architecture.yaml")]
        output: PathBuf,

        /// Programming language (go)
        #[arg(short, long, default_value = "go")]
        language: String,

        /// Serialization format for the graph document
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Collect {
            dir,
            output,
            language,
            format,
        } => collect(dir, output, &language, format),
    }
}

fn collect(dir: PathBuf, output: PathBuf, language: &str, format: OutputFormat) -> Result<()> {
    if !dir.exists() {
        bail!("directory does not exist: {}", dir.display());
    }

    let language: SourceLanguage = language.parse()?;
    println!(
        "Analyzing code: {} (language: {})",
        dir.display(),
        language.name()
    );

    let graph = analyzer::analyze(&dir, language).context("analysis failed")?;
    print_stats(&graph);

    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&graph).context("failed to serialize YAML")?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&graph).context("failed to serialize JSON")?
        }
    };
    fs::write(&output, rendered)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Graph saved to {}", output.display());
    Ok(())
}

fn print_stats(graph: &Graph) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for node in &graph.nodes {
        *counts.entry(node.entity.to_string()).or_default() += 1;
    }

    println!("Found components: {}", graph.nodes.len());
    for (entity, count) in counts {
        println!("  - {entity}: {count}");
    }
    println!("Found links: {}", graph.edges.len());
}
