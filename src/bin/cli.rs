//! uiflow CLI - data-flow diagrams for UI components.
//!
//! Usage:
//!   uiflow build <analysis.json>          # Build DFD, print JSON
//!   uiflow build <analysis.json> -o out   # Build DFD to a file
//!   uiflow stats <analysis.json>          # Node/edge statistics
//!   uiflow deps <analysis.json> <label>   # Dependents + dependencies

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use uiflow::{ComponentAnalysis, DfdBuilder, DfdGraph, DfdSourceData};

#[derive(Parser)]
#[command(name = "uiflow")]
#[command(about = "Build data-flow diagrams from UI component analyses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the DFD for an analysis file and emit it as JSON
    Build {
        /// Path to a component analysis JSON file
        analysis: PathBuf,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show node/edge statistics for an analysis file
    Stats {
        /// Path to a component analysis JSON file
        analysis: PathBuf,
    },

    /// Show dependents and dependencies of a labeled node
    Deps {
        /// Path to a component analysis JSON file
        analysis: PathBuf,

        /// Node label to query (variable, process, or element label)
        label: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            analysis,
            output,
            pretty,
        } => {
            let dfd = build(&analysis)?;
            let json = if pretty {
                serde_json::to_string_pretty(&dfd)?
            } else {
                serde_json::to_string(&dfd)?
            };
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Commands::Stats { analysis } => {
            let dfd = build(&analysis)?;
            let stats = DfdGraph::from_source(&dfd).stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Deps { analysis, label } => {
            let dfd = build(&analysis)?;
            let graph = DfdGraph::from_source(&dfd);
            if graph.find(&label).is_empty() {
                anyhow::bail!("no node labeled '{label}'");
            }
            println!("dependents of {label}:");
            for dep in graph.dependents(&label) {
                println!("  {} ({}) [{}]", dep.label, dep.kind, dep.relation);
            }
            println!("dependencies of {label}:");
            for dep in graph.dependencies(&label) {
                println!("  {} ({}) [{}]", dep.label, dep.kind, dep.relation);
            }
        }
    }
    Ok(())
}

fn build(path: &PathBuf) -> Result<DfdSourceData> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let analysis: ComponentAnalysis =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(DfdBuilder::new().build(&analysis))
}
