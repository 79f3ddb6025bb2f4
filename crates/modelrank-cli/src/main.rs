//! Modelrank CLI - Command-line interface for Modelrank
//!
//! This is the entry point for scoring an already-built model
//! derivation graph: run influence propagation, inspect the ranking,
//! and persist the scored graph for downstream consumers.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "modelrank")]
#[command(author = "Modelrank Contributors")]
#[command(version)]
#[command(about = "Influence scoring for model derivation graphs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run influence propagation over a graph and print the ranking
    Rank {
        /// Serialized model graph (JSON)
        graph: PathBuf,

        /// Auxiliary-artifact table (JSON)
        #[arg(short, long)]
        artifacts: Option<PathBuf>,

        /// Engine configuration (JSON); missing fields use defaults.
        /// Without this, ages are measured against the current time.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the convergence tolerance
        #[arg(long)]
        tol: Option<f64>,

        /// Override the iteration budget
        #[arg(long)]
        max_iter: Option<usize>,

        /// Number of ranking rows to print
        #[arg(short, long, default_value = "20")]
        top: usize,

        /// Directory for per-iteration ranked snapshots
        #[arg(long)]
        snapshots: Option<PathBuf>,

        /// Persist the scored graph to this store
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Export the ranking (or the full graph) from a scored store
    Export {
        /// Store holding the scored graph
        store: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "ranking.txt")]
        output: PathBuf,

        /// Write JSON instead of plain text
        #[arg(long)]
        json: bool,

        /// Export the full graph (nodes and edges) instead of the ranking
        #[arg(long)]
        full: bool,
    },

    /// Show statistics for a stored graph
    Status {
        /// Store holding the scored graph
        store: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Rank {
            graph,
            artifacts,
            config,
            tol,
            max_iter,
            top,
            snapshots,
            store,
        } => commands::rank(
            &graph,
            artifacts.as_deref(),
            config.as_deref(),
            tol,
            max_iter,
            top,
            snapshots.as_deref(),
            store.as_deref(),
        ),
        Commands::Export {
            store,
            output,
            json,
            full,
        } => commands::export(&store, &output, json, full),
        Commands::Status { store } => commands::status(&store),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
