//! CLI command implementations.

use chrono::Utc;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use modelrank_core::{ArtifactTable, InfluenceConfig};
use modelrank_graph::{GraphError, GraphStore, ModelGraph, PropagationEngine, RankedEntry};
use std::fs;
use std::path::Path;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Run influence propagation over a serialized graph.
#[allow(clippy::too_many_arguments)]
pub fn rank(
    graph_path: &Path,
    artifacts_path: Option<&Path>,
    config_path: Option<&Path>,
    tol: Option<f64>,
    max_iter: Option<usize>,
    top: usize,
    snapshot_dir: Option<&Path>,
    store_path: Option<&Path>,
) -> Result<()> {
    let mut graph: ModelGraph = serde_json::from_str(&fs::read_to_string(graph_path)?)?;

    let table: ArtifactTable = match artifacts_path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => ArtifactTable::new(),
    };

    // A config file pins everything including the reference instant;
    // without one, ages are measured against the current time.
    let mut config: InfluenceConfig = match config_path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => InfluenceConfig {
            as_of: Utc::now().naive_utc(),
            ..InfluenceConfig::default()
        },
    };
    if let Some(tol) = tol {
        config.tol = tol;
    }
    if let Some(max_iter) = max_iter {
        config.max_iter = max_iter;
    }

    let engine = PropagationEngine::new(config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Propagating influence...");

    let outcome = match snapshot_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let mut write_error: Option<std::io::Error> = None;
            let mut observer = |iteration: usize, snapshot: &[RankedEntry]| {
                if write_error.is_some() {
                    return;
                }
                if let Err(e) = write_snapshot(dir, iteration, snapshot) {
                    write_error = Some(e);
                }
            };
            let outcome = engine.run_observed(&mut graph, &table, Some(&mut observer))?;
            if let Some(e) = write_error {
                return Err(e.into());
            }
            outcome
        }
        None => engine.run(&mut graph, &table)?,
    };

    spinner.finish_and_clear();

    if outcome.converged {
        println!(
            "{} Converged after {} iterations (final diff {:.3e})",
            "✓".green(),
            outcome.iterations.to_string().cyan(),
            outcome.final_diff
        );
    } else {
        println!(
            "{} Iteration budget of {} exhausted (final diff {:.3e}); result is best-effort",
            "⚠".yellow(),
            outcome.iterations.to_string().cyan(),
            outcome.final_diff
        );
    }

    let ranking = modelrank_graph::rank(&graph);
    println!("\nTop {} of {} models:\n", top.min(ranking.len()), ranking.len());
    for (position, entry) in ranking.iter().take(top).enumerate() {
        println!(
            "  {:>3}. {} {}",
            position + 1,
            format!("{:>12.4}", entry.influence).yellow(),
            entry.id.cyan()
        );
    }

    if let Some(path) = store_path {
        GraphStore::open(path)?.save_graph(&graph)?;
        println!("\n{} Scored graph saved to {}", "✓".green(), path.display());
    }

    Ok(())
}

fn write_snapshot(dir: &Path, iteration: usize, snapshot: &[RankedEntry]) -> std::io::Result<()> {
    let mut lines = String::new();
    for entry in snapshot {
        lines.push_str(&format!("{}: {}\n", entry.id, entry.influence));
    }
    fs::write(dir.join(format!("iteration_{}.txt", iteration)), lines)
}

/// Export the ranking or the full graph from a scored store.
pub fn export(store_path: &Path, output: &Path, json: bool, full: bool) -> Result<()> {
    let store = GraphStore::open(store_path)?;
    let graph = store
        .load_graph()?
        .ok_or(GraphError::MissingInput("store contains no graph"))?;

    if full {
        let nodes: Vec<_> = graph.nodes().collect();
        let export = serde_json::json!({
            "version": "1.0",
            "stats": graph.stats(),
            "nodes": nodes,
            "edges": graph.export_edges(),
        });
        fs::write(output, serde_json::to_string_pretty(&export)?)?;
    } else {
        let ranking = modelrank_graph::rank(&graph);
        if json {
            fs::write(output, serde_json::to_string_pretty(&ranking)?)?;
        } else {
            let mut lines = String::new();
            for entry in &ranking {
                lines.push_str(&format!("{}: {}\n", entry.id, entry.influence));
            }
            fs::write(output, lines)?;
        }
    }

    println!("{} Exported to {}", "✓".green(), output.display());
    Ok(())
}

/// Show statistics for a stored graph.
pub fn status(store_path: &Path) -> Result<()> {
    let store = GraphStore::open(store_path)?;
    let graph = store
        .load_graph()?
        .ok_or(GraphError::MissingInput("store contains no graph"))?;

    let stats = graph.stats();
    println!("{}", "Graph status".cyan());
    println!("  models:  {}", stats.node_count.to_string().cyan());
    println!("  edges:   {}", stats.edge_count.to_string().cyan());
    println!("  authors: {}", stats.authors.to_string().cyan());

    let ranking = modelrank_graph::rank(&graph);
    if let Some(leader) = ranking.first() {
        println!(
            "  leader:  {} ({:.4})",
            leader.id.cyan(),
            leader.influence
        );
    }

    Ok(())
}
