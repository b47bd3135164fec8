//! Demo pipeline driver: load a JSONL message corpus, run the analytics
//! pipeline, and export the snapshot bundles as JSON files (playing the
//! role of the external exporter).

use anyhow::{bail, Context, Result};
use orgnet::config::AnalyticsConfig;
use orgnet::message::Message;
use orgnet::pipeline::run_pipeline;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Orgnet Communication Analytics v{}", orgnet::version());
    println!("==========================================");
    println!();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("usage: orgnet <messages.jsonl> [output-dir]");
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "output".to_string()));

    let messages = load_messages(Path::new(&input))?;
    println!("Loaded {} messages from {input}", messages.len());

    let config = AnalyticsConfig::default();
    let bundle = run_pipeline(&messages, &config)?;

    println!();
    println!("Graph:       {} people, {} edges", bundle.graph.node_count(), bundle.graph.edge_count());
    println!(
        "Communities: {} (modularity {:.4})",
        bundle.communities.communities.len(),
        bundle.communities.modularity
    );
    println!("Sentiment:   {:.4} average", bundle.sentiment.avg_sentiment);
    println!(
        "Health:      {:.1}/100 (Grade {})",
        bundle.health.score, bundle.health.grade
    );
    if let Some(top) = bundle.criticality.first() {
        println!("Most critical person: {} ({:.4})", top.name, top.score);
    }

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output dir {}", output_dir.display()))?;
    write_json(&output_dir.join("graph.json"), &bundle.graph_snapshot())?;
    write_json(&output_dir.join("communities.json"), &bundle.community_snapshot())?;
    write_json(&output_dir.join("metrics.json"), &bundle.metrics_bundle())?;
    write_json(&output_dir.join("sentiment.json"), &bundle.sentiment)?;

    println!();
    println!("✅ Snapshots written to {}", output_dir.display());
    Ok(())
}

/// Read one JSON message record per line, skipping lines that fail to parse.
fn load_messages(path: &Path) -> Result<Vec<Message>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut messages = Vec::new();
    let mut bad_lines = 0u64;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Message>(&line) {
            Ok(message) => messages.push(message),
            Err(_) => bad_lines += 1,
        }
    }
    if bad_lines > 0 {
        eprintln!("Skipped {bad_lines} unparseable lines");
    }
    Ok(messages)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    println!("  wrote {}", path.display());
    Ok(())
}
