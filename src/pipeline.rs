//! Batch analytics pipeline.
//!
//! Single-pass orchestrator: build → weigh → enrich → re-weigh → centrality
//! → communities → criticality / waste / health. Each stage runs to
//! completion before the next, because later stages need the fully weighted,
//! fully enriched graph. The whole run is in-memory; outputs are snapshot
//! structs handed to external consumers.

use crate::config::{AnalyticsConfig, ConfigError};
use crate::graph::{build_graph, compute_weights, CommGraph, GraphError};
use crate::message::Message;
use crate::metrics::{
    compute_centrality, compute_criticality, compute_health, compute_waste, detect_communities,
    CommunityReport, CriticalityRecord, HealthReport, WasteRecord,
};
use crate::sentiment::{enrich_graph, sentiment_summary, SentimentLexicon, SentimentSummary};
use crate::snapshot::{CommunitySnapshot, GraphSnapshot, MetricsBundle, PersonProfile};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

/// Everything one pipeline run produces. The graph carries the per-person
/// metric tables; the remaining fields are the derived reports.
pub struct AnalysisBundle {
    pub graph: CommGraph,
    pub communities: CommunityReport,
    pub criticality: Vec<CriticalityRecord>,
    pub waste: Vec<WasteRecord>,
    pub health: HealthReport,
    pub sentiment: SentimentSummary,
}

impl AnalysisBundle {
    /// Node and edge lists with rounded metric fields.
    pub fn graph_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::from_graph(&self.graph)
    }

    /// Community partition, bridge nodes and modularity.
    pub fn community_snapshot(&self) -> CommunitySnapshot {
        CommunitySnapshot::from_report(&self.graph, &self.communities)
    }

    /// Health, top-20 criticality/waste and per-centrality rankings.
    pub fn metrics_bundle(&self) -> MetricsBundle {
        MetricsBundle::new(&self.graph, &self.health, &self.criticality, &self.waste)
    }

    /// Profile for one person, `None` when the address has no node.
    pub fn person_profile(&self, email: &str) -> Option<PersonProfile> {
        PersonProfile::build(&self.graph, email, &self.criticality, &self.waste)
    }
}

/// Run the full analytics pipeline over a parsed message corpus.
///
/// The configuration is validated before any computation begins. Degenerate
/// corpora (empty, or nothing clearing the edge threshold) produce a
/// well-formed bundle with zero/neutral scores rather than an error.
pub fn run_pipeline(
    messages: &[Message],
    config: &AnalyticsConfig,
) -> Result<AnalysisBundle, PipelineError> {
    config.validate()?;
    let started = Instant::now();

    info!(messages = messages.len(), "building communication graph");
    let mut graph = build_graph(messages, &config.builder)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph built"
    );

    compute_weights(&mut graph, &config.weights);

    info!("running sentiment enrichment");
    let lexicon = SentimentLexicon::default();
    enrich_graph(&mut graph, messages, &lexicon);
    let sentiment = sentiment_summary(&graph);
    info!(avg_sentiment = sentiment.avg_sentiment, "sentiment enriched");

    // Second weight pass folds the real sentiment into the composite.
    compute_weights(&mut graph, &config.weights);

    info!("computing centrality metrics");
    compute_centrality(&mut graph);

    info!("detecting communities");
    let communities = detect_communities(&mut graph);
    info!(
        communities = communities.communities.len(),
        modularity = communities.modularity,
        "communities detected"
    );

    info!("computing criticality scores");
    let criticality = compute_criticality(&mut graph, &config.criticality);

    info!("computing waste metrics");
    let waste = compute_waste(&mut graph, messages, &config.waste);

    info!("computing organizational health");
    let health = compute_health(&graph, Some(&communities), &config.health);
    info!(
        score = health.score,
        grade = health.grade,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "pipeline complete"
    );

    Ok(AnalysisBundle {
        graph,
        communities,
        criticality,
        waste,
        health,
        sentiment,
    })
}
