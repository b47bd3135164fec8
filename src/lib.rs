//! Orgnet: organizational communication graph analytics.
//!
//! Turns a corpus of parsed message records into a weighted directed
//! communication graph and derived analytics: centrality rankings, community
//! structure with heuristic labels, a dead-man-switch criticality score,
//! communication-waste indicators, sentiment enrichment, and an aggregate
//! organizational health score.
//!
//! # Architecture
//!
//! The core is a batch pipeline over an arena-style graph store; pure
//! topology algorithms live in the `orgnet-graph-algorithms` crate and run
//! over a dense CSR view. Message parsing, the HTTP API and file export are
//! external collaborators: the core consumes [`message::Message`] records
//! and produces the snapshot bundles in [`snapshot`].
//!
//! # Example
//!
//! ```rust
//! use orgnet::config::AnalyticsConfig;
//! use orgnet::message::Message;
//! use orgnet::pipeline::run_pipeline;
//!
//! let mut messages = Vec::new();
//! for _ in 0..3 {
//!     messages.push(Message::new("m1", "ana@corp.com", vec!["bo@corp.com".into()]));
//!     messages.push(Message::new("m2", "bo@corp.com", vec!["ana@corp.com".into()]));
//! }
//!
//! let bundle = run_pipeline(&messages, &AnalyticsConfig::default()).unwrap();
//! assert_eq!(bundle.graph.node_count(), 2);
//! assert_eq!(bundle.graph.edge_count(), 2);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod message;
pub mod metrics;
pub mod pipeline;
pub mod sentiment;
pub mod snapshot;

// Re-export main types for convenience
pub use config::{AnalyticsConfig, ConfigError};
pub use graph::{
    build_graph, compute_weights, extract_display_name, BuilderConfig, CommGraph,
    CommunicationEdge, EdgeId, GraphError, GraphResult, MetricKind, Person, PersonId, WeightConfig,
};
pub use message::Message;
pub use metrics::{
    compute_centrality, compute_criticality, compute_health, compute_waste, detect_communities,
    Community, CommunityReport, CriticalityConfig, CriticalityRecord, HealthConfig, HealthReport,
    WasteConfig, WasteRecord,
};
pub use pipeline::{run_pipeline, AnalysisBundle, PipelineError};
pub use sentiment::{enrich_graph, sentiment_summary, SentimentLexicon, SentimentSummary};
pub use snapshot::{CommunitySnapshot, GraphSnapshot, MetricsBundle, PersonProfile};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
