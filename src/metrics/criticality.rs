//! Dead-man-switch criticality scoring.
//!
//! Ranks people by the organizational damage their removal would cause:
//! centrality combined with a removal-simulation redundancy measure. The
//! redundancy heuristic is intentionally the simple one: single-node
//! removal followed by largest weakly-connected component size.

use crate::config::ConfigError;
use crate::graph::{CommGraph, MetricKind, PersonId};
use orgnet_graph_algorithms::weakly_connected_components;
use rayon::prelude::*;
use tracing::debug;

/// Criticality score weights.
#[derive(Debug, Clone)]
pub struct CriticalityConfig {
    pub betweenness_weight: f64,
    pub eigenvector_weight: f64,
    pub redundancy_weight: f64,
}

impl Default for CriticalityConfig {
    fn default() -> Self {
        Self {
            betweenness_weight: 0.4,
            eigenvector_weight: 0.3,
            redundancy_weight: 0.3,
        }
    }
}

impl CriticalityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let components = [
            ("criticality betweenness", self.betweenness_weight),
            ("criticality eigenvector", self.eigenvector_weight),
            ("criticality redundancy", self.redundancy_weight),
        ];
        for (name, value) in components {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        let sum: f64 = components.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSumMismatch {
                group: "criticality",
                expected: 1.0,
                actual: sum,
            });
        }
        Ok(())
    }
}

/// Per-person criticality view, recomputed each run.
#[derive(Debug, Clone)]
pub struct CriticalityRecord {
    pub id: PersonId,
    pub email: String,
    pub name: String,
    /// Composite dead-man-switch score
    pub score: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    /// Fraction of the remaining graph still in the largest component after
    /// removing this person; high redundancy = less critical
    pub redundancy: f64,
    /// Percent of the organization cut off by the removal
    pub impact_pct: f64,
}

/// Score and rank every person by simulated-removal impact.
///
/// `dms = w1·norm(betweenness) + w2·norm(eigenvector) − w3·redundancy`,
/// sorted descending. Centrality inputs are read from the metric table and
/// normalized by the graph maximum. Each removal simulation runs on its own
/// edge-filtered view; the shared graph is never mutated. Graphs with zero
/// or one node yield an empty result.
pub fn compute_criticality(
    graph: &mut CommGraph,
    config: &CriticalityConfig,
) -> Vec<CriticalityRecord> {
    let n = graph.node_count();
    if n <= 1 {
        return Vec::new();
    }

    let betweenness: Vec<f64> = graph
        .people()
        .iter()
        .map(|p| p.metric(MetricKind::BetweennessCentrality))
        .collect();
    let eigenvector: Vec<f64> = graph
        .people()
        .iter()
        .map(|p| p.metric(MetricKind::EigenvectorCentrality))
        .collect();

    let max_betweenness = betweenness.iter().cloned().fold(0.0f64, f64::max);
    let max_eigenvector = eigenvector.iter().cloned().fold(0.0f64, f64::max);

    // Each simulation gets an isolated copy of the topology; results merge
    // by node index.
    let shared: &CommGraph = graph;
    let redundancy: Vec<f64> = (0..n)
        .into_par_iter()
        .map(|idx| {
            let excluded = PersonId::new(idx as u32);
            let view = shared.view_excluding(excluded);
            let wcc = weakly_connected_components(&view);
            let largest_remaining = wcc
                .components
                .iter()
                .filter(|members| !(members.len() == 1 && members[0] == idx))
                .map(|members| members.len())
                .max()
                .unwrap_or(0);
            largest_remaining as f64 / (n - 1) as f64
        })
        .collect();

    let mut records: Vec<CriticalityRecord> = graph
        .people()
        .iter()
        .map(|person| {
            let idx = person.id.index();
            let norm_betweenness = if max_betweenness > 0.0 {
                betweenness[idx] / max_betweenness
            } else {
                0.0
            };
            let norm_eigenvector = if max_eigenvector > 0.0 {
                eigenvector[idx] / max_eigenvector
            } else {
                0.0
            };
            let score = config.betweenness_weight * norm_betweenness
                + config.eigenvector_weight * norm_eigenvector
                - config.redundancy_weight * redundancy[idx];

            CriticalityRecord {
                id: person.id,
                email: person.email.clone(),
                name: person.name.clone(),
                score,
                betweenness: betweenness[idx],
                eigenvector: eigenvector[idx],
                redundancy: redundancy[idx],
                impact_pct: (1.0 - redundancy[idx]) * 100.0,
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.email.cmp(&b.email))
    });

    for record in &records {
        graph
            .person_mut(record.id)
            .set_metric(MetricKind::Criticality, record.score);
    }

    debug!(ranked = records.len(), "criticality scores computed");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::{build_graph, BuilderConfig};
    use crate::graph::{compute_weights, WeightConfig};
    use crate::message::Message;
    use crate::metrics::centrality::compute_centrality;

    fn star_graph(leaves: usize) -> CommGraph {
        let mut messages = Vec::new();
        for leaf in 0..leaves {
            let leaf_addr = format!("leaf{leaf}@x.com");
            for _ in 0..3 {
                messages.push(Message::new("m", "center@x.com", vec![leaf_addr.clone()]));
                messages.push(Message::new("m", leaf_addr.clone(), vec!["center@x.com".into()]));
            }
        }
        let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        compute_weights(&mut graph, &WeightConfig::default());
        compute_centrality(&mut graph);
        graph
    }

    #[test]
    fn test_star_center_ranked_first() {
        let mut graph = star_graph(4);
        let records = compute_criticality(&mut graph, &CriticalityConfig::default());

        assert_eq!(records[0].email, "center@x.com");
        // Removing the center shatters the star
        assert_eq!(records[0].redundancy, 1.0 / 4.0);
        assert_eq!(records[0].impact_pct, 75.0);
    }

    #[test]
    fn test_leaf_removal_is_redundant() {
        let mut graph = star_graph(4);
        let records = compute_criticality(&mut graph, &CriticalityConfig::default());

        let leaf = records.iter().find(|r| r.email != "center@x.com").unwrap();
        assert_eq!(leaf.redundancy, 1.0);
        assert_eq!(leaf.impact_pct, 0.0);
    }

    #[test]
    fn test_sorted_descending() {
        let mut graph = star_graph(5);
        let records = compute_criticality(&mut graph, &CriticalityConfig::default());
        for pair in records.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_degenerate_graphs_yield_empty() {
        let mut empty = CommGraph::new();
        assert!(compute_criticality(&mut empty, &CriticalityConfig::default()).is_empty());

        let mut single = CommGraph::new();
        single.intern_person("only@x.com", "Only");
        assert!(compute_criticality(&mut single, &CriticalityConfig::default()).is_empty());
    }

    #[test]
    fn test_config_validation() {
        assert!(CriticalityConfig::default().validate().is_ok());
        let bad = CriticalityConfig {
            betweenness_weight: 0.9,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::WeightSumMismatch { .. })
        ));
    }
}
