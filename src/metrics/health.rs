//! Organizational health aggregation.
//!
//! Combines connectivity, bottleneck risk, silo structure and efficiency
//! into a single 0–100 score with a letter grade, plus the graph statistics
//! the exported metrics bundle carries.

use super::community::CommunityReport;
use crate::config::ConfigError;
use crate::graph::{CommGraph, MetricKind};
use orgnet_graph_algorithms::{
    average_clustering, average_shortest_path_length, weakly_connected_components,
};
use tracing::debug;

/// Health sub-score weights.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub connectivity_weight: f64,
    pub bottleneck_weight: f64,
    pub silo_weight: f64,
    pub efficiency_weight: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            connectivity_weight: 0.25,
            bottleneck_weight: 0.25,
            silo_weight: 0.25,
            efficiency_weight: 0.25,
        }
    }
}

impl HealthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let components = [
            ("connectivity", self.connectivity_weight),
            ("bottleneck", self.bottleneck_weight),
            ("silo", self.silo_weight),
            ("efficiency", self.efficiency_weight),
        ];
        for (name, value) in components {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        let sum: f64 = components.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSumMismatch {
                group: "health",
                expected: 1.0,
                actual: sum,
            });
        }
        Ok(())
    }
}

/// The four health components, each in [0, 1]. Bottleneck risk and silo
/// score contribute inverted: higher risk/silo means lower health.
#[derive(Debug, Clone, Default)]
pub struct SubScores {
    pub connectivity: f64,
    pub bottleneck_risk: f64,
    pub silo_score: f64,
    pub efficiency: f64,
}

/// Whole-graph statistics attached to the metrics bundle.
#[derive(Debug, Clone, Default)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    /// Undefined (None) when the giant component has fewer than two nodes
    pub avg_path_length: Option<f64>,
    pub clustering_coefficient: f64,
    pub community_count: usize,
    pub modularity: f64,
    pub giant_component_ratio: f64,
}

/// Aggregate health result.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Final score in [0, 100]
    pub score: f64,
    /// A / B / C / D / F
    pub grade: &'static str,
    pub sub_scores: SubScores,
    pub stats: GraphStats,
}

/// Compute the aggregate organizational health score.
///
/// Graphs with fewer than two nodes short-circuit to score 0, grade F, with
/// zeroed connectivity/efficiency and maximal bottleneck/silo risk.
pub fn compute_health(
    graph: &CommGraph,
    communities: Option<&CommunityReport>,
    config: &HealthConfig,
) -> HealthReport {
    let n = graph.node_count();
    let e = graph.edge_count();

    if n < 2 {
        return HealthReport {
            score: 0.0,
            grade: "F",
            sub_scores: SubScores {
                connectivity: 0.0,
                bottleneck_risk: 1.0,
                silo_score: 1.0,
                efficiency: 0.0,
            },
            stats: GraphStats {
                node_count: n,
                edge_count: e,
                community_count: communities.map_or(0, |c| c.communities.len()),
                modularity: communities.map_or(0.0, |c| c.modularity),
                ..Default::default()
            },
        };
    }

    // Connectivity: log-scaled density plus giant-component coverage.
    // Real-world communication graphs are extremely sparse, so raw density
    // is rescaled: density 0.01 → ~0.15, 0.1 → ~0.5, 1.0 → 1.0.
    let density = graph.density();
    let directed = graph.view(false);
    let wcc = weakly_connected_components(&directed);
    let giant = wcc
        .components
        .iter()
        .max_by_key(|members| members.len())
        .cloned()
        .unwrap_or_default();
    let giant_ratio = giant.len() as f64 / n as f64;
    let density_score = if density > 0.0 {
        ((density * 100.0 + 1.0).log10() / 2.0).min(1.0)
    } else {
        0.0
    };
    let connectivity = 0.4 * density_score + 0.6 * giant_ratio;

    // Bottleneck risk: concentration of betweenness
    let betweenness: Vec<f64> = graph
        .people()
        .iter()
        .map(|p| p.metric(MetricKind::BetweennessCentrality))
        .collect();
    let max_betweenness = betweenness.iter().cloned().fold(0.0f64, f64::max);
    let bottleneck_risk = 0.5 * max_betweenness + 0.5 * gini(&betweenness);

    // Silo score: share of edges staying inside their community
    let silo_score = match communities {
        Some(report) if !report.communities.is_empty() => {
            let inter = graph
                .edges()
                .iter()
                .filter(|edge| {
                    graph.person(edge.source).community != graph.person(edge.target).community
                })
                .count();
            if e > 0 {
                1.0 - inter as f64 / e as f64
            } else {
                1.0
            }
        }
        _ => 0.5,
    };

    // Efficiency: short paths and local clustering on the undirected
    // projection; path length is measured over the giant component only.
    let undirected = graph.undirected_view(false);
    let avg_path = average_shortest_path_length(&undirected, &giant);
    let path_score = avg_path
        .map(|length| (1.0 - (length - 2.0) / 8.0).clamp(0.0, 1.0))
        .unwrap_or(0.5);
    let clustering = average_clustering(&undirected);
    let efficiency = 0.6 * path_score + 0.4 * clustering;

    let raw = config.connectivity_weight * connectivity
        + config.bottleneck_weight * (1.0 - bottleneck_risk)
        + config.silo_weight * (1.0 - silo_score)
        + config.efficiency_weight * efficiency;
    let score = (raw * 100.0).clamp(0.0, 100.0);

    let report = HealthReport {
        score,
        grade: grade(score),
        sub_scores: SubScores {
            connectivity,
            bottleneck_risk,
            silo_score,
            efficiency,
        },
        stats: GraphStats {
            node_count: n,
            edge_count: e,
            density,
            avg_path_length: avg_path,
            clustering_coefficient: clustering,
            community_count: communities.map_or(0, |c| c.communities.len()),
            modularity: communities.map_or(0.0, |c| c.modularity),
            giant_component_ratio: giant_ratio,
        },
    };
    debug!(score = report.score, grade = report.grade, "health computed");
    report
}

fn grade(score: f64) -> &'static str {
    if score >= 90.0 {
        "A"
    } else if score >= 80.0 {
        "B"
    } else if score >= 65.0 {
        "C"
    } else if score >= 50.0 {
        "D"
    } else {
        "F"
    }
}

/// Population Gini coefficient; 0 for empty or all-zero input.
fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let sum: f64 = sorted.iter().sum();
    if sum <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (2.0 * (i + 1) as f64 - n as f64 - 1.0) * v)
        .sum();
    weighted / (n as f64 * sum)
}
