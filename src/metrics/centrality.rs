//! Per-person centrality metrics.
//!
//! Adapter between the domain graph and the topology algorithms: builds the
//! CSR views, runs the four centrality measures, and writes the scores into
//! each person's metric table. Every node gets all four metrics even when
//! structurally zero.

use crate::graph::{CommGraph, MetricKind, PersonId};
use orgnet_graph_algorithms::{
    betweenness_centrality, eigenvector_centrality, page_rank, PageRankConfig,
};
use tracing::debug;

/// Iteration bound for eigenvector power iteration before the dense
/// fallback takes over.
const EIGENVECTOR_MAX_ITER: usize = 1000;
const EIGENVECTOR_TOL: f64 = 1e-6;

/// Compute degree, betweenness, eigenvector and PageRank centrality for
/// every node.
///
/// Betweenness and PageRank run on the directed weighted view (edge weight
/// as path cost / transition weight); eigenvector centrality runs on the
/// undirected projection with reciprocal weights merged.
pub fn compute_centrality(graph: &mut CommGraph) {
    let n = graph.node_count();
    if n == 0 {
        return;
    }

    let denominator = if n > 1 { (n - 1) as f64 } else { 1.0 };
    let in_degrees: Vec<f64> = (0..n)
        .map(|i| graph.in_edges(PersonId::new(i as u32)).len() as f64 / denominator)
        .collect();
    let out_degrees: Vec<f64> = (0..n)
        .map(|i| graph.out_edges(PersonId::new(i as u32)).len() as f64 / denominator)
        .collect();

    let directed = graph.view(true);
    let betweenness = betweenness_centrality(&directed, true);
    let pagerank = page_rank(&directed, &PageRankConfig::default());

    let undirected = graph.undirected_view(true);
    let eigenvector = eigenvector_centrality(&undirected, EIGENVECTOR_MAX_ITER, EIGENVECTOR_TOL);

    for (idx, person) in graph.people_mut().enumerate() {
        person.set_metric(MetricKind::InDegreeCentrality, in_degrees[idx]);
        person.set_metric(MetricKind::OutDegreeCentrality, out_degrees[idx]);
        person.set_metric(
            MetricKind::DegreeCentrality,
            in_degrees[idx] + out_degrees[idx],
        );
        person.set_metric(MetricKind::BetweennessCentrality, betweenness[idx]);
        person.set_metric(MetricKind::EigenvectorCentrality, eigenvector[idx]);
        person.set_metric(MetricKind::Pagerank, pagerank[idx]);
    }

    debug!(nodes = n, "centrality metrics computed");
}

/// People ranked by a metric, descending, ties broken by address.
pub fn top_by_metric(graph: &CommGraph, kind: MetricKind, k: usize) -> Vec<(PersonId, f64)> {
    let mut ranked: Vec<(PersonId, f64)> = graph
        .people()
        .iter()
        .map(|p| (p.id, p.metric(kind)))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| graph.person(a.0).email.cmp(&graph.person(b.0).email))
    });
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::{build_graph, BuilderConfig};
    use crate::graph::compute_weights;
    use crate::graph::WeightConfig;
    use crate::message::Message;

    /// Star: one center exchanging messages with every leaf.
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
        graph
    }

    #[test]
    fn test_star_center_dominates() {
        let mut graph = star_graph(4);
        compute_centrality(&mut graph);

        let center = graph.person_by_address("center@x.com").unwrap();
        let center_betweenness = center.metric(MetricKind::BetweennessCentrality);
        let center_degree = center.metric(MetricKind::DegreeCentrality);

        for person in graph.people() {
            if person.email == "center@x.com" {
                continue;
            }
            assert!(center_betweenness >= person.metric(MetricKind::BetweennessCentrality));
            assert!(center_degree >= person.metric(MetricKind::DegreeCentrality));
        }
    }

    #[test]
    fn test_all_metrics_present_for_every_node() {
        let mut graph = star_graph(3);
        compute_centrality(&mut graph);

        for person in graph.people() {
            for kind in [
                MetricKind::InDegreeCentrality,
                MetricKind::OutDegreeCentrality,
                MetricKind::DegreeCentrality,
                MetricKind::BetweennessCentrality,
                MetricKind::EigenvectorCentrality,
                MetricKind::Pagerank,
            ] {
                assert!(person.metrics.contains_key(&kind));
            }
        }
    }

    #[test]
    fn test_pagerank_sums_to_one() {
        let mut graph = star_graph(5);
        compute_centrality(&mut graph);

        let sum: f64 = graph
            .people()
            .iter()
            .map(|p| p.metric(MetricKind::Pagerank))
            .sum();
        assert!((sum - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_degree_centrality_normalization() {
        let mut graph = star_graph(4);
        compute_centrality(&mut graph);

        // Center has 4 in-edges and 4 out-edges over n-1 = 4
        let center = graph.person_by_address("center@x.com").unwrap();
        assert!((center.metric(MetricKind::InDegreeCentrality) - 1.0).abs() < 1e-9);
        assert!((center.metric(MetricKind::OutDegreeCentrality) - 1.0).abs() < 1e-9);
        assert!((center.metric(MetricKind::DegreeCentrality) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_by_metric_ordering() {
        let mut graph = star_graph(4);
        compute_centrality(&mut graph);

        let top = top_by_metric(&graph, MetricKind::DegreeCentrality, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(graph.person(top[0].0).email, "center@x.com");
        assert!(top[0].1 >= top[1].1);
    }

    #[test]
    fn test_empty_graph_is_noop() {
        let mut graph = CommGraph::new();
        compute_centrality(&mut graph);
        assert_eq!(graph.node_count(), 0);
    }
}
