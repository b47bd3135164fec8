//! Community detection, bridge nodes and heuristic labeling.

use crate::graph::{CommGraph, MetricKind, PersonId};
use orgnet_graph_algorithms::louvain_communities;
use rustc_hash::FxHashSet;
use tracing::debug;

/// One detected community. Ids are renumbered each run and carry no
/// persistent identity.
#[derive(Debug, Clone)]
pub struct Community {
    pub id: usize,
    pub members: Vec<PersonId>,
    pub size: usize,
    /// Internal undirected edges / possible internal pairs
    pub density: f64,
    pub label: String,
}

/// Partition of the graph into communities plus derived structure.
#[derive(Debug, Clone, Default)]
pub struct CommunityReport {
    pub communities: Vec<Community>,
    /// Nodes with at-least-median betweenness whose neighbors span more
    /// than one community
    pub bridge_nodes: Vec<PersonId>,
    pub modularity: f64,
}

/// Detect communities on the undirected weighted projection, assign each
/// person's community id, and derive bridges and labels.
///
/// Requires centrality metrics to be populated (bridge detection and label
/// ranking read stored betweenness).
pub fn detect_communities(graph: &mut CommGraph) -> CommunityReport {
    let n = graph.node_count();
    if n == 0 {
        return CommunityReport::default();
    }

    let undirected = graph.undirected_view(true);
    let louvain = louvain_communities(&undirected);
    let partition = &louvain.partition;

    for (idx, person) in graph.people_mut().enumerate() {
        person.community = Some(partition[idx]);
    }

    let community_count = partition.iter().max().map_or(0, |m| m + 1);
    let mut members: Vec<Vec<PersonId>> = vec![Vec::new(); community_count];
    for (idx, &c) in partition.iter().enumerate() {
        members[c].push(PersonId::new(idx as u32));
    }

    // Internal undirected edge counts: reciprocal directed edges collapse
    // into one pair.
    let mut internal_pairs: Vec<FxHashSet<(u32, u32)>> =
        vec![FxHashSet::default(); community_count];
    for edge in graph.edges() {
        let cu = partition[edge.source.index()];
        let cv = partition[edge.target.index()];
        if cu == cv {
            let a = edge.source.0.min(edge.target.0);
            let b = edge.source.0.max(edge.target.0);
            internal_pairs[cu].insert((a, b));
        }
    }

    let mut communities: Vec<Community> = members
        .into_iter()
        .enumerate()
        .map(|(id, members)| {
            let size = members.len();
            let possible_pairs = if size > 1 {
                (size * (size - 1) / 2) as f64
            } else {
                1.0
            };
            let density = internal_pairs[id].len() as f64 / possible_pairs;
            Community {
                id,
                members,
                size,
                density,
                label: String::new(),
            }
        })
        .collect();

    let betweenness: Vec<f64> = graph
        .people()
        .iter()
        .map(|p| p.metric(MetricKind::BetweennessCentrality))
        .collect();
    let bridge_nodes = find_bridge_nodes(graph, partition, &betweenness);
    label_communities(graph, &mut communities, partition, &betweenness);

    debug!(
        communities = communities.len(),
        modularity = louvain.modularity,
        bridges = bridge_nodes.len(),
        "community detection complete"
    );

    CommunityReport {
        communities,
        bridge_nodes,
        modularity: louvain.modularity,
    }
}

/// A node bridges communities when its betweenness is at or above the
/// median and its neighbors (predecessors ∪ successors) span more than one
/// distinct community.
fn find_bridge_nodes(graph: &CommGraph, partition: &[usize], betweenness: &[f64]) -> Vec<PersonId> {
    if betweenness.is_empty() {
        return Vec::new();
    }
    let mut sorted = betweenness.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = sorted[sorted.len() / 2];

    let mut bridges = Vec::new();
    for person in graph.people() {
        if betweenness[person.id.index()] < median {
            continue;
        }
        let neighbor_communities: FxHashSet<usize> = graph
            .neighbors(person.id)
            .iter()
            .map(|nb| partition[nb.index()])
            .collect();
        if neighbor_communities.len() > 1 {
            bridges.push(person.id);
        }
    }
    bridges
}

/// Assign descriptive labels from community shape heuristics.
///
/// Communities are ranked by mean member betweenness (descending) and the
/// rules are applied first-match-wins in that rank order; the rule ordering
/// is intentional: size-based rules take precedence over density-based
/// ones.
fn label_communities(
    graph: &CommGraph,
    communities: &mut [Community],
    partition: &[usize],
    betweenness: &[f64],
) {
    struct CommunityStats {
        id: usize,
        size: usize,
        density: f64,
        avg_betweenness: f64,
        avg_degree: f64,
        bridge_ratio: f64,
        inter_edges: usize,
    }

    // Incident inter-community directed edges, counted from each side.
    let mut inter_edges = vec![0usize; communities.len()];
    for edge in graph.edges() {
        let cu = partition[edge.source.index()];
        let cv = partition[edge.target.index()];
        if cu != cv {
            inter_edges[cu] += 1;
            inter_edges[cv] += 1;
        }
    }

    let mut stats: Vec<CommunityStats> = communities
        .iter()
        .map(|community| {
            let size = community.size;
            let avg_betweenness = if size > 0 {
                community
                    .members
                    .iter()
                    .map(|m| betweenness[m.index()])
                    .sum::<f64>()
                    / size as f64
            } else {
                0.0
            };
            let avg_degree = if size > 0 {
                community
                    .members
                    .iter()
                    .map(|m| graph.degree(*m) as f64)
                    .sum::<f64>()
                    / size as f64
            } else {
                0.0
            };
            let bridge_count = community
                .members
                .iter()
                .filter(|m| {
                    graph
                        .neighbors(**m)
                        .iter()
                        .any(|nb| partition[nb.index()] != community.id)
                })
                .count();
            let bridge_ratio = if size > 0 {
                bridge_count as f64 / size as f64
            } else {
                0.0
            };

            CommunityStats {
                id: community.id,
                size,
                density: community.density,
                avg_betweenness,
                avg_degree,
                bridge_ratio,
                inter_edges: inter_edges[community.id],
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.avg_betweenness
            .partial_cmp(&a.avg_betweenness)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut ops_counter = 0usize;
    for (rank, s) in stats.iter().enumerate() {
        let label = if s.size < 3 {
            "Working Pair".to_string()
        } else if s.size < 5 {
            "Small Team".to_string()
        } else if rank == 0 && s.bridge_ratio > 0.3 {
            "Executive & Strategy".to_string()
        } else if s.density > 0.15 && s.size < 100 {
            "Specialized Unit".to_string()
        } else if s.size > 500 && s.density < 0.02 {
            "Extended Network".to_string()
        } else if s.avg_degree > 15.0 && s.inter_edges > 50 {
            "Trading & Communications".to_string()
        } else if s.density > 0.05 && s.size > 20 && s.size < 500 {
            "Core Operations".to_string()
        } else {
            let label = format!("Operations Group {}", group_letter(ops_counter));
            ops_counter += 1;
            label
        };
        communities[s.id].label = label;
    }
}

/// Sequential group suffix: A..Z, then AA, AB, …
fn group_letter(index: usize) -> String {
    let mut result = String::new();
    let mut i = index;
    loop {
        result.insert(0, (b'A' + (i % 26) as u8) as char);
        i /= 26;
        if i == 0 {
            break;
        }
        i -= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::{build_graph, BuilderConfig};
    use crate::graph::{compute_weights, WeightConfig};
    use crate::message::Message;
    use crate::metrics::centrality::compute_centrality;

    fn send(messages: &mut Vec<Message>, from: &str, to: &str) {
        for _ in 0..3 {
            messages.push(Message::new("m", from, vec![to.to_string()]));
            messages.push(Message::new("m", to, vec![from.to_string()]));
        }
    }

    /// Two fully-connected 4-person clusters joined by a single bridge edge.
    fn two_cluster_graph() -> CommGraph {
        let left = ["a1@x.com", "a2@x.com", "a3@x.com", "a4@x.com"];
        let right = ["b1@x.com", "b2@x.com", "b3@x.com", "b4@x.com"];
        let mut messages = Vec::new();
        for group in [&left, &right] {
            for i in 0..group.len() {
                for j in (i + 1)..group.len() {
                    send(&mut messages, group[i], group[j]);
                }
            }
        }
        send(&mut messages, left[3], right[0]);

        let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        compute_weights(&mut graph, &WeightConfig::default());
        compute_centrality(&mut graph);
        graph
    }

    #[test]
    fn test_two_clusters_detected() {
        let mut graph = two_cluster_graph();
        let report = detect_communities(&mut graph);

        assert!(report.communities.len() >= 2);
        assert!(report.modularity > 0.0);

        // The bridge endpoints land on opposite sides
        let a4 = graph.person_by_address("a4@x.com").unwrap();
        let b1 = graph.person_by_address("b1@x.com").unwrap();
        assert_ne!(a4.community, b1.community);

        // At least one bridge-side node qualifies as a bridge
        assert!(
            report.bridge_nodes.contains(&a4.id) || report.bridge_nodes.contains(&b1.id)
        );
    }

    #[test]
    fn test_every_node_assigned_exactly_one_community() {
        let mut graph = two_cluster_graph();
        let report = detect_communities(&mut graph);

        let mut seen = vec![0usize; graph.node_count()];
        for community in &report.communities {
            for member in &community.members {
                seen[member.index()] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));

        for person in graph.people() {
            assert!(person.community.is_some());
        }
    }

    #[test]
    fn test_community_density() {
        let mut graph = two_cluster_graph();
        let report = detect_communities(&mut graph);

        // A fully-connected 4-person cluster has density 1.0
        for community in &report.communities {
            if community.size == 4 {
                assert!((community.density - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_small_communities_labeled_by_size() {
        let mut graph = two_cluster_graph();
        let report = detect_communities(&mut graph);
        for community in &report.communities {
            if community.size == 4 {
                assert_eq!(community.label, "Small Team");
            }
        }
    }

    #[test]
    fn test_working_pair_label() {
        let mut messages = Vec::new();
        send(&mut messages, "a@x.com", "b@x.com");
        let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        compute_weights(&mut graph, &WeightConfig::default());
        compute_centrality(&mut graph);

        let report = detect_communities(&mut graph);
        assert!(report
            .communities
            .iter()
            .any(|c| c.label == "Working Pair"));
    }

    #[test]
    fn test_empty_graph() {
        let mut graph = CommGraph::new();
        let report = detect_communities(&mut graph);
        assert!(report.communities.is_empty());
        assert!(report.bridge_nodes.is_empty());
        assert_eq!(report.modularity, 0.0);
    }

    #[test]
    fn test_group_letters() {
        assert_eq!(group_letter(0), "A");
        assert_eq!(group_letter(25), "Z");
        assert_eq!(group_letter(26), "AA");
        assert_eq!(group_letter(27), "AB");
    }
}
