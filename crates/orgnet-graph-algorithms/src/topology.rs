//! Graph topology measures used by health scoring: clustering coefficient
//! and average shortest path length.

use super::common::GraphView;
use rayon::prelude::*;
use std::collections::{HashSet, VecDeque};

/// Average local clustering coefficient over all nodes of a symmetric view.
///
/// Each node's coefficient is the fraction of its neighbor pairs that are
/// themselves connected; nodes with fewer than two neighbors contribute 0.
/// Weights are ignored.
pub fn average_clustering(view: &GraphView) -> f64 {
    let n = view.node_count;
    if n == 0 {
        return 0.0;
    }

    let neighbor_sets: Vec<HashSet<usize>> = (0..n)
        .map(|u| view.successors(u).iter().copied().filter(|&v| v != u).collect())
        .collect();

    let total: f64 = (0..n)
        .into_par_iter()
        .map(|u| {
            let neighbors = &neighbor_sets[u];
            let k = neighbors.len();
            if k < 2 {
                return 0.0;
            }
            let mut links = 0usize;
            for &v in neighbors {
                for &w in &neighbor_sets[v] {
                    if w > v && neighbors.contains(&w) {
                        links += 1;
                    }
                }
            }
            (2 * links) as f64 / (k * (k - 1)) as f64
        })
        .sum();

    total / n as f64
}

/// Average shortest path length (unweighted hops) over a connected node
/// subset of a symmetric view.
///
/// `members` must form a connected component; distances to nodes outside the
/// subset are not counted. Returns `None` when the subset has fewer than two
/// nodes, in which case the measure is undefined.
pub fn average_shortest_path_length(view: &GraphView, members: &[usize]) -> Option<f64> {
    let g = members.len();
    if g < 2 {
        return None;
    }

    let mut in_subset = vec![false; view.node_count];
    for &m in members {
        in_subset[m] = true;
    }

    // Distances are integer hop counts; summing u64 keeps the result exact
    // and independent of scheduling order.
    let total: u64 = members
        .par_iter()
        .map(|&source| bfs_distance_sum(view, source, &in_subset))
        .sum();

    Some(total as f64 / (g * (g - 1)) as f64)
}

fn bfs_distance_sum(view: &GraphView, source: usize, in_subset: &[bool]) -> u64 {
    let mut dist: Vec<Option<u64>> = vec![None; view.node_count];
    let mut queue = VecDeque::new();
    dist[source] = Some(0);
    queue.push_back(source);

    let mut sum = 0u64;
    while let Some(u) = queue.pop_front() {
        let d = dist[u].unwrap_or(0);
        if u != source && in_subset[u] {
            sum += d;
        }
        for &v in view.successors(u) {
            if in_subset[v] && dist[v].is_none() {
                dist[v] = Some(d + 1);
                queue.push_back(v);
            }
        }
    }
    sum
}
