//! PageRank algorithm implementation

use super::common::GraphView;

/// PageRank configuration
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// L1 convergence tolerance, scaled by node count
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Calculate PageRank for the graph view.
///
/// Transition probabilities are proportional to edge weights (uniform for
/// unweighted views). Mass from dangling nodes is redistributed uniformly,
/// so the returned scores sum to 1.0 for any non-empty graph.
pub fn page_rank(view: &GraphView, config: &PageRankConfig) -> Vec<f64> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }

    // Precompute total outgoing weight per node
    let out_sum: Vec<f64> = (0..n)
        .map(|u| {
            (0..view.degree(u))
                .map(|i| view.weight_at(u, i))
                .sum::<f64>()
        })
        .collect();

    let d = config.damping_factor;
    let base = (1.0 - d) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];

    for _ in 0..config.max_iterations {
        let mut next = vec![0.0f64; n];
        let mut dangling_mass = 0.0;

        for u in 0..n {
            if out_sum[u] > 0.0 {
                let share = scores[u] / out_sum[u];
                for (i, &v) in view.successors(u).iter().enumerate() {
                    next[v] += share * view.weight_at(u, i);
                }
            } else {
                dangling_mass += scores[u];
            }
        }

        let dangling_share = d * dangling_mass / n as f64;
        let mut total_diff = 0.0;
        for (i, value) in next.iter_mut().enumerate() {
            *value = base + d * *value + dangling_share;
            total_diff += (*value - scores[i]).abs();
        }
        scores = next;

        if total_diff < n as f64 * config.tolerance {
            break;
        }
    }

    scores
}
