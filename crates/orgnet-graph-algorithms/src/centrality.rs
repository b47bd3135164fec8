//! Centrality algorithms: weighted betweenness and eigenvector centrality.

use super::common::GraphView;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Sources are processed in fixed-size blocks so partial sums are always
/// combined in the same grouping, independent of worker count. Keeps
/// floating-point results identical across runs and machines.
const SOURCE_BLOCK: usize = 128;

/// Weighted betweenness centrality (Brandes' algorithm with a Dijkstra
/// inner loop).
///
/// Edge weights are interpreted as path costs; unweighted views use cost 1
/// per hop. When `normalized` is set, scores are divided by `(n-1)(n-2)`
/// (directed convention) so values are comparable across graph sizes.
/// Graphs with fewer than 3 nodes yield all zeros.
pub fn betweenness_centrality(view: &GraphView, normalized: bool) -> Vec<f64> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }

    let sources: Vec<usize> = (0..n).collect();
    let partials: Vec<Vec<f64>> = sources
        .par_chunks(SOURCE_BLOCK)
        .map(|block| {
            let mut local = vec![0.0f64; n];
            for &s in block {
                accumulate_from_source(view, s, &mut local);
            }
            local
        })
        .collect();

    let mut scores = vec![0.0f64; n];
    for partial in partials {
        for (i, v) in partial.into_iter().enumerate() {
            scores[i] += v;
        }
    }

    if normalized {
        if n > 2 {
            let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
            for v in &mut scores {
                *v *= scale;
            }
        } else {
            scores.iter_mut().for_each(|v| *v = 0.0);
        }
    }
    scores
}

/// State for the Dijkstra priority queue. The tie counter keeps heap order
/// stable when costs compare equal.
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    tie: usize,
    pred: usize,
    node: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.tie.cmp(&self.tie))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest-path counting and dependency accumulation.
fn accumulate_from_source(view: &GraphView, s: usize, scores: &mut [f64]) {
    let n = view.node_count;
    let mut sigma = vec![0.0f64; n];
    let mut seen = vec![f64::INFINITY; n];
    let mut dist: Vec<Option<f64>> = vec![None; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled: Vec<usize> = Vec::with_capacity(n);

    sigma[s] = 1.0;
    seen[s] = 0.0;
    let mut tie = 0usize;
    let mut heap = BinaryHeap::new();
    heap.push(State {
        cost: 0.0,
        tie,
        pred: s,
        node: s,
    });

    while let Some(State {
        cost, pred, node, ..
    }) = heap.pop()
    {
        if dist[node].is_some() {
            continue;
        }
        sigma[node] += sigma[pred];
        settled.push(node);
        dist[node] = Some(cost);

        for (i, &next) in view.successors(node).iter().enumerate() {
            let next_cost = cost + view.weight_at(node, i);
            if dist[next].is_none() && next_cost < seen[next] {
                seen[next] = next_cost;
                tie += 1;
                heap.push(State {
                    cost: next_cost,
                    tie,
                    pred: node,
                    node: next,
                });
                sigma[next] = 0.0;
                preds[next] = vec![node];
            } else if next_cost == seen[next] && dist[next].is_none() {
                sigma[next] += sigma[node];
                preds[next].push(node);
            }
        }
    }

    // Dependency accumulation in reverse settle order
    let mut delta = vec![0.0f64; n];
    while let Some(w) = settled.pop() {
        let coeff = (1.0 + delta[w]) / sigma[w];
        for &v in &preds[w] {
            delta[v] += sigma[v] * coeff;
        }
        if w != s {
            scores[w] += delta[w];
        }
    }
}

/// Eigenvector centrality by power iteration over a symmetric view.
///
/// Falls back to a dense shifted power method (`A + I`) when plain iteration
/// does not converge within `max_iter` steps; the shift makes the dominant
/// eigenvalue strictly positive, which handles bipartite-style oscillation.
/// Returns all zeros when both passes fail or the view has no edges.
pub fn eigenvector_centrality(view: &GraphView, max_iter: usize, tol: f64) -> Vec<f64> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }
    if view.edge_entry_count() == 0 {
        return vec![0.0; n];
    }

    if let Some(scores) = sparse_power_iteration(view, max_iter, tol) {
        return scores;
    }
    if let Some(scores) = dense_shifted_power(view, max_iter, tol) {
        return scores;
    }
    vec![0.0; n]
}

fn sparse_power_iteration(view: &GraphView, max_iter: usize, tol: f64) -> Option<Vec<f64>> {
    let n = view.node_count;
    let mut x = vec![1.0 / n as f64; n];

    for _ in 0..max_iter {
        let mut next = vec![0.0f64; n];
        for u in 0..n {
            for (i, &v) in view.successors(u).iter().enumerate() {
                next[v] += x[u] * view.weight_at(u, i);
            }
        }
        let norm = next.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Some(vec![0.0; n]);
        }
        next.iter_mut().for_each(|v| *v /= norm);

        let diff: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if diff < n as f64 * tol {
            return Some(x);
        }
    }
    None
}

fn dense_shifted_power(view: &GraphView, max_iter: usize, tol: f64) -> Option<Vec<f64>> {
    let n = view.node_count;
    let mut a = Array2::<f64>::zeros((n, n));
    for u in 0..n {
        for (i, &v) in view.successors(u).iter().enumerate() {
            a[[u, v]] += view.weight_at(u, i);
        }
    }
    // Unit shift: same eigenvectors, dominant eigenvalue moved off zero.
    for i in 0..n {
        a[[i, i]] += 1.0;
    }

    let mut x = Array1::<f64>::from_elem(n, 1.0 / n as f64);
    for _ in 0..max_iter {
        let mut next = a.dot(&x);
        let norm = next.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Some(vec![0.0; n]);
        }
        next.mapv_inplace(|v| v / norm);

        let diff: f64 = next.iter().zip(x.iter()).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if diff < n as f64 * tol {
            return Some(x.to_vec());
        }
    }
    None
}
