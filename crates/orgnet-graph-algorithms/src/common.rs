//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm
//! execution. Nodes are addressed by dense indices `0..node_count`; the
//! caller owns the mapping back to its domain identifiers.

use std::collections::BTreeMap;

/// A dense, integer-indexed view of the graph topology using Compressed
/// Sparse Row (CSR) format.
///
/// For directed graphs the entries are the outgoing edges. Undirected views
/// are represented symmetrically: both directions of every edge are present,
/// so `successors` doubles as the neighbor list.
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub targets: Vec<usize>,
    /// Edge weights aligned with `targets`. `None` for unweighted views.
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Build a directed unweighted view from an edge list.
    pub fn unweighted(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut degrees = vec![0usize; node_count];
        for &(u, _) in edges {
            degrees[u] += 1;
        }
        let (offsets, mut cursors) = offsets_from_degrees(&degrees);
        let mut targets = vec![0usize; edges.len()];
        for &(u, v) in edges {
            targets[cursors[u]] = v;
            cursors[u] += 1;
        }
        GraphView {
            node_count,
            offsets,
            targets,
            weights: None,
        }
    }

    /// Build a directed weighted view from an edge list.
    pub fn weighted(node_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut degrees = vec![0usize; node_count];
        for &(u, _, _) in edges {
            degrees[u] += 1;
        }
        let (offsets, mut cursors) = offsets_from_degrees(&degrees);
        let mut targets = vec![0usize; edges.len()];
        let mut weights = vec![0.0f64; edges.len()];
        for &(u, v, w) in edges {
            targets[cursors[u]] = v;
            weights[cursors[u]] = w;
            cursors[u] += 1;
        }
        GraphView {
            node_count,
            offsets,
            targets,
            weights: Some(weights),
        }
    }

    /// Build a symmetric undirected weighted view from a directed edge list.
    ///
    /// Parallel edges (u→v and v→u) are merged by summing their weights, and
    /// every merged edge is emitted in both directions. Self-loops are
    /// dropped.
    pub fn undirected_weighted(node_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(u, v, w) in edges {
            if u == v {
                continue;
            }
            let key = if u < v { (u, v) } else { (v, u) };
            *merged.entry(key).or_insert(0.0) += w;
        }
        let symmetric: Vec<(usize, usize, f64)> = merged
            .iter()
            .flat_map(|(&(u, v), &w)| [(u, v, w), (v, u, w)])
            .collect();
        Self::weighted(node_count, &symmetric)
    }

    /// Build a symmetric undirected unweighted view from a directed edge list.
    ///
    /// Reciprocal edges collapse into a single undirected edge; self-loops
    /// are dropped.
    pub fn undirected_unweighted(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut merged: BTreeMap<(usize, usize), ()> = BTreeMap::new();
        for &(u, v) in edges {
            if u == v {
                continue;
            }
            let key = if u < v { (u, v) } else { (v, u) };
            merged.insert(key, ());
        }
        let symmetric: Vec<(usize, usize)> = merged
            .keys()
            .flat_map(|&(u, v)| [(u, v), (v, u)])
            .collect();
        Self::unweighted(node_count, &symmetric)
    }

    /// Get the out-degree of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.targets[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Get weights for outgoing edges of a node, aligned with `successors`
    pub fn edge_weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights
            .as_ref()
            .map(|w| &w[self.offsets[idx]..self.offsets[idx + 1]])
    }

    /// Weight of the `i`-th outgoing edge of `idx`, 1.0 when unweighted.
    pub fn weight_at(&self, idx: usize, i: usize) -> f64 {
        match &self.weights {
            Some(w) => w[self.offsets[idx] + i],
            None => 1.0,
        }
    }

    /// Total number of stored edge entries.
    pub fn edge_entry_count(&self) -> usize {
        self.targets.len()
    }
}

fn offsets_from_degrees(degrees: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(degrees.len() + 1);
    offsets.push(0);
    for &d in degrees {
        offsets.push(offsets.last().unwrap() + d);
    }
    let cursors = offsets[..degrees.len()].to_vec();
    (offsets, cursors)
}
