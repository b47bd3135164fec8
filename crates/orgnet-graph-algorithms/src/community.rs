//! Community structure algorithms: weakly connected components and Louvain
//! modularity optimization.

use super::common::GraphView;
use std::collections::BTreeMap;

/// Result of the WCC algorithm
pub struct WccResult {
    /// Component id per node index, numbered by first appearance
    pub component: Vec<usize>,
    /// Members of each component, ascending node order
    pub components: Vec<Vec<usize>>,
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph, ignoring edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u in 0..n {
        for &v in view.successors(u) {
            uf.union(u, v);
        }
    }

    // Number components by first appearance so ids are stable for a given
    // input, then group members.
    let mut root_to_id: BTreeMap<usize, usize> = BTreeMap::new();
    let mut component = vec![0usize; n];
    let mut components: Vec<Vec<usize>> = Vec::new();

    for i in 0..n {
        let root = uf.find(i);
        let next_id = root_to_id.len();
        let id = *root_to_id.entry(root).or_insert(next_id);
        if id == components.len() {
            components.push(Vec::new());
        }
        component[i] = id;
        components[id].push(i);
    }

    WccResult {
        component,
        components,
    }
}

/// Size of the largest weakly connected component, 0 for an empty graph.
pub fn largest_component_size(view: &GraphView) -> usize {
    weakly_connected_components(view)
        .components
        .iter()
        .map(|c| c.len())
        .max()
        .unwrap_or(0)
}

/// Result of Louvain community detection
pub struct LouvainResult {
    /// Community id per node index, numbered by first appearance
    pub partition: Vec<usize>,
    /// Modularity of the final partition on the input graph
    pub modularity: f64,
}

/// Louvain community detection on a symmetric weighted view.
///
/// Alternates a local-move phase (greedily relocating nodes to the
/// neighboring community with the best modularity gain) with an aggregation
/// phase that collapses communities into super-nodes, until no move improves
/// modularity. Nodes are swept in index order so the partition is
/// deterministic for a given input.
pub fn louvain_communities(view: &GraphView) -> LouvainResult {
    let n = view.node_count;
    if n == 0 {
        return LouvainResult {
            partition: Vec::new(),
            modularity: 0.0,
        };
    }

    // Level-0 adjacency; self-loop weights tracked separately using the
    // directed-entry convention (internal weight appears once per direction).
    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut loops = vec![0.0f64; n];
    for u in 0..n {
        for (i, &v) in view.successors(u).iter().enumerate() {
            let w = view.weight_at(u, i);
            if u == v {
                loops[u] += w;
            } else {
                adj[u].push((v, w));
            }
        }
    }

    let two_m: f64 = (0..n)
        .map(|u| adj[u].iter().map(|&(_, w)| w).sum::<f64>() + loops[u])
        .sum();
    if two_m == 0.0 {
        return LouvainResult {
            partition: (0..n).collect(),
            modularity: 0.0,
        };
    }

    let mut partition: Vec<usize> = (0..n).collect();
    loop {
        let (community, improved) = one_level(&adj, &loops, two_m);
        if !improved {
            break;
        }
        let (renumbered, count) = renumber(&community);
        for p in partition.iter_mut() {
            *p = renumbered[*p];
        }
        let (next_adj, next_loops) = aggregate(&adj, &loops, &renumbered, count);
        if next_adj.len() == adj.len() {
            break;
        }
        adj = next_adj;
        loops = next_loops;
    }

    let (partition, _) = renumber(&partition);
    let q = modularity(view, &partition);
    LouvainResult {
        partition,
        modularity: q,
    }
}

/// Modularity of a partition over a symmetric weighted view.
pub fn modularity(view: &GraphView, partition: &[usize]) -> f64 {
    let n = view.node_count;
    if n == 0 {
        return 0.0;
    }
    let ncomm = partition.iter().max().map_or(0, |m| m + 1);
    let mut internal = vec![0.0f64; ncomm];
    let mut total = vec![0.0f64; ncomm];
    let mut two_m = 0.0;

    for u in 0..n {
        for (i, &v) in view.successors(u).iter().enumerate() {
            let w = view.weight_at(u, i);
            two_m += w;
            total[partition[u]] += w;
            if partition[u] == partition[v] {
                internal[partition[u]] += w;
            }
        }
    }
    if two_m == 0.0 {
        return 0.0;
    }

    (0..ncomm)
        .map(|c| internal[c] / two_m - (total[c] / two_m).powi(2))
        .sum()
}

/// One local-move sweep phase. Returns the community per node and whether
/// any node moved.
fn one_level(adj: &[Vec<(usize, f64)>], loops: &[f64], two_m: f64) -> (Vec<usize>, bool) {
    let n = adj.len();
    let k: Vec<f64> = (0..n)
        .map(|i| adj[i].iter().map(|&(_, w)| w).sum::<f64>() + loops[i])
        .collect();
    let mut community: Vec<usize> = (0..n).collect();
    let mut sigma_tot = k.clone();
    let mut improved = false;

    let mut moved = true;
    while moved {
        moved = false;
        for node in 0..n {
            let old = community[node];

            // Weight from this node into each neighboring community.
            // BTreeMap keeps the candidate order deterministic.
            let mut neighbor_weights: BTreeMap<usize, f64> = BTreeMap::new();
            for &(nb, w) in &adj[node] {
                *neighbor_weights.entry(community[nb]).or_insert(0.0) += w;
            }

            sigma_tot[old] -= k[node];
            let stay_gain =
                neighbor_weights.get(&old).copied().unwrap_or(0.0) - k[node] * sigma_tot[old] / two_m;

            let mut best = old;
            let mut best_gain = stay_gain;
            for (&c, &w) in &neighbor_weights {
                if c == old {
                    continue;
                }
                let gain = w - k[node] * sigma_tot[c] / two_m;
                if gain > best_gain + 1e-12 {
                    best_gain = gain;
                    best = c;
                }
            }

            sigma_tot[best] += k[node];
            if best != old {
                community[node] = best;
                moved = true;
                improved = true;
            }
        }
    }

    (community, improved)
}

/// Renumber community ids by first appearance. Returns the mapping and the
/// community count.
fn renumber(community: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: BTreeMap<usize, usize> = BTreeMap::new();
    let mut renumbered = Vec::with_capacity(community.len());
    for &c in community {
        let next = mapping.len();
        renumbered.push(*mapping.entry(c).or_insert(next));
    }
    (renumbered, mapping.len())
}

/// Collapse communities into super-nodes, summing edge weights. Intra-
/// community weight accumulates as self-loop weight.
fn aggregate(
    adj: &[Vec<(usize, f64)>],
    loops: &[f64],
    community: &[usize],
    count: usize,
) -> (Vec<Vec<(usize, f64)>>, Vec<f64>) {
    let mut new_loops = vec![0.0f64; count];
    let mut merged: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];

    for u in 0..adj.len() {
        let cu = community[u];
        new_loops[cu] += loops[u];
        for &(v, w) in &adj[u] {
            let cv = community[v];
            if cu == cv {
                new_loops[cu] += w;
            } else {
                *merged[cu].entry(cv).or_insert(0.0) += w;
            }
        }
    }

    let new_adj = merged
        .into_iter()
        .map(|m| m.into_iter().collect())
        .collect();
    (new_adj, new_loops)
}
