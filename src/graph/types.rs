//! Core type definitions for the communication graph

use serde::Serialize;
use std::fmt;

/// Unique identifier for a person (graph node). Dense arena key: ids are
/// assigned sequentially and never reused within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonId(pub u32);

impl PersonId {
    pub fn new(id: u32) -> Self {
        PersonId(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonId({})", self.0)
    }
}

impl From<u32> for PersonId {
    fn from(id: u32) -> Self {
        PersonId(id)
    }
}

/// Unique identifier for a directed communication edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub fn new(id: u32) -> Self {
        EdgeId(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl From<u32> for EdgeId {
    fn from(id: u32) -> Self {
        EdgeId(id)
    }
}

/// Per-person metric slots populated incrementally by the pipeline stages.
///
/// A typed key instead of loose string attribute names: each stage writes
/// its own kinds and never clobbers another stage's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    InDegreeCentrality,
    OutDegreeCentrality,
    DegreeCentrality,
    BetweennessCentrality,
    EigenvectorCentrality,
    Pagerank,
    Criticality,
    WasteScore,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::InDegreeCentrality => "in_degree_centrality",
            MetricKind::OutDegreeCentrality => "out_degree_centrality",
            MetricKind::DegreeCentrality => "degree_centrality",
            MetricKind::BetweennessCentrality => "betweenness_centrality",
            MetricKind::EigenvectorCentrality => "eigenvector_centrality",
            MetricKind::Pagerank => "pagerank",
            MetricKind::Criticality => "criticality",
            MetricKind::WasteScore => "waste_score",
        }
    }
}
