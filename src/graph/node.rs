//! Person (node) records for the communication graph

use super::types::{MetricKind, PersonId};
use std::collections::BTreeMap;

/// One communication participant, keyed by normalized address.
///
/// Created by the graph builder; later stages write their scores into the
/// metric table and the sentiment averages in place.
#[derive(Debug, Clone)]
pub struct Person {
    /// Arena key within the owning graph
    pub id: PersonId,

    /// Normalized address (graph-wide unique)
    pub email: String,

    /// Display name derived once from the address local part
    pub name: String,

    /// Deliveries sent, counted per recipient, independent of edge threshold
    pub total_sent: u64,

    /// Deliveries received, counted per recipient occurrence
    pub total_received: u64,

    pub department: Option<String>,

    /// Community assignment, set by community detection
    pub community: Option<usize>,

    /// Mean polarity of messages this person sent (0 when none qualified)
    pub avg_sent_sentiment: f64,

    /// Mean polarity of messages this person received
    pub avg_received_sentiment: f64,

    /// Metric scores populated incrementally by the pipeline stages
    pub metrics: BTreeMap<MetricKind, f64>,
}

impl Person {
    pub fn new(id: PersonId, email: impl Into<String>, name: impl Into<String>) -> Self {
        Person {
            id,
            email: email.into(),
            name: name.into(),
            total_sent: 0,
            total_received: 0,
            department: None,
            community: None,
            avg_sent_sentiment: 0.0,
            avg_received_sentiment: 0.0,
            metrics: BTreeMap::new(),
        }
    }

    /// Read a metric, 0.0 when the producing stage has not run yet.
    pub fn metric(&self, kind: MetricKind) -> f64 {
        self.metrics.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn set_metric(&mut self, kind: MetricKind, value: f64) {
        self.metrics.insert(kind, value);
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Person {}
