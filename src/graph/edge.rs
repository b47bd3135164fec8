//! Directed communication edges

use super::types::{EdgeId, PersonId};
use chrono::{DateTime, Utc};

/// Aggregated one-directional communication between two people.
///
/// A→B and B→A are distinct edges with independently computed volume and
/// sentiment. Edges exist only when the underlying message count met the
/// builder's minimum-volume threshold.
#[derive(Debug, Clone)]
pub struct CommunicationEdge {
    pub id: EdgeId,

    /// Sender side
    pub source: PersonId,

    /// Recipient side
    pub target: PersonId,

    /// Number of messages aggregated into this edge
    pub message_count: u64,

    /// Earliest message timestamp seen, when any message carried one
    pub first_seen: Option<DateTime<Utc>>,

    /// Latest message timestamp seen
    pub last_seen: Option<DateTime<Utc>>,

    /// Capped sample of subject lines
    pub subjects: Vec<String>,

    /// Composite weight in [0, 1], set by the weight engine
    pub weight: f64,

    /// Message count normalized by the graph-wide maximum
    pub norm_frequency: f64,

    /// Exponential recency decay from the reference timestamp
    pub norm_recency: f64,

    /// Mean polarity of the messages behind this edge, set by enrichment
    pub sentiment: Option<f64>,

    /// Number of messages that contributed to `sentiment`
    pub sentiment_count: u64,

    /// Absolute polarity difference versus the reverse edge
    pub sentiment_asymmetry: f64,

    /// Placeholder for a future responsiveness signal; neutral until set
    pub response_efficiency: Option<f64>,
}

impl CommunicationEdge {
    pub fn new(id: EdgeId, source: PersonId, target: PersonId) -> Self {
        CommunicationEdge {
            id,
            source,
            target,
            message_count: 0,
            first_seen: None,
            last_seen: None,
            subjects: Vec::new(),
            weight: 0.0,
            norm_frequency: 0.0,
            norm_recency: 0.0,
            sentiment: None,
            sentiment_count: 0,
            sentiment_asymmetry: 0.0,
            response_efficiency: None,
        }
    }

    /// Check if this edge goes FROM a specific person
    pub fn starts_from(&self, person: PersonId) -> bool {
        self.source == person
    }

    /// Check if this edge goes TO a specific person
    pub fn ends_at(&self, person: PersonId) -> bool {
        self.target == person
    }
}

impl PartialEq for CommunicationEdge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommunicationEdge {}
