//! Build a communication graph from parsed messages.

use super::store::{CommGraph, GraphResult};
use crate::message::Message;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Graph construction parameters.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Minimum messages for a sender→recipient edge to materialize.
    /// Pairs below the threshold are discarded entirely, not zero-weighted.
    pub min_messages: u64,

    /// When set, messages touching any address outside this domain are
    /// dropped (suffix match on `@domain`).
    pub internal_domain: Option<String>,

    /// Cap on stored subject-line samples per edge
    pub subject_sample_cap: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            min_messages: 3,
            internal_domain: None,
            subject_sample_cap: 50,
        }
    }
}

/// Convert an address to a display name: `john.smith@corp.com` → `John Smith`.
///
/// The local part is split on `.`, `_` and `-`; each token is capitalized
/// and the tokens joined with spaces.
pub fn extract_display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    local
        .split(['.', '_', '-'])
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[derive(Default)]
struct EdgeAccum {
    count: u64,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
    subjects: Vec<String>,
}

/// Build a weighted directed graph from parsed messages.
///
/// Self-communication is excluded, and when a domain restriction is
/// configured, any message leg touching an outside address is skipped.
/// Sent/received totals accumulate for every qualifying delivery regardless
/// of whether the pair later clears the edge threshold.
pub fn build_graph(messages: &[Message], config: &BuilderConfig) -> GraphResult<CommGraph> {
    // Aggregation keyed by (sender, recipient); insertion order makes edge
    // ids deterministic for a given input.
    let mut edge_data: IndexMap<(String, String), EdgeAccum> = IndexMap::new();
    let mut sent: FxHashMap<String, u64> = FxHashMap::default();
    let mut received: FxHashMap<String, u64> = FxHashMap::default();
    let mut skipped = 0u64;

    let in_domain = |addr: &str| match &config.internal_domain {
        Some(domain) => addr.ends_with(&format!("@{domain}")),
        None => true,
    };

    for message in messages {
        if !message.has_valid_sender() {
            skipped += 1;
            continue;
        }
        let sender = &message.sender;
        if !in_domain(sender) {
            continue;
        }

        for recipient in message.all_recipients() {
            if recipient == sender || !in_domain(recipient) {
                continue;
            }

            let accum = edge_data
                .entry((sender.clone(), recipient.clone()))
                .or_default();
            accum.count += 1;

            if let Some(ts) = message.timestamp {
                accum.first = Some(accum.first.map_or(ts, |cur| cur.min(ts)));
                accum.last = Some(accum.last.map_or(ts, |cur| cur.max(ts)));
            }
            if !message.subject.is_empty() && accum.subjects.len() < config.subject_sample_cap {
                accum.subjects.push(message.subject.clone());
            }

            *sent.entry(sender.clone()).or_insert(0) += 1;
            *received.entry(recipient.clone()).or_insert(0) += 1;
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped messages without a usable sender");
    }

    // Materialize: only pairs meeting the threshold become edges, and only
    // their endpoints become nodes.
    let mut graph = CommGraph::new();
    for ((src, tgt), accum) in edge_data {
        if accum.count < config.min_messages {
            continue;
        }
        let source = graph.intern_person(&src, &extract_display_name(&src));
        let target = graph.intern_person(&tgt, &extract_display_name(&tgt));
        let edge_id = graph.add_edge(source, target)?;

        let edge = graph.edge_mut(edge_id);
        edge.message_count = accum.count;
        edge.first_seen = accum.first;
        edge.last_seen = accum.last;
        edge.subjects = accum.subjects;
    }

    for person in graph.people_mut() {
        person.total_sent = sent.get(&person.email).copied().unwrap_or(0);
        person.total_received = received.get(&person.email).copied().unwrap_or(0);
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "communication graph built"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, to: &[&str]) -> Message {
        Message::new("m", sender, to.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_display_name_round_trips() {
        assert_eq!(extract_display_name("john.smith@enron.com"), "John Smith");
        assert_eq!(extract_display_name("john_smith@enron.com"), "John Smith");
        assert_eq!(extract_display_name("john@enron.com"), "John");
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let graph = build_graph(&[], &BuilderConfig::default()).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_threshold_filters_edges() {
        // Two messages one way: below the default threshold of 3
        let messages = vec![msg("a@x.com", &["b@x.com"]), msg("a@x.com", &["b@x.com"])];
        let graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_reciprocal_pair_scenario() {
        // 3 messages A→B and 3 messages B→A at threshold 3
        let mut messages = Vec::new();
        for _ in 0..3 {
            messages.push(msg("a@x.com", &["b@x.com"]));
            messages.push(msg("b@x.com", &["a@x.com"]));
        }
        let graph = build_graph(&messages, &BuilderConfig::default()).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        for edge in graph.edges() {
            assert_eq!(edge.message_count, 3);
        }
    }

    #[test]
    fn test_self_messages_excluded() {
        let messages = vec![
            msg("a@x.com", &["a@x.com"]),
            msg("a@x.com", &["a@x.com"]),
            msg("a@x.com", &["a@x.com"]),
        ];
        let graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_threshold_one_keeps_all_edges() {
        let config = BuilderConfig {
            min_messages: 1,
            ..Default::default()
        };
        let graph = build_graph(&[msg("a@x.com", &["b@x.com"])], &config).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_domain_restriction() {
        let config = BuilderConfig {
            min_messages: 1,
            internal_domain: Some("corp.com".to_string()),
            ..Default::default()
        };
        let messages = vec![
            msg("a@corp.com", &["b@corp.com", "outsider@other.com"]),
            msg("outsider@other.com", &["a@corp.com"]),
        ];
        let graph = build_graph(&messages, &config).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.person_by_address("outsider@other.com").is_none());
    }

    #[test]
    fn test_totals_independent_of_threshold() {
        // a→b clears the threshold, a→c does not; all deliveries from a are
        // still counted in the sent total.
        let mut messages = vec![msg("a@x.com", &["c@x.com"])];
        for _ in 0..3 {
            messages.push(msg("a@x.com", &["b@x.com"]));
        }
        let graph = build_graph(&messages, &BuilderConfig::default()).unwrap();

        let a = graph.person_by_address("a@x.com").unwrap();
        assert_eq!(a.total_sent, 4);
        assert!(graph.person_by_address("c@x.com").is_none());
    }

    #[test]
    fn test_malformed_sender_skipped() {
        let mut messages = vec![msg("", &["b@x.com"]), msg("no-at-sign", &["b@x.com"])];
        for _ in 0..3 {
            messages.push(msg("a@x.com", &["b@x.com"]));
        }
        let graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_timestamps_and_subject_cap() {
        use chrono::TimeZone;
        let t0 = Utc.with_ymd_and_hms(2001, 5, 1, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2001, 6, 1, 12, 0, 0).unwrap();
        let config = BuilderConfig {
            min_messages: 1,
            subject_sample_cap: 1,
            ..Default::default()
        };
        let messages = vec![
            msg("a@x.com", &["b@x.com"])
                .with_subject("first")
                .with_timestamp(t1),
            msg("a@x.com", &["b@x.com"])
                .with_subject("second")
                .with_timestamp(t0),
        ];
        let graph = build_graph(&messages, &config).unwrap();

        let edge = &graph.edges()[0];
        assert_eq!(edge.first_seen, Some(t0));
        assert_eq!(edge.last_seen, Some(t1));
        assert_eq!(edge.subjects, vec!["first".to_string()]);
    }
}
