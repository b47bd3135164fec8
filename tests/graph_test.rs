//! Integration tests for graph construction, weighting and enrichment.

use chrono::{TimeZone, Utc};
use orgnet::graph::{build_graph, compute_weights, BuilderConfig, WeightConfig};
use orgnet::message::Message;
use orgnet::sentiment::{enrich_graph, SentimentLexicon};

fn msg(sender: &str, to: &[&str]) -> Message {
    Message::new("m", sender, to.iter().map(|s| s.to_string()).collect())
}

/// Mixed corpus: reciprocated pairs, a one-way flow, sub-threshold chatter
/// and self-mail.
fn mixed_corpus() -> Vec<Message> {
    let mut messages = Vec::new();
    let t = Utc.with_ymd_and_hms(2001, 8, 1, 9, 0, 0).unwrap();

    for i in 0..5 {
        messages.push(
            msg("ana@corp.com", &["bo@corp.com"])
                .with_subject(format!("update {i}"))
                .with_body("thanks, looks good")
                .with_timestamp(t),
        );
    }
    for _ in 0..3 {
        messages.push(
            msg("bo@corp.com", &["ana@corp.com"])
                .with_body("there is a problem with the numbers")
                .with_timestamp(t),
        );
    }
    // One-way only: carl never gets a reply
    for _ in 0..4 {
        messages.push(msg("carl@corp.com", &["ana@corp.com"]).with_timestamp(t));
    }
    // Below threshold
    messages.push(msg("dee@corp.com", &["ana@corp.com"]));
    messages.push(msg("dee@corp.com", &["ana@corp.com"]));
    // Self-mail
    for _ in 0..3 {
        messages.push(msg("ana@corp.com", &["ana@corp.com"]));
    }
    messages
}

#[test]
fn test_every_edge_meets_threshold() {
    let graph = build_graph(&mixed_corpus(), &BuilderConfig::default()).unwrap();
    for edge in graph.edges() {
        assert!(edge.message_count >= 3);
    }
    // dee's two messages never materialize
    assert!(graph.person_by_address("dee@corp.com").is_none());
}

#[test]
fn test_no_self_loops() {
    let graph = build_graph(&mixed_corpus(), &BuilderConfig::default()).unwrap();
    for edge in graph.edges() {
        assert_ne!(edge.source, edge.target);
    }
}

#[test]
fn test_directionality_is_independent() {
    let graph = build_graph(&mixed_corpus(), &BuilderConfig::default()).unwrap();

    let carl = graph.person_id("carl@corp.com").unwrap();
    let ana = graph.person_id("ana@corp.com").unwrap();

    // carl→ana exists, ana→carl does not
    assert!(graph.edge_between(carl, ana).is_some());
    assert!(graph.edge_between(ana, carl).is_none());
}

#[test]
fn test_edge_counts_per_direction() {
    let graph = build_graph(&mixed_corpus(), &BuilderConfig::default()).unwrap();
    let ana = graph.person_id("ana@corp.com").unwrap();
    let bo = graph.person_id("bo@corp.com").unwrap();

    let ab = graph.edge(graph.edge_between(ana, bo).unwrap());
    let ba = graph.edge(graph.edge_between(bo, ana).unwrap());
    assert_eq!(ab.message_count, 5);
    assert_eq!(ba.message_count, 3);
}

#[test]
fn test_weight_in_unit_range_after_both_passes() {
    let messages = mixed_corpus();
    let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
    let weights = WeightConfig::default();

    compute_weights(&mut graph, &weights);
    for edge in graph.edges() {
        assert!(edge.weight >= 0.0 && edge.weight <= 1.0, "first pass");
    }

    enrich_graph(&mut graph, &messages, &SentimentLexicon::default());
    compute_weights(&mut graph, &weights);
    for edge in graph.edges() {
        assert!(edge.weight >= 0.0 && edge.weight <= 1.0, "second pass");
    }
}

#[test]
fn test_second_pass_reflects_sentiment() {
    let messages = mixed_corpus();
    let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
    let weights = WeightConfig::default();
    compute_weights(&mut graph, &weights);
    enrich_graph(&mut graph, &messages, &SentimentLexicon::default());
    compute_weights(&mut graph, &weights);

    let ana = graph.person_id("ana@corp.com").unwrap();
    let bo = graph.person_id("bo@corp.com").unwrap();
    let ab = graph.edge(graph.edge_between(ana, bo).unwrap());
    let ba = graph.edge(graph.edge_between(bo, ana).unwrap());

    // ana writes thanks, bo reports problems
    assert!(ab.sentiment.unwrap() > 0.0);
    assert!(ba.sentiment.unwrap() < 0.0);
    assert!(ab.sentiment_asymmetry > 0.0);
}

#[test]
fn test_display_names() {
    assert_eq!(
        orgnet::extract_display_name("john.smith@enron.com"),
        "John Smith"
    );
    assert_eq!(
        orgnet::extract_display_name("john_smith@enron.com"),
        "John Smith"
    );
    assert_eq!(orgnet::extract_display_name("john@enron.com"), "John");
}

#[test]
fn test_sub_threshold_direction_yields_no_edge() {
    // Only 2 qualifying messages in one direction at threshold 3
    let messages = vec![
        msg("a@corp.com", &["b@corp.com"]),
        msg("a@corp.com", &["b@corp.com"]),
    ];
    let graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.node_count(), 0);
}

#[test]
fn test_recency_ordering() {
    let old = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let new = Utc.with_ymd_and_hms(2001, 12, 1, 0, 0, 0).unwrap();

    let mut messages = Vec::new();
    for _ in 0..3 {
        messages.push(msg("stale@corp.com", &["hub@corp.com"]).with_timestamp(old));
        messages.push(msg("fresh@corp.com", &["hub@corp.com"]).with_timestamp(new));
    }
    let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
    compute_weights(&mut graph, &WeightConfig::default());

    let hub = graph.person_id("hub@corp.com").unwrap();
    let stale = graph.person_id("stale@corp.com").unwrap();
    let fresh = graph.person_id("fresh@corp.com").unwrap();

    let stale_edge = graph.edge(graph.edge_between(stale, hub).unwrap());
    let fresh_edge = graph.edge(graph.edge_between(fresh, hub).unwrap());
    assert!(fresh_edge.norm_recency > stale_edge.norm_recency);
    assert!(fresh_edge.weight > stale_edge.weight);
}
