//! Graph sentiment enrichment and summary statistics.

use super::lexicon::SentimentLexicon;
use crate::graph::{CommGraph, EdgeId, PersonId};
use crate::message::Message;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug;

/// Score every message body and fold the polarities onto the graph.
///
/// Per surviving edge: mean polarity of the messages behind it plus the
/// contributing count. Per node: mean polarity sent and received (0 when no
/// qualifying messages). Once every edge carries its sentiment, the
/// asymmetry against the reverse edge is filled in. Must run before the
/// second weight pass.
pub fn enrich_graph(graph: &mut CommGraph, messages: &[Message], lexicon: &SentimentLexicon) {
    // Scoring is independent per message; results are merged by index.
    let polarities: Vec<f64> = messages
        .par_iter()
        .map(|m| lexicon.polarity(&m.body))
        .collect();

    let mut edge_acc: FxHashMap<EdgeId, (f64, u64)> = FxHashMap::default();
    let mut sent_acc: FxHashMap<PersonId, (f64, u64)> = FxHashMap::default();
    let mut received_acc: FxHashMap<PersonId, (f64, u64)> = FxHashMap::default();

    for (message, &polarity) in messages.iter().zip(&polarities) {
        let sender = graph.person_id(&message.sender);
        if let Some(sid) = sender {
            let entry = sent_acc.entry(sid).or_insert((0.0, 0));
            entry.0 += polarity;
            entry.1 += 1;
        }

        // Each distinct recipient contributes once per message
        let mut seen_recipients: FxHashSet<&str> = FxHashSet::default();
        for recipient in message.all_recipients() {
            if *recipient == message.sender || !seen_recipients.insert(recipient.as_str()) {
                continue;
            }
            let recipient_id = graph.person_id(recipient);
            if let Some(rid) = recipient_id {
                let entry = received_acc.entry(rid).or_insert((0.0, 0));
                entry.0 += polarity;
                entry.1 += 1;
            }
            if let (Some(sid), Some(rid)) = (sender, recipient_id) {
                if let Some(eid) = graph.edge_between(sid, rid) {
                    let entry = edge_acc.entry(eid).or_insert((0.0, 0));
                    entry.0 += polarity;
                    entry.1 += 1;
                }
            }
        }
    }

    for (&eid, &(sum, count)) in &edge_acc {
        let edge = graph.edge_mut(eid);
        edge.sentiment = Some(sum / count as f64);
        edge.sentiment_count = count;
    }

    for person in graph.people_mut() {
        if let Some(&(sum, count)) = sent_acc.get(&person.id) {
            person.avg_sent_sentiment = sum / count as f64;
        }
        if let Some(&(sum, count)) = received_acc.get(&person.id) {
            person.avg_received_sentiment = sum / count as f64;
        }
    }

    // Asymmetry needs every edge's sentiment settled first.
    let asymmetries: Vec<(EdgeId, f64)> = graph
        .edges()
        .iter()
        .map(|edge| {
            let forward = edge.sentiment.unwrap_or(0.0);
            let reverse = graph
                .edge_between(edge.target, edge.source)
                .and_then(|eid| graph.edge(eid).sentiment)
                .unwrap_or(0.0);
            (edge.id, (forward - reverse).abs())
        })
        .collect();
    for (eid, asymmetry) in asymmetries {
        graph.edge_mut(eid).sentiment_asymmetry = asymmetry;
    }

    debug!(
        enriched_edges = edge_acc.len(),
        messages = messages.len(),
        "sentiment enrichment complete"
    );
}

/// Edge counts per polarity bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SentimentDistribution {
    pub very_negative: u64,
    pub negative: u64,
    pub neutral: u64,
    pub positive: u64,
    pub very_positive: u64,
}

/// One edge in the top-negative / top-positive listings.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentEdgeRef {
    pub source: String,
    pub target: String,
    pub source_name: String,
    pub target_name: String,
    pub sentiment: f64,
}

/// Corpus-wide sentiment summary derived from the enriched graph.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentSummary {
    pub avg_sentiment: f64,
    pub total_edges_with_sentiment: u64,
    pub distribution: SentimentDistribution,
    pub top_negative: Vec<SentimentEdgeRef>,
    pub top_positive: Vec<SentimentEdgeRef>,
}

/// Summarize edge sentiment: overall mean, five polarity buckets, and the
/// ten most negative / most positive edges with participant names.
pub fn sentiment_summary(graph: &CommGraph) -> SentimentSummary {
    let mut all = Vec::new();
    let mut negative_edges = Vec::new();
    let mut positive_edges = Vec::new();
    let mut distribution = SentimentDistribution::default();

    for edge in graph.edges() {
        let Some(s) = edge.sentiment else {
            continue;
        };
        all.push(s);

        if s < -0.3 {
            distribution.very_negative += 1;
        } else if s < -0.1 {
            distribution.negative += 1;
        } else if s < 0.1 {
            distribution.neutral += 1;
        } else if s < 0.3 {
            distribution.positive += 1;
        } else {
            distribution.very_positive += 1;
        }

        let entry = SentimentEdgeRef {
            source: graph.person(edge.source).email.clone(),
            target: graph.person(edge.target).email.clone(),
            source_name: graph.person(edge.source).name.clone(),
            target_name: graph.person(edge.target).name.clone(),
            sentiment: crate::snapshot::round4(s),
        };
        if s < -0.1 {
            negative_edges.push(entry);
        } else if s > 0.2 {
            positive_edges.push(entry);
        }
    }

    let avg = if all.is_empty() {
        0.0
    } else {
        all.iter().sum::<f64>() / all.len() as f64
    };

    negative_edges.sort_by(|a, b| {
        a.sentiment
            .partial_cmp(&b.sentiment)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    positive_edges.sort_by(|a, b| {
        b.sentiment
            .partial_cmp(&a.sentiment)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    negative_edges.truncate(10);
    positive_edges.truncate(10);

    SentimentSummary {
        avg_sentiment: crate::snapshot::round4(avg),
        total_edges_with_sentiment: all.len() as u64,
        distribution,
        top_negative: negative_edges,
        top_positive: positive_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::{build_graph, BuilderConfig};

    fn corpus() -> Vec<Message> {
        let mut messages = Vec::new();
        for _ in 0..3 {
            messages.push(
                Message::new("m", "a@x.com", vec!["b@x.com".into()])
                    .with_body("Thanks for the excellent work, much appreciated."),
            );
            messages.push(
                Message::new("m", "b@x.com", vec!["a@x.com".into()])
                    .with_body("This is a terrible problem and a total failure."),
            );
        }
        messages
    }

    fn enriched_graph() -> CommGraph {
        let messages = corpus();
        let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        enrich_graph(&mut graph, &messages, &SentimentLexicon::default());
        graph
    }

    #[test]
    fn test_edge_sentiment_direction_independent() {
        let graph = enriched_graph();
        let a = graph.person_id("a@x.com").unwrap();
        let b = graph.person_id("b@x.com").unwrap();

        let ab = graph.edge(graph.edge_between(a, b).unwrap());
        let ba = graph.edge(graph.edge_between(b, a).unwrap());

        assert!(ab.sentiment.unwrap() > 0.0);
        assert!(ba.sentiment.unwrap() < 0.0);
        assert_eq!(ab.sentiment_count, 3);
        assert_eq!(ba.sentiment_count, 3);
    }

    #[test]
    fn test_node_sentiment_averages() {
        let graph = enriched_graph();
        let a = graph.person_by_address("a@x.com").unwrap();

        assert!(a.avg_sent_sentiment > 0.0);
        assert!(a.avg_received_sentiment < 0.0);
    }

    #[test]
    fn test_asymmetry_between_directions() {
        let graph = enriched_graph();
        let a = graph.person_id("a@x.com").unwrap();
        let b = graph.person_id("b@x.com").unwrap();
        let ab = graph.edge(graph.edge_between(a, b).unwrap());
        let ba = graph.edge(graph.edge_between(b, a).unwrap());

        assert!(ab.sentiment_asymmetry > 0.0);
        assert_eq!(ab.sentiment_asymmetry, ba.sentiment_asymmetry);
    }

    #[test]
    fn test_asymmetry_zero_without_reverse_edge() {
        let messages: Vec<Message> = (0..3)
            .map(|_| {
                Message::new("m", "a@x.com", vec!["b@x.com".into()]).with_body("all good, thanks")
            })
            .collect();
        let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        enrich_graph(&mut graph, &messages, &SentimentLexicon::default());

        let edge = &graph.edges()[0];
        // Reverse edge absent: asymmetry is |sentiment - 0|
        assert!((edge.sentiment_asymmetry - edge.sentiment.unwrap().abs()).abs() < 1e-9);
    }

    #[test]
    fn test_summary_buckets_and_tops() {
        let graph = enriched_graph();
        let summary = sentiment_summary(&graph);

        assert_eq!(summary.total_edges_with_sentiment, 2);
        assert_eq!(summary.top_negative.len(), 1);
        assert_eq!(summary.top_positive.len(), 1);
        assert_eq!(summary.top_negative[0].source_name, "B");
        let total = summary.distribution.very_negative
            + summary.distribution.negative
            + summary.distribution.neutral
            + summary.distribution.positive
            + summary.distribution.very_positive;
        assert_eq!(total, 2);
    }

    #[test]
    fn test_summary_on_empty_graph() {
        let graph = CommGraph::new();
        let summary = sentiment_summary(&graph);
        assert_eq!(summary.avg_sentiment, 0.0);
        assert_eq!(summary.total_edges_with_sentiment, 0);
        assert!(summary.top_negative.is_empty());
    }
}
