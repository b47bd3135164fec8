//! Composite edge weight computation.
//!
//! `w(i→j) = α·norm(frequency) + β·norm(recency) + γ·sentiment + δ·response`
//!
//! Sentiment and response efficiency read as neutral 0.5 until enrichment
//! fills them in, so the engine can run once before enrichment and again
//! after with identical semantics.

use super::store::CommGraph;
use crate::config::ConfigError;
use chrono::{DateTime, Utc};

/// Weight engine coefficients and recency parameters.
#[derive(Debug, Clone)]
pub struct WeightConfig {
    /// α: normalized message frequency
    pub frequency_weight: f64,
    /// β: exponential recency decay
    pub recency_weight: f64,
    /// γ: edge sentiment, mapped to [0, 1]
    pub sentiment_weight: f64,
    /// δ: response efficiency
    pub response_weight: f64,
    /// Decay constant in days for the recency exponential
    pub decay_days: f64,
    /// Recency reference point; defaults to the latest edge timestamp, or
    /// the current time when no edge carries one
    pub reference: Option<DateTime<Utc>>,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            frequency_weight: 0.4,
            recency_weight: 0.2,
            sentiment_weight: 0.2,
            response_weight: 0.2,
            decay_days: 180.0,
            reference: None,
        }
    }
}

impl WeightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let components = [
            ("frequency", self.frequency_weight),
            ("recency", self.recency_weight),
            ("sentiment", self.sentiment_weight),
            ("response", self.response_weight),
        ];
        for (name, value) in components {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        let sum: f64 = components.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSumMismatch {
                group: "edge weight",
                expected: 1.0,
                actual: sum,
            });
        }
        if self.decay_days <= 0.0 {
            return Err(ConfigError::InvalidDecay(self.decay_days));
        }
        Ok(())
    }
}

/// Compute composite weights for every edge.
///
/// Idempotent and re-runnable: a second invocation after sentiment
/// enrichment recomputes with the real sentiment values in place of the
/// neutral defaults. All timestamps are UTC, so the day arithmetic never
/// mixes clock conventions.
pub fn compute_weights(graph: &mut CommGraph, config: &WeightConfig) {
    if graph.edge_count() == 0 {
        return;
    }

    let max_count = graph
        .edges()
        .iter()
        .map(|e| e.message_count)
        .max()
        .unwrap_or(0) as f64;

    let reference = config
        .reference
        .or_else(|| graph.edges().iter().filter_map(|e| e.last_seen).max())
        .unwrap_or_else(Utc::now);

    for edge in graph.edges_mut() {
        let norm_frequency = if max_count > 0.0 {
            edge.message_count as f64 / max_count
        } else {
            0.0
        };

        let norm_recency = match edge.last_seen {
            Some(last) => {
                let days_ago = (reference - last).num_seconds() as f64 / 86_400.0;
                (-days_ago / config.decay_days).exp().min(1.0)
            }
            None => 0.5, // neutral if unknown
        };

        // Polarity is [-1, 1]; the weight component uses its [0, 1] image so
        // the composite stays within [0, 1].
        let sentiment = edge.sentiment.map(|s| (s + 1.0) / 2.0).unwrap_or(0.5);
        let response = edge.response_efficiency.unwrap_or(0.5);

        edge.norm_frequency = norm_frequency;
        edge.norm_recency = norm_recency;
        edge.weight = config.frequency_weight * norm_frequency
            + config.recency_weight * norm_recency
            + config.sentiment_weight * sentiment
            + config.response_weight * response;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::{build_graph, BuilderConfig};
    use crate::message::Message;
    use chrono::TimeZone;

    fn graph_with_two_edges() -> CommGraph {
        let t_old = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let t_new = Utc.with_ymd_and_hms(2001, 12, 1, 0, 0, 0).unwrap();
        let mut messages = Vec::new();
        for _ in 0..6 {
            messages.push(
                Message::new("m", "a@x.com", vec!["b@x.com".into()]).with_timestamp(t_new),
            );
        }
        for _ in 0..3 {
            messages.push(
                Message::new("m", "b@x.com", vec!["a@x.com".into()]).with_timestamp(t_old),
            );
        }
        build_graph(&messages, &BuilderConfig::default()).unwrap()
    }

    #[test]
    fn test_weights_in_unit_range() {
        let mut graph = graph_with_two_edges();
        compute_weights(&mut graph, &WeightConfig::default());
        for edge in graph.edges() {
            assert!(edge.weight >= 0.0 && edge.weight <= 1.0);
            assert!(edge.norm_frequency > 0.0 && edge.norm_frequency <= 1.0);
            assert!(edge.norm_recency > 0.0 && edge.norm_recency <= 1.0);
        }
    }

    #[test]
    fn test_frequency_and_recency_ordering() {
        let mut graph = graph_with_two_edges();
        compute_weights(&mut graph, &WeightConfig::default());

        let a = graph.person_id("a@x.com").unwrap();
        let b = graph.person_id("b@x.com").unwrap();
        let ab = graph.edge(graph.edge_between(a, b).unwrap());
        let ba = graph.edge(graph.edge_between(b, a).unwrap());

        // a→b is both busier and more recent
        assert_eq!(ab.norm_frequency, 1.0);
        assert!(ba.norm_frequency < 1.0);
        assert!(ab.norm_recency > ba.norm_recency);
        assert!(ab.weight > ba.weight);
    }

    #[test]
    fn test_missing_timestamp_gets_neutral_recency() {
        let mut messages = Vec::new();
        for _ in 0..3 {
            messages.push(Message::new("m", "a@x.com", vec!["b@x.com".into()]));
        }
        let mut graph = build_graph(&messages, &BuilderConfig::default()).unwrap();
        compute_weights(&mut graph, &WeightConfig::default());
        assert_eq!(graph.edges()[0].norm_recency, 0.5);
    }

    #[test]
    fn test_rerun_after_enrichment_uses_real_sentiment() {
        let mut graph = graph_with_two_edges();
        let config = WeightConfig::default();
        compute_weights(&mut graph, &config);
        let before = graph.edges()[0].weight;

        // Simulate enrichment with a strongly negative polarity
        let first = graph.edges()[0].id;
        graph.edge_mut(first).sentiment = Some(-1.0);
        compute_weights(&mut graph, &config);
        let after = graph.edges()[0].weight;

        // Neutral 0.5 component replaced by 0.0
        assert!((before - after - config.sentiment_weight * 0.5).abs() < 1e-9);
        assert!(after >= 0.0);
    }

    #[test]
    fn test_idempotent_on_unchanged_graph() {
        let mut graph = graph_with_two_edges();
        let config = WeightConfig::default();
        compute_weights(&mut graph, &config);
        let first: Vec<f64> = graph.edges().iter().map(|e| e.weight).collect();
        compute_weights(&mut graph, &config);
        let second: Vec<f64> = graph.edges().iter().map(|e| e.weight).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_validation() {
        assert!(WeightConfig::default().validate().is_ok());

        let negative = WeightConfig {
            frequency_weight: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::NegativeWeight { .. })
        ));

        let skewed = WeightConfig {
            frequency_weight: 0.9,
            ..Default::default()
        };
        assert!(matches!(
            skewed.validate(),
            Err(ConfigError::WeightSumMismatch { .. })
        ));

        let bad_decay = WeightConfig {
            decay_days: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_decay.validate(),
            Err(ConfigError::InvalidDecay(_))
        ));
    }
}
