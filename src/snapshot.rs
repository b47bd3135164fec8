//! Serializable snapshots handed to external consumers (API layer,
//! exporter).
//!
//! All numeric fields are rounded to fixed precision so repeated runs over
//! the same corpus produce byte-comparable output: 6 digits for centrality
//! scores, 4 for weights/sentiment/densities, 1 for percentage-like values.

use crate::graph::{CommGraph, MetricKind, PersonId};
use crate::metrics::{CommunityReport, CriticalityRecord, HealthReport, WasteRecord};
use crate::metrics::centrality::top_by_metric;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Round to a fixed number of decimal digits.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

pub fn round4(value: f64) -> f64 {
    round_to(value, 4)
}

pub fn round6(value: f64) -> f64 {
    round_to(value, 6)
}

/// One node in the exported graph.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub name: String,
    pub email: String,
    pub total_sent: u64,
    pub total_received: u64,
    pub department: Option<String>,
    pub community_id: Option<usize>,
    pub pagerank: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub degree_centrality: f64,
    pub in_degree_centrality: f64,
    pub out_degree_centrality: f64,
    pub avg_sent_sentiment: f64,
    pub avg_received_sentiment: f64,
}

/// One directed edge in the exported graph.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeSnapshot {
    pub source: String,
    pub target: String,
    pub email_count: u64,
    pub weight: f64,
    pub norm_frequency: f64,
    pub norm_recency: f64,
    pub sentiment: Option<f64>,
    pub sentiment_asymmetry: f64,
    pub first_email: Option<DateTime<Utc>>,
    pub last_email: Option<DateTime<Utc>>,
}

/// Full graph export: node list plus edge list.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    pub fn from_graph(graph: &CommGraph) -> Self {
        let nodes = graph
            .people()
            .iter()
            .map(|p| NodeSnapshot {
                id: p.email.clone(),
                name: p.name.clone(),
                email: p.email.clone(),
                total_sent: p.total_sent,
                total_received: p.total_received,
                department: p.department.clone(),
                community_id: p.community,
                pagerank: round6(p.metric(MetricKind::Pagerank)),
                betweenness: round6(p.metric(MetricKind::BetweennessCentrality)),
                eigenvector: round6(p.metric(MetricKind::EigenvectorCentrality)),
                degree_centrality: round6(p.metric(MetricKind::DegreeCentrality)),
                in_degree_centrality: round6(p.metric(MetricKind::InDegreeCentrality)),
                out_degree_centrality: round6(p.metric(MetricKind::OutDegreeCentrality)),
                avg_sent_sentiment: round4(p.avg_sent_sentiment),
                avg_received_sentiment: round4(p.avg_received_sentiment),
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeSnapshot {
                source: graph.person(e.source).email.clone(),
                target: graph.person(e.target).email.clone(),
                email_count: e.message_count,
                weight: round4(e.weight),
                norm_frequency: round4(e.norm_frequency),
                norm_recency: round4(e.norm_recency),
                sentiment: e.sentiment.map(round4),
                sentiment_asymmetry: round4(e.sentiment_asymmetry),
                first_email: e.first_seen,
                last_email: e.last_seen,
            })
            .collect();

        GraphSnapshot { nodes, edges }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityEntry {
    pub id: usize,
    pub members: Vec<String>,
    pub size: usize,
    pub density: f64,
    pub label: String,
}

/// Community structure export.
#[derive(Debug, Clone, Serialize)]
pub struct CommunitySnapshot {
    pub communities: Vec<CommunityEntry>,
    pub bridge_nodes: Vec<String>,
    pub modularity: f64,
}

impl CommunitySnapshot {
    pub fn from_report(graph: &CommGraph, report: &CommunityReport) -> Self {
        CommunitySnapshot {
            communities: report
                .communities
                .iter()
                .map(|c| CommunityEntry {
                    id: c.id,
                    members: c
                        .members
                        .iter()
                        .map(|m| graph.person(*m).email.clone())
                        .collect(),
                    size: c.size,
                    density: round4(c.density),
                    label: c.label.clone(),
                })
                .collect(),
            bridge_nodes: report
                .bridge_nodes
                .iter()
                .map(|id| graph.person(*id).email.clone())
                .collect(),
            modularity: round4(report.modularity),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CriticalityEntry {
    pub id: String,
    pub name: String,
    pub dms_score: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub redundancy: f64,
    pub impact_pct: f64,
}

impl CriticalityEntry {
    fn from_record(record: &CriticalityRecord) -> Self {
        CriticalityEntry {
            id: record.email.clone(),
            name: record.name.clone(),
            dms_score: round4(record.score),
            betweenness: round6(record.betweenness),
            eigenvector: round6(record.eigenvector),
            redundancy: round4(record.redundancy),
            impact_pct: round1(record.impact_pct),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WasteEntry {
    pub id: String,
    pub name: String,
    pub waste_score: f64,
    pub overproduction: f64,
    pub broadcast_ratio: f64,
    pub reply_all_ratio: f64,
    pub orphan_ratio: f64,
}

impl WasteEntry {
    fn from_record(record: &WasteRecord) -> Self {
        WasteEntry {
            id: record.email.clone(),
            name: record.name.clone(),
            waste_score: round1(record.waste_score),
            overproduction: round4(record.overproduction),
            broadcast_ratio: round4(record.broadcast_ratio),
            reply_all_ratio: round4(record.reply_all_ratio),
            orphan_ratio: round4(record.orphan_ratio),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedScore {
    pub id: String,
    pub name: String,
    pub score: f64,
}

/// Top-20 rankings per centrality type.
#[derive(Debug, Clone, Serialize)]
pub struct CentralityLeaders {
    pub pagerank: Vec<RankedScore>,
    pub betweenness: Vec<RankedScore>,
    pub eigenvector: Vec<RankedScore>,
    pub degree: Vec<RankedScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubScoreSnapshot {
    pub connectivity: f64,
    pub bottleneck_risk: f64,
    pub silo_score: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub avg_path_length: Option<f64>,
    pub clustering_coefficient: f64,
    pub communities_count: usize,
    pub modularity: f64,
    pub gcc_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub health_score: f64,
    pub grade: &'static str,
    pub sub_scores: SubScoreSnapshot,
    pub stats: StatsSnapshot,
}

impl HealthSnapshot {
    pub fn from_report(report: &HealthReport) -> Self {
        HealthSnapshot {
            health_score: round1(report.score),
            grade: report.grade,
            // Sub-scores export as 0–100 percentages
            sub_scores: SubScoreSnapshot {
                connectivity: round1(report.sub_scores.connectivity * 100.0),
                bottleneck_risk: round1(report.sub_scores.bottleneck_risk * 100.0),
                silo_score: round1(report.sub_scores.silo_score * 100.0),
                efficiency: round1(report.sub_scores.efficiency * 100.0),
            },
            stats: StatsSnapshot {
                node_count: report.stats.node_count,
                edge_count: report.stats.edge_count,
                density: round6(report.stats.density),
                avg_path_length: report.stats.avg_path_length.map(round4),
                clustering_coefficient: round4(report.stats.clustering_coefficient),
                communities_count: report.stats.community_count,
                modularity: round4(report.stats.modularity),
                gcc_ratio: round4(report.stats.giant_component_ratio),
            },
        }
    }
}

/// Top-level metrics export: health, criticality and waste leaders, and
/// per-centrality rankings.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsBundle {
    pub health: HealthSnapshot,
    pub dead_man_switch: Vec<CriticalityEntry>,
    pub waste: Vec<WasteEntry>,
    pub top_centrality: CentralityLeaders,
}

impl MetricsBundle {
    pub fn new(
        graph: &CommGraph,
        health: &HealthReport,
        criticality: &[CriticalityRecord],
        waste: &[WasteRecord],
    ) -> Self {
        let leaders = |kind: MetricKind| -> Vec<RankedScore> {
            top_by_metric(graph, kind, 20)
                .into_iter()
                .map(|(id, score)| RankedScore {
                    id: graph.person(id).email.clone(),
                    name: graph.person(id).name.clone(),
                    score: round6(score),
                })
                .collect()
        };

        MetricsBundle {
            health: HealthSnapshot::from_report(health),
            dead_man_switch: criticality
                .iter()
                .take(20)
                .map(CriticalityEntry::from_record)
                .collect(),
            waste: waste.iter().take(20).map(WasteEntry::from_record).collect(),
            top_centrality: CentralityLeaders {
                pagerank: leaders(MetricKind::Pagerank),
                betweenness: leaders(MetricKind::BetweennessCentrality),
                eigenvector: leaders(MetricKind::EigenvectorCentrality),
                degree: leaders(MetricKind::DegreeCentrality),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonSentiment {
    pub avg_sent: f64,
    pub avg_received: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionEntry {
    pub id: String,
    pub name: String,
    pub direction: &'static str,
    pub email_count: u64,
    pub weight: f64,
    pub sentiment: Option<f64>,
}

/// Per-person profile view: metrics, sentiment, criticality and waste
/// records, and the strongest connections in both directions.
#[derive(Debug, Clone, Serialize)]
pub struct PersonProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub community_id: Option<usize>,
    pub metrics: BTreeMap<&'static str, f64>,
    pub sentiment: PersonSentiment,
    pub dead_man_switch: Option<CriticalityEntry>,
    pub waste: Option<WasteEntry>,
    pub connections: Vec<ConnectionEntry>,
}

impl PersonProfile {
    /// Build the profile for one person; `None` when the address is not a
    /// graph node.
    pub fn build(
        graph: &CommGraph,
        email: &str,
        criticality: &[CriticalityRecord],
        waste: &[WasteRecord],
    ) -> Option<Self> {
        let id = graph.person_id(email)?;
        let person = graph.person(id);

        let metrics: BTreeMap<&'static str, f64> = person
            .metrics
            .iter()
            .map(|(kind, value)| (kind.as_str(), round6(*value)))
            .collect();

        let mut connections = Vec::new();
        connections.extend(top_connections(graph, graph.out_edges(id), "outgoing", true));
        connections.extend(top_connections(graph, graph.in_edges(id), "incoming", false));

        Some(PersonProfile {
            id: person.email.clone(),
            name: person.name.clone(),
            email: person.email.clone(),
            community_id: person.community,
            metrics,
            sentiment: PersonSentiment {
                avg_sent: round4(person.avg_sent_sentiment),
                avg_received: round4(person.avg_received_sentiment),
            },
            dead_man_switch: criticality
                .iter()
                .find(|r| r.id == id)
                .map(CriticalityEntry::from_record),
            waste: waste.iter().find(|r| r.id == id).map(WasteEntry::from_record),
            connections,
        })
    }
}

/// Top-20 connections over one adjacency list, ordered by weight descending
/// with address tie-break.
fn top_connections(
    graph: &CommGraph,
    edge_ids: &[crate::graph::EdgeId],
    direction: &'static str,
    outgoing: bool,
) -> Vec<ConnectionEntry> {
    let other = |eid: crate::graph::EdgeId| -> PersonId {
        let edge = graph.edge(eid);
        if outgoing {
            edge.target
        } else {
            edge.source
        }
    };

    let mut sorted: Vec<_> = edge_ids.to_vec();
    sorted.sort_by(|a, b| {
        let (ea, eb) = (graph.edge(*a), graph.edge(*b));
        eb.weight
            .partial_cmp(&ea.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                graph
                    .person(other(*a))
                    .email
                    .cmp(&graph.person(other(*b)).email)
            })
    });
    sorted.truncate(20);

    sorted
        .into_iter()
        .map(|eid| {
            let edge = graph.edge(eid);
            let counterpart = graph.person(other(eid));
            ConnectionEntry {
                id: counterpart.email.clone(),
                name: counterpart.name.clone(),
                direction,
                email_count: edge.message_count,
                weight: round4(edge.weight),
                sentiment: edge.sentiment.map(round4),
            }
        })
        .collect()
}
