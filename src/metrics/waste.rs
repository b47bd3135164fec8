//! Communication waste detection.
//!
//! Per-person waste indicators from raw message fan-out patterns plus an
//! orphan measure from the graph structure.

use crate::graph::{CommGraph, MetricKind, PersonId};
use crate::message::Message;
use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Subject prefix marking a reply
const REPLY_PATTERN: &str = r"(?i)^\s*re\s*:";

/// Waste scoring thresholds.
#[derive(Debug, Clone)]
pub struct WasteConfig {
    /// A message is a broadcast when its total recipient count exceeds this
    pub broadcast_threshold: usize,
    /// Reply-marked messages with more recipients than this count as
    /// reply-all traffic
    pub reply_all_recipient_threshold: usize,
    /// Secondary recipients per message at which overproduction saturates
    pub overproduction_cap: f64,
}

impl Default for WasteConfig {
    fn default() -> Self {
        Self {
            broadcast_threshold: 5,
            reply_all_recipient_threshold: 3,
            overproduction_cap: 10.0,
        }
    }
}

/// Per-person waste view, recomputed each run.
#[derive(Debug, Clone)]
pub struct WasteRecord {
    pub id: PersonId,
    pub email: String,
    pub name: String,
    /// Combined waste score in [0, 100]
    pub waste_score: f64,
    /// Mean secondary/hidden recipients per sent message
    pub overproduction: f64,
    /// Share of sent messages exceeding the broadcast threshold
    pub broadcast_ratio: f64,
    /// Share of sent messages matching the reply-all pattern
    pub reply_all_ratio: f64,
    /// Share of outgoing neighbors that never sent anything back
    pub orphan_ratio: f64,
}

#[derive(Default)]
struct SenderStats {
    sent: u64,
    secondary_recipients: u64,
    broadcasts: u64,
    reply_alls: u64,
}

/// Compute waste metrics for every graph node from the raw message list.
///
/// People with zero sent messages get an all-zero record. Results are
/// sorted descending by waste score.
pub fn compute_waste(
    graph: &mut CommGraph,
    messages: &[Message],
    config: &WasteConfig,
) -> Vec<WasteRecord> {
    let reply_subject = Regex::new(REPLY_PATTERN).expect("static reply pattern");

    let mut stats: FxHashMap<PersonId, SenderStats> = FxHashMap::default();
    for message in messages {
        let Some(sender) = graph.person_id(&message.sender) else {
            continue;
        };
        let entry = stats.entry(sender).or_default();
        entry.sent += 1;
        entry.secondary_recipients += message.secondary_recipient_count() as u64;

        let recipients = message.recipient_count();
        if recipients > config.broadcast_threshold {
            entry.broadcasts += 1;
        }
        if recipients > config.reply_all_recipient_threshold
            && reply_subject.is_match(&message.subject)
        {
            entry.reply_alls += 1;
        }
    }

    let mut records: Vec<WasteRecord> = graph
        .people()
        .iter()
        .map(|person| {
            let default = SenderStats::default();
            let s = stats.get(&person.id).unwrap_or(&default);
            if s.sent == 0 {
                return WasteRecord {
                    id: person.id,
                    email: person.email.clone(),
                    name: person.name.clone(),
                    waste_score: 0.0,
                    overproduction: 0.0,
                    broadcast_ratio: 0.0,
                    reply_all_ratio: 0.0,
                    orphan_ratio: 0.0,
                };
            }

            let sent = s.sent as f64;
            let overproduction = s.secondary_recipients as f64 / sent;
            let broadcast_ratio = s.broadcasts as f64 / sent;
            let reply_all_ratio = s.reply_alls as f64 / sent;

            // Orphans: outgoing neighbors with no reverse edge
            let out_neighbors = graph.out_neighbors(person.id);
            let orphan_ratio = if out_neighbors.is_empty() {
                0.0
            } else {
                let orphans = out_neighbors
                    .iter()
                    .filter(|nb| graph.edge_between(**nb, person.id).is_none())
                    .count();
                orphans as f64 / out_neighbors.len() as f64
            };

            let waste_score = 100.0
                * (0.3 * (overproduction / config.overproduction_cap).min(1.0)
                    + 0.3 * broadcast_ratio
                    + 0.2 * reply_all_ratio
                    + 0.2 * orphan_ratio);

            WasteRecord {
                id: person.id,
                email: person.email.clone(),
                name: person.name.clone(),
                waste_score,
                overproduction,
                broadcast_ratio,
                reply_all_ratio,
                orphan_ratio,
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.waste_score
            .partial_cmp(&a.waste_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.email.cmp(&b.email))
    });

    for record in &records {
        graph
            .person_mut(record.id)
            .set_metric(MetricKind::WasteScore, record.waste_score);
    }

    debug!(scored = records.len(), "waste metrics computed");
    records
}
