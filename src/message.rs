//! Parsed message records consumed by the graph builder.
//!
//! Records arrive from an external parser with addresses already normalized
//! to lowercase. The core treats them as immutable input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed communication record.
///
/// Recipients are partitioned into the three distribution classes of the
/// source format (primary, secondary, hidden). Timestamps are UTC; a missing
/// timestamp is preserved as `None` rather than guessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier assigned by the parser
    pub id: String,

    /// Normalized (lowercase) sender address
    pub sender: String,

    /// Primary recipients
    #[serde(default)]
    pub to: Vec<String>,

    /// Secondary (carbon-copy) recipients
    #[serde(default)]
    pub cc: Vec<String>,

    /// Hidden (blind-copy) recipients
    #[serde(default)]
    pub bcc: Vec<String>,

    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub body: String,

    /// Send time, when the parser could recover one
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Source-folder tag from the archive
    #[serde(default)]
    pub folder: String,
}

impl Message {
    /// Create a message with primary recipients only.
    pub fn new(id: impl Into<String>, sender: impl Into<String>, to: Vec<String>) -> Self {
        Message {
            id: id.into(),
            sender: sender.into(),
            to,
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: String::new(),
            body: String::new(),
            timestamp: None,
            folder: String::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    pub fn with_bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// All recipients across the three distribution classes, in order.
    pub fn all_recipients(&self) -> impl Iterator<Item = &String> {
        self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter())
    }

    /// Total recipient count across all distribution classes.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// Secondary plus hidden recipient count.
    pub fn secondary_recipient_count(&self) -> usize {
        self.cc.len() + self.bcc.len()
    }

    /// A record without a usable sender address cannot be attributed and is
    /// skipped by the builder.
    pub fn has_valid_sender(&self) -> bool {
        !self.sender.is_empty() && self.sender.contains('@')
    }
}

/// Normalize a raw address the way the external parser does: extract the
/// address from a `Name <addr>` form if present, trim and lowercase.
pub fn normalize_address(raw: &str) -> String {
    let inner = match (raw.find('<'), raw.rfind('>')) {
        (Some(start), Some(end)) if start < end => &raw[start + 1..end],
        _ => raw,
    };
    inner.trim().trim_matches(['<', '>']).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_recipients_spans_classes() {
        let msg = Message::new("m1", "a@x.com", vec!["b@x.com".into()])
            .with_cc(vec!["c@x.com".into()])
            .with_bcc(vec!["d@x.com".into()]);

        let all: Vec<&String> = msg.all_recipients().collect();
        assert_eq!(all.len(), 3);
        assert_eq!(msg.recipient_count(), 3);
        assert_eq!(msg.secondary_recipient_count(), 2);
    }

    #[test]
    fn test_sender_validity() {
        assert!(Message::new("m", "a@x.com", vec![]).has_valid_sender());
        assert!(!Message::new("m", "", vec![]).has_valid_sender());
        assert!(!Message::new("m", "nodomain", vec![]).has_valid_sender());
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("John Smith <John.Smith@Corp.com>"), "john.smith@corp.com");
        assert_eq!(normalize_address("  JANE@CORP.COM "), "jane@corp.com");
        assert_eq!(normalize_address("<bare@corp.com>"), "bare@corp.com");
    }
}
