//! Message polarity scoring and graph sentiment enrichment.

pub mod enricher;
pub mod lexicon;

pub use enricher::{
    enrich_graph, sentiment_summary, SentimentDistribution, SentimentEdgeRef, SentimentSummary,
};
pub use lexicon::SentimentLexicon;
