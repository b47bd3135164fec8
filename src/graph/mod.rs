//! Communication graph: arena store, builder and weight engine.
//!
//! Nodes are people keyed by normalized address; edges aggregate directed
//! sender→recipient volume. Downstream pipeline stages write their metrics
//! onto these records in place.

pub mod builder;
pub mod edge;
pub mod node;
pub mod store;
pub mod types;
pub mod weights;

// Re-export main types
pub use builder::{build_graph, extract_display_name, BuilderConfig};
pub use edge::CommunicationEdge;
pub use node::Person;
pub use store::{CommGraph, GraphError, GraphResult};
pub use types::{EdgeId, MetricKind, PersonId};
pub use weights::{compute_weights, WeightConfig};
