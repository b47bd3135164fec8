//! Derived analytics over the enriched communication graph: centrality,
//! community structure, criticality, waste and aggregate health.

pub mod centrality;
pub mod community;
pub mod criticality;
pub mod health;
pub mod waste;

pub use centrality::{compute_centrality, top_by_metric};
pub use community::{detect_communities, Community, CommunityReport};
pub use criticality::{compute_criticality, CriticalityConfig, CriticalityRecord};
pub use health::{compute_health, GraphStats, HealthConfig, HealthReport, SubScores};
pub use waste::{compute_waste, WasteConfig, WasteRecord};
