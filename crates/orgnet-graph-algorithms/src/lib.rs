pub mod common;
pub mod centrality;
pub mod pagerank;
pub mod community;
pub mod topology;

pub use common::GraphView;
pub use centrality::{betweenness_centrality, eigenvector_centrality};
pub use pagerank::{page_rank, PageRankConfig};
pub use community::{
    largest_component_size, louvain_communities, modularity, weakly_connected_components,
    LouvainResult, WccResult,
};
pub use topology::{average_clustering, average_shortest_path_length};
