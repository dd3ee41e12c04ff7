pub mod libs;

pub use libs::cluster::{ClusterOpt, Clusterer};
pub use libs::mum::{Match, MumBlock, MumReader};
