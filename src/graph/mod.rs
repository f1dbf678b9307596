mod graph;
mod io;
mod summary;
mod tree;
mod weights;

pub use graph::Graph;
pub use io::{DualGraph, GraphDocument, NodeRecord};
pub use summary::GraphSummary;
pub(crate) use tree::{bipartition, CutRule};
pub use weights::WeightMatrix;
