use std::sync::Arc;

use crate::{graph::{Graph, WeightMatrix}, partition::PartitionSet};

/// A partition of a graph into labelled parts (districts), with cached aggregates.
#[derive(Clone, Debug)]
pub(crate) struct Partition {
    pub(super) parts: PartitionSet,     // Sets of nodes in each part
    pub(super) part_weights: WeightMatrix, // Per-part totals of every node series
    pub(super) cut_edges: usize,        // Number of edges whose endpoints lie in different parts
    pub(super) graph: Arc<Graph>,       // Reference to unit graph (for access to weights)
}

impl Partition {
    /// Construct a partition from a complete assignment of nodes to parts `0..num_parts`.
    pub(crate) fn new(num_parts: usize, graph: impl Into<Arc<Graph>>, assignments: &[u32]) -> Self {
        let graph: Arc<Graph> = graph.into();
        assert!(assignments.len() == graph.node_count(), "assignments.len() must equal number of nodes");

        let parts = PartitionSet::from_labels(num_parts, assignments);

        let mut part_weights = graph.node_weights().copy_of_size(num_parts);
        for part in 0..num_parts as u32 {
            part_weights.add_rows_from(part as usize, graph.node_weights(), parts.get(part));
        }

        let cut_edges = graph.edge_pairs()
            .filter(|&(u, v)| assignments[u] != assignments[v])
            .count();

        Self { parts, part_weights, cut_edges, graph }
    }

    /// Get the number of parts in this partition.
    #[inline] pub(crate) fn num_parts(&self) -> u32 { self.parts.num_sets() as u32 }

    /// Get the number of nodes in the underlying graph.
    #[inline] pub(crate) fn num_nodes(&self) -> usize { self.graph.node_count() }

    /// Get a reference to the underlying graph.
    #[inline] pub(crate) fn graph(&self) -> &Graph { &self.graph }

    /// Get a shared handle to the underlying graph.
    #[inline] pub(crate) fn graph_handle(&self) -> Arc<Graph> { Arc::clone(&self.graph) }

    /// Get the part assignment of a given node.
    #[inline] pub(crate) fn assignment(&self, node: usize) -> u32 { self.parts.find(node) }

    /// Get the part assignment of every node.
    #[inline] pub(crate) fn assignments(&self) -> &[u32] { self.parts.labels() }

    /// Get the nodes of a given part.
    #[inline] pub(crate) fn part_nodes(&self, part: u32) -> &[usize] { self.parts.get(part) }

    /// Sum of a given series for a specific part, or None if the series is unknown.
    #[inline]
    pub(crate) fn part_total(&self, series: &str, part: u32) -> Option<f64> {
        self.part_weights.get(series, part as usize)
    }

    /// Sum of a given series over the whole graph.
    #[inline]
    pub(crate) fn region_total(&self, series: &str) -> Option<f64> {
        self.graph.node_weights().total(series)
    }

    /// Check whether a series is present in node weights.
    #[inline] pub(crate) fn has_series(&self, series: &str) -> bool { self.part_weights.contains(series) }

    /// Number of cut edges.
    #[inline] pub(crate) fn num_cut_edges(&self) -> usize { self.cut_edges }

    /// Iterate the cut edges as `(u, v)` with `u < v`.
    pub(crate) fn cut_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.edge_pairs().filter(|&(u, v)| self.assignment(u) != self.assignment(v))
    }

    /// Number of cut edges with at least one endpoint in `nodes`, each counted once.
    /// `in_nodes` must be true exactly for members of `nodes`.
    pub(super) fn cut_edges_touching(&self, nodes: &[usize], in_nodes: &[bool]) -> usize {
        nodes.iter()
            .map(|&u| {
                self.graph.edges(u)
                    .filter(|&v| (!in_nodes[v] || u < v) && self.assignment(u) != self.assignment(v))
                    .count()
            })
            .sum()
    }

    /// Check whether a part induces a connected subgraph. Empty parts are not contiguous.
    pub(crate) fn part_is_contiguous(&self, part: u32) -> bool {
        let nodes = self.parts.get(part);
        if nodes.is_empty() { return false }

        let in_part = (0..self.num_nodes())
            .map(|u| self.assignment(u) == part)
            .collect::<Vec<_>>();
        self.graph.is_region_connected(nodes, &in_part)
    }

    /// Check whether every part is contiguous.
    pub(crate) fn is_contiguous(&self) -> bool {
        (0..self.num_parts()).all(|part| self.part_is_contiguous(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path 0 - 1 - 2 - 3 with POP = node index + 1.
    fn make_partition(assignments: &[u32]) -> Partition {
        let graph = Graph::from_edges(
            4,
            [(0, 1), (1, 2), (2, 3)],
            WeightMatrix::new(4, vec![("POP".into(), vec![1.0, 2.0, 3.0, 4.0])]),
        );
        Partition::new(2, graph, assignments)
    }

    #[test]
    fn aggregates_are_computed() {
        let partition = make_partition(&[0, 0, 1, 1]);

        assert_eq!(partition.num_parts(), 2);
        assert_eq!(partition.part_total("POP", 0), Some(3.0));
        assert_eq!(partition.part_total("POP", 1), Some(7.0));
        assert_eq!(partition.part_total("VAP", 1), None);
        assert_eq!(partition.region_total("POP"), Some(10.0));
        assert_eq!(partition.num_cut_edges(), 1);
        assert_eq!(partition.cut_edges().collect::<Vec<_>>(), vec![(1, 2)]);
    }

    #[test]
    fn contiguity() {
        let partition = make_partition(&[0, 1, 1, 0]);
        assert!(!partition.part_is_contiguous(0));
        assert!(partition.part_is_contiguous(1));
        assert!(!partition.is_contiguous());
        assert_eq!(partition.num_cut_edges(), 2);

        // An empty part is never contiguous.
        let partition = make_partition(&[0, 0, 0, 0]);
        assert!(!partition.part_is_contiguous(1));
    }

    #[test]
    fn cut_edges_touching_counts_each_edge_once() {
        let partition = make_partition(&[0, 1, 0, 1]);
        assert_eq!(partition.num_cut_edges(), 3);

        let mut in_nodes = vec![false; 4];
        for u in [1, 2] { in_nodes[u] = true }
        assert_eq!(partition.cut_edges_touching(&[1, 2], &in_nodes), 3);

        let mut in_nodes = vec![false; 4];
        in_nodes[0] = true;
        assert_eq!(partition.cut_edges_touching(&[0], &in_nodes), 1);
    }

    #[test]
    #[should_panic(expected = "assignments.len() must equal number of nodes")]
    fn new_panics_on_length_mismatch() {
        make_partition(&[0, 1]);
    }
}
