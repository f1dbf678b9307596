use std::collections::VecDeque;

use crate::graph::WeightMatrix;

/// An undirected graph in compressed sparse row format, with named node weights.
#[derive(Debug, Default)]
pub struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    node_weights: WeightMatrix,
}

impl Graph {
    /// Construct a graph from adjacency lists and node weights.
    /// Adjacency lists are taken as given; each undirected edge should appear in both lists.
    pub fn new(num_nodes: usize, edges: &[Vec<u32>], node_weights: WeightMatrix) -> Self {
        assert!(edges.len() == num_nodes, "edges.len() must equal num_nodes");
        assert!(node_weights.rows() == num_nodes, "node_weights must have one row per node");
        edges.iter().enumerate().for_each(|(i, list)| {
            assert!(list.iter().all(|&v| (v as usize) < num_nodes), "edges[{i}] references a node out of range");
        });

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
            node_weights,
        }
    }

    /// Construct a graph from a list of undirected edges.
    /// Edges are symmetrized; self-loops and duplicates are dropped.
    pub fn from_edges(num_nodes: usize, pairs: impl IntoIterator<Item = (usize, usize)>, node_weights: WeightMatrix) -> Self {
        let mut adjacency = vec![Vec::new(); num_nodes];
        for (u, v) in pairs {
            assert!(u < num_nodes && v < num_nodes, "edge ({u}, {v}) out of range");
            if u == v { continue }
            adjacency[u].push(v as u32);
            adjacency[v].push(u as u32);
        }
        adjacency.iter_mut().for_each(|list| { list.sort_unstable(); list.dedup() });

        Self::new(num_nodes, &adjacency, node_weights)
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of directed edge entries (twice the undirected edge count).
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the number of undirected edges.
    #[inline] pub fn undirected_edge_count(&self) -> usize { self.edges.len() / 2 }

    /// Get a reference to the node weights matrix.
    #[inline] pub fn node_weights(&self) -> &WeightMatrix { &self.node_weights }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get the ith neighbor of a given node.
    #[inline]
    pub fn edge(&self, node: usize, i: usize) -> Option<usize> {
        self.range(node).nth(i).map(|v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Iterate each undirected edge once, as `(u, v)` with `u < v`.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |u| {
            self.edges(u).filter(move |&v| u < v).map(move |v| (u, v))
        })
    }

    /// Label each node with a connected component index, in order of first appearance.
    /// Returns the labels and the number of components.
    pub fn components(&self) -> (Vec<usize>, usize) {
        let mut label = vec![usize::MAX; self.size];
        let mut count = 0;
        let mut queue = VecDeque::new();

        for start in 0..self.size {
            if label[start] != usize::MAX { continue }
            label[start] = count;
            queue.push_back(start);
            while let Some(u) = queue.pop_front() {
                for v in self.edges(u) {
                    if label[v] == usize::MAX {
                        label[v] = count;
                        queue.push_back(v);
                    }
                }
            }
            count += 1;
        }

        (label, count)
    }

    /// Check whether the whole graph is connected. The empty graph counts as connected.
    pub fn is_connected(&self) -> bool { self.components().1 <= 1 }

    /// Check whether the subgraph induced by `nodes` is connected.
    /// `in_region` must be true exactly for the members of `nodes`.
    pub fn is_region_connected(&self, nodes: &[usize], in_region: &[bool]) -> bool {
        let Some(&start) = nodes.first() else { return true };

        let mut visited = vec![false; self.size];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        let mut seen = 1;
        while let Some(u) = queue.pop_front() {
            for v in self.edges(u) {
                if in_region[v] && !visited[v] {
                    visited[v] = true;
                    seen += 1;
                    queue.push_back(v);
                }
            }
        }

        seen == nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_graph() -> Graph {
        Graph::new(
            4,
            &[
                vec![1, 2],       // 0
                vec![0, 2],       // 1
                vec![0, 1, 3],    // 2
                vec![2],          // 3
            ],
            WeightMatrix::new(4, vec![("POP".to_string(), vec![1.0, 2.0, 3.0, 4.0])]),
        )
    }

    #[test]
    fn csr_graph_construction() {
        let graph = make_test_graph();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 8);
        assert_eq!(graph.undirected_edge_count(), 4);

        // Offsets are cumulative neighbor counts, len = nodes + 1
        assert_eq!(graph.offsets, vec![0, 2, 4, 7, 8]);
        assert_eq!(graph.edges, vec![1, 2, 0, 2, 0, 1, 3, 2]);

        for window in graph.offsets.windows(2) { assert!(window[0] <= window[1]) }
    }

    #[test]
    fn degree_and_edge_access() {
        let graph = make_test_graph();

        assert_eq!(graph.degree(2), 3);
        assert_eq!(graph.degree(3), 1);
        assert_eq!(graph.edge(2, 2), Some(3));
        assert_eq!(graph.edge(2, 3), None);
        assert_eq!(graph.edges(2).collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn edge_pairs_visits_each_edge_once() {
        let graph = make_test_graph();
        assert_eq!(graph.edge_pairs().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (1, 2), (2, 3)]);
    }

    #[test]
    fn from_edges_symmetrizes_and_dedups() {
        let graph = Graph::from_edges(
            3,
            [(0, 1), (1, 0), (1, 2), (2, 2), (1, 2)],
            WeightMatrix::new(3, vec![]),
        );

        assert_eq!(graph.edges(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.edges(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(graph.edges(2).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.undirected_edge_count(), 2);
    }

    #[test]
    fn components_and_connectivity() {
        let graph = make_test_graph();
        assert!(graph.is_connected());

        let split = Graph::from_edges(5, [(0, 1), (2, 3)], WeightMatrix::new(5, vec![]));
        let (labels, count) = split.components();
        assert_eq!(count, 3);
        assert_eq!(labels, vec![0, 0, 1, 1, 2]);
        assert!(!split.is_connected());
    }

    #[test]
    fn region_connectivity() {
        let graph = make_test_graph();
        let mut in_region = vec![false; 4];
        for u in [0, 3] { in_region[u] = true }
        assert!(!graph.is_region_connected(&[0, 3], &in_region));

        in_region[2] = true;
        assert!(graph.is_region_connected(&[0, 2, 3], &in_region));
        assert!(graph.is_region_connected(&[], &[false; 4]));
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = Graph::new(0, &[], WeightMatrix::new(0, vec![]));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.offsets, vec![0]);
        assert!(graph.is_connected());
    }

    #[test]
    #[should_panic(expected = "edges.len() must equal num_nodes")]
    fn new_panics_when_edges_len_mismatch() {
        Graph::new(0, &[vec![]], WeightMatrix::new(0, vec![]));
    }

    #[test]
    #[should_panic]
    fn degree_panics_for_out_of_bounds_node() {
        let graph = make_test_graph();
        graph.degree(graph.node_count());
    }
}
