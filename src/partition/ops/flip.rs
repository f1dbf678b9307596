use crate::partition::Partition;

impl Partition {
    /// Move a set of nodes to `part`, updating part totals and the cut-edge count.
    /// Contiguity is not checked.
    pub(crate) fn move_subgraph(&mut self, nodes: &[usize], part: u32) {
        assert!(part < self.num_parts(), "part {} out of range [0, {})", part, self.num_parts());
        if nodes.is_empty() { return }

        // Deduplicate and validate indices.
        let mut subgraph = Vec::with_capacity(nodes.len());
        let mut in_subgraph = vec![false; self.num_nodes()];
        for &u in nodes {
            assert!(u < self.num_nodes(), "node {} out of range", u);
            if !in_subgraph[u] { in_subgraph[u] = true; subgraph.push(u); }
        }

        let before = self.cut_edges_touching(&subgraph, &in_subgraph);

        for &u in &subgraph {
            let prev = self.assignment(u);
            if prev == part { continue }

            self.part_weights.subtract_row_from(prev as usize, self.graph.node_weights(), u);
            self.part_weights.add_row_from(part as usize, self.graph.node_weights(), u);
            self.parts.move_to(u, part);
        }

        let after = self.cut_edges_touching(&subgraph, &in_subgraph);
        self.cut_edges = self.cut_edges + after - before;
    }
}
