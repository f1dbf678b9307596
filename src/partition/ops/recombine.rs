use rand::{seq::IteratorRandom, Rng};

use crate::{graph::{bipartition, CutRule}, partition::Partition};

impl Partition {
    /// Replace parts `a` and `b` with `piece` (labelled `a`) and the rest of their union (labelled `b`).
    /// Every node of `piece` must currently belong to `a` or `b`.
    pub(crate) fn recombine_parts(&mut self, a: u32, b: u32, piece: &[usize]) {
        assert!(a < self.num_parts() && b < self.num_parts() && a != b,
            "a and b must be distinct parts in range [0, {})", self.num_parts());

        let mut in_piece = vec![false; self.num_nodes()];
        for &u in piece {
            let part = self.assignment(u);
            assert!(part == a || part == b, "node {u} is in part {part}, not {a} or {b}");
            in_piece[u] = true;
        }

        let rest = self.part_nodes(a).iter()
            .chain(self.part_nodes(b))
            .copied()
            .filter(|&u| !in_piece[u])
            .collect::<Vec<_>>();

        self.move_subgraph(piece, a);
        self.move_subgraph(&rest, b);
    }

    /// Propose a recombination step: choose a random cut edge, merge the two parts it joins,
    /// and re-split their union along a random spanning tree so both halves are within
    /// `epsilon` of `target` in `series`.
    /// Returns None if there is no cut edge, the series is unknown, or no balanced split was found.
    pub(crate) fn random_recombination<R: Rng + ?Sized>(
        &self,
        series: &str,
        target: f64,
        epsilon: f64,
        max_attempts: usize,
        rng: &mut R,
    ) -> Option<Partition> {
        let (u, v) = self.cut_edges().choose(rng)?;
        let (a, b) = (self.assignment(u), self.assignment(v));

        let merged = self.part_nodes(a).iter()
            .chain(self.part_nodes(b))
            .copied()
            .collect::<Vec<_>>();

        let weights = self.graph.node_weights().column(series)?;
        let rule = CutRule { target, epsilon, two_sided: true };
        let piece = bipartition(&self.graph, &merged, weights, rule, max_attempts, rng)?;

        let mut next = self.clone();
        next.recombine_parts(a, b, &piece);
        Some(next)
    }
}
