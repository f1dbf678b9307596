use ndarray::ArrayView1;
use rand::{seq::{IndexedRandom, SliceRandom}, Rng};

use crate::graph::Graph;

/// Tolerance rule for cutting a spanning tree into a balanced piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CutRule {
    pub target: f64,
    pub epsilon: f64,
    /// If set, both sides of the cut must be within tolerance of `target`.
    pub two_sided: bool,
}

impl CutRule {
    #[inline]
    fn within(&self, value: f64) -> bool {
        (value - self.target).abs() <= self.epsilon * self.target
    }
}

/// A tree edge `(parent[node], node)` whose removal yields a balanced piece.
/// The piece is the subtree under `node`, or everything else if `complement` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cut {
    pub node: usize,
    pub complement: bool,
}

/// Cut-friendly spanning tree over a region of the graph.
#[derive(Debug)]
pub(crate) struct SpanningTree {
    parent: Vec<Option<usize>>, // parent[root] = root; None if node not in tree.
    order: Vec<usize>,          // preorder over nodes in the tree
    index: Vec<Option<usize>>,  // preorder entry index, or None if node not in tree.
    size: Vec<Option<usize>>,   // subtree sizes, or None if node not in tree.
}

impl SpanningTree {
    /// Draw a uniform spanning tree of the subgraph induced by `nodes`, using Wilson's algorithm.
    /// `in_region[u]` must be true exactly for members of `nodes`, and the region must be connected.
    pub(crate) fn random<R: Rng + ?Sized>(graph: &Graph, nodes: &[usize], in_region: &[bool], rng: &mut R) -> Self {
        assert!(!nodes.is_empty(), "cannot build spanning tree for an empty region");

        let mut nodes = nodes.to_vec();
        let mut parent = vec![None; graph.node_count()];

        // Randomize the order of the nodes in the region, and choose a random root.
        nodes.shuffle(rng);
        let root = nodes[0];
        parent[root] = Some(root);

        // Loop-erased random walks
        let mut walk_start = vec![usize::MAX; graph.node_count()];
        let mut walk_position = vec![0; graph.node_count()];
        let mut neighbors = Vec::new();

        for &start in &nodes[1..] {
            if parent[start].is_some() { continue } // already in the tree

            let mut walk = vec![start];
            walk_start[start] = start;
            walk_position[start] = 0;

            // Walk until we hit the tree
            let mut current = start;
            while parent[current].is_none() {
                neighbors.clear();
                neighbors.extend(graph.edges(current).filter(|&v| in_region[v]));
                current = *neighbors.choose(rng)
                    .unwrap_or_else(|| panic!("node {current} has no neighbors inside the region"));

                if walk_start[current] == start && walk.get(walk_position[current]) == Some(&current) {
                    walk.truncate(walk_position[current] + 1);
                } else {
                    walk_start[current] = start;
                    walk_position[current] = walk.len();
                    walk.push(current);
                }
            }

            // Stitch loop-erased path into the tree (reverse)
            while let Some(node) = walk.pop() {
                if parent[node].is_some() { continue }
                parent[node] = Some(current);
                current = node;
            }
        }

        // Children lists, then an iterative preorder so each subtree is a contiguous slice.
        let mut children = vec![Vec::new(); graph.node_count()];
        for &u in &nodes {
            if let Some(p) = parent[u] {
                if p != u { children[p].push(u) }
            }
        }

        let mut order = Vec::with_capacity(nodes.len());
        let mut index = vec![None; graph.node_count()];
        let mut size = vec![None; graph.node_count()];

        let mut stack = vec![(root, false)];
        while let Some((i, entered)) = stack.pop() {
            if !entered {
                index[i] = Some(order.len());
                order.push(i);
                stack.push((i, true));
                for &u in children[i].iter().rev() {
                    stack.push((u, false));
                }
            } else {
                let count = 1 + children[i].iter().filter_map(|&u| size[u]).sum::<usize>();
                size[i] = Some(count);
            }
        }

        Self { parent, order, index, size }
    }

    /// Subtree slice for `node` (contiguous in preorder), or None if `node` is not in the tree.
    #[inline]
    pub(crate) fn subtree_slice(&self, node: usize) -> Option<&[usize]> {
        let index = self.index[node]?;
        let size = self.size[node]?;
        Some(&self.order[index .. index + size])
    }

    /// Every tree edge whose removal gives a piece that satisfies `rule`.
    /// `weights` is indexed by graph node.
    pub(crate) fn balanced_cuts(&self, weights: ArrayView1<'_, f64>, rule: CutRule) -> Vec<Cut> {
        // Prefix sums over preorder.
        let mut prefix = Vec::with_capacity(self.order.len() + 1);
        prefix.push(0.0);
        for &u in &self.order { prefix.push(prefix[prefix.len() - 1] + weights[u]) }
        let total = prefix[self.order.len()];

        // order[0] is the root, which has no parent edge.
        self.order[1..].iter().filter_map(|&u| {
            let (index, size) = (self.index[u]?, self.size[u]?);
            let inside = prefix[index + size] - prefix[index];
            let outside = total - inside;

            if rule.two_sided {
                (rule.within(inside) && rule.within(outside)).then_some(Cut { node: u, complement: false })
            } else if rule.within(inside) {
                Some(Cut { node: u, complement: false })
            } else if rule.within(outside) {
                Some(Cut { node: u, complement: true })
            } else {
                None
            }
        }).collect()
    }

    /// Nodes on the chosen side of `cut`.
    pub(crate) fn piece(&self, cut: Cut) -> Vec<usize> {
        let Some(subtree) = self.subtree_slice(cut.node) else { return vec![] };
        if !cut.complement { return subtree.to_vec() }

        let (Some(index), Some(size)) = (self.index[cut.node], self.size[cut.node]) else { return vec![] };
        self.order[..index].iter().chain(&self.order[index + size..]).copied().collect()
    }
}

/// Split the connected region `nodes` into a balanced piece and the remainder.
/// Draws up to `max_attempts` spanning trees and returns the nodes of a uniformly
/// chosen balanced piece from the first tree that has one.
pub(crate) fn bipartition<R: Rng + ?Sized>(
    graph: &Graph,
    nodes: &[usize],
    weights: ArrayView1<'_, f64>,
    rule: CutRule,
    max_attempts: usize,
    rng: &mut R,
) -> Option<Vec<usize>> {
    if nodes.len() < 2 { return None }

    let mut in_region = vec![false; graph.node_count()];
    nodes.iter().for_each(|&u| in_region[u] = true);
    if !graph.is_region_connected(nodes, &in_region) { return None }

    for _ in 0..max_attempts {
        let tree = SpanningTree::random(graph, nodes, &in_region, rng);
        let cuts = tree.balanced_cuts(weights, rule);
        if let Some(&cut) = cuts.choose(rng) {
            return Some(tree.piece(cut));
        }
    }

    None
}
