use ndarray::ArrayView1;
use rand::Rng;

use crate::graph::{bipartition, CutRule, Graph};

/// Split a connected graph into `num_parts` contiguous parts, each within `epsilon` of `ideal`
/// in `weights`, by carving one part at a time off a random spanning tree of what remains.
///
/// The overshoot or undershoot of each carved part is carried forward as a debt that narrows
/// the window for the next part, so the final remainder also lands within tolerance.
/// Returns None if some part could not be carved within `max_attempts` spanning trees.
pub(crate) fn recursive_tree_part<R: Rng + ?Sized>(
    graph: &Graph,
    num_parts: u32,
    weights: ArrayView1<'_, f64>,
    ideal: f64,
    epsilon: f64,
    max_attempts: usize,
    rng: &mut R,
) -> Option<Vec<u32>> {
    assert!(num_parts > 0, "num_parts must be at least 1");

    const UNASSIGNED: u32 = u32::MAX;
    let mut assignments = vec![UNASSIGNED; graph.node_count()];
    let mut remaining = (0..graph.node_count()).collect::<Vec<_>>();
    let mut debt = 0.0;

    for part in 0..num_parts - 1 {
        let min_pop = (ideal * (1.0 - epsilon)).max(ideal * (1.0 - epsilon) - debt);
        let max_pop = (ideal * (1.0 + epsilon)).min(ideal * (1.0 + epsilon) - debt);
        let target = (min_pop + max_pop) / 2.0;
        let rule = CutRule {
            target,
            epsilon: (max_pop - min_pop) / (2.0 * target),
            two_sided: false,
        };

        let piece = bipartition(graph, &remaining, weights, rule, max_attempts, rng)?;
        debt += piece.iter().map(|&u| weights[u]).sum::<f64>() - ideal;

        piece.iter().for_each(|&u| assignments[u] = part);
        remaining.retain(|&u| assignments[u] == UNASSIGNED);
    }

    remaining.iter().for_each(|&u| assignments[u] = num_parts - 1);
    Some(assignments)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{graph::WeightMatrix, partition::Partition};

    fn grid(width: usize, height: usize) -> Graph {
        let n = width * height;
        let pairs = (0..n).flat_map(|u| {
            let (x, y) = (u % width, u / width);
            let right = (x + 1 < width).then(|| (u, u + 1));
            let down = (y + 1 < height).then(|| (u, u + width));
            right.into_iter().chain(down)
        }).collect::<Vec<_>>();
        Graph::from_edges(n, pairs, WeightMatrix::new(n, vec![("POP".into(), vec![1.0; n])]))
    }

    #[test]
    fn single_part_takes_everything() {
        let graph = grid(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let weights = graph.node_weights().column("POP").unwrap();
        let assignments = recursive_tree_part(&graph, 1, weights, 9.0, 0.0, 10, &mut rng).unwrap();
        assert_eq!(assignments, vec![0; 9]);
    }

    #[test]
    fn parts_are_balanced_and_contiguous() {
        let graph = std::sync::Arc::new(grid(6, 6));
        let weights = graph.node_weights().column("POP").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(48);

        let assignments = (0..20)
            .find_map(|_| recursive_tree_part(&graph, 4, weights, 9.0, 0.12, 1000, &mut rng))
            .unwrap();

        let partition = Partition::new(4, graph.clone(), &assignments);
        for part in 0..4 {
            let total = partition.part_total("POP", part).unwrap();
            assert!((8.0..=10.0).contains(&total), "part {part} has population {total}");
            assert!(partition.part_is_contiguous(part));
        }
        assert_eq!(partition.region_total("POP"), Some(36.0));
    }

    #[test]
    fn impossible_balance_fails() {
        // Three unit nodes cannot be split into two equal halves.
        let graph = grid(3, 1);
        let weights = graph.node_weights().column("POP").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(recursive_tree_part(&graph, 2, weights, 1.5, 0.0, 50, &mut rng), None);
    }
}
