use std::sync::Arc;

use anyhow::{bail, ensure, Result};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    graph::Graph,
    metrics::{majority_minority_count, Tally},
    partition::{recursive_tree_part, Partition},
};

/// Attempt budgets for building a seed plan by recursive tree bisection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedBudget {
    /// Full restarts of the bisection before giving up.
    pub seed_attempts: usize,
    /// Spanning trees drawn per carved district.
    pub max_tree_attempts: usize,
}

/// A districting plan, assigning every node to one of `num_districts` districts.
#[derive(Clone, Debug)]
pub struct Plan {
    pub(crate) partition: Partition,
}

impl Plan {
    /// Create a plan from an explicit assignment of nodes to districts `0..num_districts`.
    pub fn new(graph: impl Into<Arc<Graph>>, num_districts: u32, assignments: Vec<u32>) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();

        if num_districts == 0 { bail!(Error::InvalidPlan("num_districts must be at least 1".into())) }
        if assignments.len() != graph.node_count() {
            bail!(Error::InvalidPlan(format!(
                "{} assignments for {} nodes", assignments.len(), graph.node_count()
            )))
        }
        if let Some((node, &label)) = assignments.iter().enumerate().find(|&(_, &d)| d >= num_districts) {
            bail!(Error::InvalidPlan(format!(
                "node {node} assigned to district {label}, expected [0, {num_districts})"
            )))
        }

        Ok(Self { partition: Partition::new(num_districts as usize, graph, &assignments) })
    }

    /// Build a plan of `num_districts` contiguous districts, each within `epsilon` of `ideal`
    /// in `series`, by recursive spanning-tree bisection.
    /// Fails with `Error::SeedPartition` once the budget is exhausted; no partial plan is returned.
    pub fn from_tree_partition<R: Rng + ?Sized>(
        graph: impl Into<Arc<Graph>>,
        num_districts: u32,
        series: &str,
        ideal: f64,
        epsilon: f64,
        budget: SeedBudget,
        rng: &mut R,
    ) -> Result<Self> {
        let graph: Arc<Graph> = graph.into();

        if num_districts == 0 { bail!(Error::InvalidPlan("num_districts must be at least 1".into())) }
        ensure!(
            num_districts as usize <= graph.node_count(),
            Error::InvalidPlan(format!("{num_districts} districts for {} nodes", graph.node_count()))
        );
        let (_, components) = graph.components();
        if components > 1 { bail!(Error::Disconnected { components }) }
        let Some(weights) = graph.node_weights().column(series) else { bail!(Error::UnknownSeries(series.into())) };

        for attempt in 1..=budget.seed_attempts {
            let assignments = recursive_tree_part(
                &graph, num_districts, weights, ideal, epsilon, budget.max_tree_attempts, rng,
            );
            match assignments {
                Some(assignments) => {
                    debug!(attempt, "built seed plan");
                    return Ok(Self { partition: Partition::new(num_districts as usize, Arc::clone(&graph), &assignments) });
                }
                None => warn!(attempt, "recursive tree bisection failed; restarting"),
            }
        }

        bail!(Error::SeedPartition { districts: num_districts, attempts: budget.seed_attempts })
    }

    /// Get the number of districts.
    #[inline] pub fn num_districts(&self) -> u32 { self.partition.num_parts() }

    /// Get the number of nodes.
    #[inline] pub fn num_nodes(&self) -> usize { self.partition.num_nodes() }

    /// Get a reference to the underlying graph.
    #[inline] pub fn graph(&self) -> &Graph { self.partition.graph() }

    /// Get a shared handle to the underlying graph.
    #[inline] pub fn graph_handle(&self) -> Arc<Graph> { self.partition.graph_handle() }

    /// Get the district of a given node.
    #[inline] pub fn assignment(&self, node: usize) -> u32 { self.partition.assignment(node) }

    /// Get the district of every node, by node index.
    #[inline] pub fn assignments(&self) -> &[u32] { self.partition.assignments() }

    /// Get the nodes of a given district.
    #[inline] pub fn district_nodes(&self, district: u32) -> &[usize] { self.partition.part_nodes(district) }

    /// Total of `series` for one district.
    pub fn district_total(&self, series: &str, district: u32) -> Result<f64> {
        ensure!(district < self.num_districts(), Error::InvalidPlan(format!("no district {district}")));
        match self.partition.part_total(series, district) {
            Some(total) => Ok(total),
            None => bail!(Error::UnknownSeries(series.into())),
        }
    }

    /// Totals of `series` for every district, keyed by district label.
    pub fn tally(&self, series: &str) -> Result<Tally> {
        if !self.partition.has_series(series) { bail!(Error::UnknownSeries(series.into())) }
        Ok((0..self.num_districts())
            .filter_map(|district| Some((district, self.partition.part_total(series, district)?)))
            .collect())
    }

    /// Total of `series` over the whole graph.
    pub fn region_total(&self, series: &str) -> Result<f64> {
        match self.partition.region_total(series) {
            Some(total) => Ok(total),
            None => bail!(Error::UnknownSeries(series.into())),
        }
    }

    /// Number of edges whose endpoints lie in different districts.
    #[inline] pub fn num_cut_edges(&self) -> usize { self.partition.num_cut_edges() }

    /// Iterate the cut edges as `(u, v)` with `u < v`.
    pub fn cut_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ { self.partition.cut_edges() }

    /// Check whether one district induces a connected subgraph.
    #[inline]
    pub fn district_is_contiguous(&self, district: u32) -> bool {
        district < self.num_districts() && self.partition.part_is_contiguous(district)
    }

    /// Check whether every district is contiguous.
    #[inline] pub fn is_contiguous(&self) -> bool { self.partition.is_contiguous() }

    /// Number of districts whose `bvap / vap` totals reach `threshold`.
    pub fn majority_minority_count(&self, bvap: &str, vap: &str, threshold: f64) -> Result<usize> {
        Ok(majority_minority_count(&self.tally(bvap)?, &self.tally(vap)?, threshold))
    }

    /// Log the per-district totals of each series at info level.
    pub fn log_tallies(&self, series: &[&str]) -> Result<()> {
        for &name in series {
            for (district, total) in self.tally(name)? {
                info!("District{district} {name}: {total}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::graph::WeightMatrix;

    /// Path 0 - 1 - 2 with node 0 alone majority-minority.
    fn make_graph() -> Arc<Graph> {
        Arc::new(Graph::from_edges(3, [(0, 1), (1, 2)], WeightMatrix::new(3, vec![
            ("POP".into(), vec![100.0, 60.0, 40.0]),
            ("VAP".into(), vec![100.0, 50.0, 30.0]),
            ("BVAP".into(), vec![60.0, 10.0, 5.0]),
        ])))
    }

    #[test]
    fn lone_majority_minority_node_counts_once() {
        let plan = Plan::new(make_graph(), 2, vec![0, 1, 1]).unwrap();

        assert_eq!(plan.tally("BVAP").unwrap(), Tally::from([(0, 60.0), (1, 15.0)]));
        assert_eq!(plan.tally("VAP").unwrap(), Tally::from([(0, 100.0), (1, 80.0)]));
        assert_eq!(plan.majority_minority_count("BVAP", "VAP", 0.5).unwrap(), 1);
    }

    #[test]
    fn empty_district_with_zero_vap_is_handled() {
        let plan = Plan::new(make_graph(), 2, vec![0, 0, 0]).unwrap();
        assert_eq!(plan.district_total("VAP", 1).unwrap(), 0.0);
        assert_eq!(plan.majority_minority_count("BVAP", "VAP", 0.5).unwrap(), 0);
        assert!(!plan.district_is_contiguous(1));
    }

    #[test]
    fn aggregates_and_cut_edges() {
        let plan = Plan::new(make_graph(), 2, vec![0, 1, 0]).unwrap();
        assert_eq!(plan.num_districts(), 2);
        assert_eq!(plan.num_cut_edges(), 2);
        assert_eq!(plan.cut_edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
        assert_eq!(plan.district_nodes(0), &[0, 2]);
        assert!(!plan.is_contiguous());

        let populations = plan.tally("POP").unwrap();
        assert_eq!(populations.values().sum::<f64>(), plan.region_total("POP").unwrap());
    }

    #[test]
    fn invalid_assignments_are_rejected() {
        for (districts, assignments) in [(2, vec![0, 1]), (2, vec![0, 1, 2]), (0, vec![0, 0, 0])] {
            let err = Plan::new(make_graph(), districts, assignments).unwrap_err();
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidPlan(_))));
        }
    }

    #[test]
    fn unknown_series_is_an_error() {
        let plan = Plan::new(make_graph(), 2, vec![0, 1, 1]).unwrap();
        let err = plan.tally("HVAP").unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownSeries(_))));
        assert!(plan.district_total("POP", 5).is_err());
    }

    #[test]
    fn tree_partition_respects_tolerance() {
        let graph = make_graph();
        let mut rng = ChaCha8Rng::seed_from_u64(48);
        let budget = SeedBudget { seed_attempts: 5, max_tree_attempts: 100 };

        // Only the split {0} | {1, 2} is exactly balanced.
        let plan = Plan::from_tree_partition(graph, 2, "POP", 100.0, 0.0, budget, &mut rng).unwrap();
        let populations = plan.tally("POP").unwrap();
        assert!(populations.values().all(|&p| p == 100.0));
        assert!(plan.is_contiguous());
    }

    #[test]
    fn tree_partition_failure_is_fatal() {
        let graph = make_graph();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let budget = SeedBudget { seed_attempts: 3, max_tree_attempts: 5 };

        let err = Plan::from_tree_partition(graph, 2, "POP", 90.0, 0.01, budget, &mut rng).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::SeedPartition { districts: 2, attempts: 3 })
        ));
    }

    #[test]
    fn tree_partition_requires_connected_graph() {
        let graph = Graph::from_edges(3, [(0, 1)], WeightMatrix::new(3, vec![("POP".into(), vec![1.0; 3])]));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let budget = SeedBudget { seed_attempts: 1, max_tree_attempts: 1 };

        let err = Plan::from_tree_partition(graph, 2, "POP", 1.5, 0.5, budget, &mut rng).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Disconnected { components: 2 })));
    }
}
