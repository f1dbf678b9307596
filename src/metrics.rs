//! Plan scoring: ideal population and majority-minority counts.

use std::collections::BTreeMap;

use anyhow::{bail, Result};

use crate::{error::Error, graph::Graph, Plan};

/// Per-district totals, keyed by district label.
pub type Tally = BTreeMap<u32, f64>;

/// Ideal population per district: the graph's total `series` divided by `num_districts`.
pub fn ideal_population(graph: &Graph, series: &str, num_districts: u32) -> Result<f64> {
    if num_districts == 0 { bail!(Error::InvalidConfig("num_districts must be at least 1".into())) }
    let Some(total) = graph.node_weights().total(series) else { bail!(Error::UnknownSeries(series.into())) };
    Ok(total / num_districts as f64)
}

/// Whether a district with these totals is majority-minority at `threshold`.
/// A district with no voting-age population is never majority-minority.
#[inline]
pub fn is_majority_minority(bvap: f64, vap: f64, threshold: f64) -> bool {
    bvap.is_finite() && vap.is_finite() && vap > 0.0 && bvap / vap >= threshold
}

/// Number of majority-minority districts. VAP is looked up by the BVAP entry's label;
/// a label with no VAP entry does not count.
pub fn majority_minority_count(bvap: &Tally, vap: &Tally, threshold: f64) -> usize {
    bvap.iter()
        .filter(|&(district, &b)| {
            vap.get(district).is_some_and(|&v| is_majority_minority(b, v, threshold))
        })
        .count()
}

/// Scores a plan by its number of majority-minority districts.
#[derive(Clone, Debug, PartialEq)]
pub struct MajorityMinority {
    pub bvap: String,
    pub vap: String,
    pub threshold: f64,
}

impl MajorityMinority {
    pub fn new(bvap: impl Into<String>, vap: impl Into<String>, threshold: f64) -> Self {
        Self { bvap: bvap.into(), vap: vap.into(), threshold }
    }

    /// Count the majority-minority districts of `plan`.
    #[inline]
    pub fn count(&self, plan: &Plan) -> Result<usize> {
        plan.majority_minority_count(&self.bvap, &self.vap, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightMatrix;

    fn tally(entries: &[(u32, f64)]) -> Tally { entries.iter().copied().collect() }

    #[test]
    fn ideal_population_divides_total() {
        let graph = Graph::from_edges(
            3, [(0, 1), (1, 2)],
            WeightMatrix::new(3, vec![("POPULATION".into(), vec![100.0, 250.0, 50.0])]),
        );
        assert_eq!(ideal_population(&graph, "POPULATION", 4).unwrap(), 100.0);

        let err = ideal_population(&graph, "POP", 4).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownSeries(s)) if s == "POP"));
        assert!(ideal_population(&graph, "POPULATION", 0).is_err());
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_majority_minority(50.0, 100.0, 0.5));
        assert!(!is_majority_minority(49.9, 100.0, 0.5));
        assert!(is_majority_minority(60.0, 100.0, 0.5));
    }

    #[test]
    fn zero_vap_is_not_majority_minority() {
        assert!(!is_majority_minority(0.0, 0.0, 0.5));
        assert!(!is_majority_minority(10.0, 0.0, 0.5));
        assert!(!is_majority_minority(f64::NAN, 10.0, 0.5));

        let bvap = tally(&[(0, 0.0), (1, 5.0)]);
        let vap = tally(&[(0, 0.0), (1, 8.0)]);
        assert_eq!(majority_minority_count(&bvap, &vap, 0.5), 1);
    }

    #[test]
    fn count_is_aligned_by_label() {
        // Same values, different insertion order: lookup must pair by label.
        let bvap: Tally = [(2, 90.0), (0, 10.0), (1, 55.0)].into_iter().collect();
        let vap: Tally = [(1, 100.0), (2, 100.0), (0, 100.0)].into_iter().collect();
        assert_eq!(majority_minority_count(&bvap, &vap, 0.5), 2);

        // A label missing from VAP never counts.
        let vap = tally(&[(0, 100.0), (1, 100.0)]);
        assert_eq!(majority_minority_count(&bvap, &vap, 0.5), 1);
    }

    #[test]
    fn count_is_bounded_by_district_count() {
        let bvap = tally(&[(0, 80.0), (1, 90.0), (2, 70.0)]);
        let vap = tally(&[(0, 100.0), (1, 100.0), (2, 100.0)]);
        assert_eq!(majority_minority_count(&bvap, &vap, 0.5), 3);
        assert_eq!(majority_minority_count(&Tally::new(), &vap, 0.5), 0);
    }
}
