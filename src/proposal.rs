//! Proposal functions: generate a candidate plan from the current one.

use rand::Rng;

use crate::Plan;

/// Generates candidate plans for a Markov chain.
pub trait Proposal {
    /// Propose a new plan from `plan`, or None if this attempt produced no candidate.
    fn propose<R: Rng + ?Sized>(&self, plan: &Plan, rng: &mut R) -> Option<Plan>;
}

/// Recombination: merge the two districts on either side of a random cut edge and
/// re-split them along a random spanning tree into two balanced, contiguous halves.
#[derive(Clone, Debug, PartialEq)]
pub struct ReCom {
    /// Population series to balance.
    pub series: String,
    /// Target population of each half.
    pub target: f64,
    /// Relative tolerance around `target`.
    pub epsilon: f64,
    /// Spanning trees drawn before the attempt is abandoned.
    pub max_attempts: usize,
}

impl ReCom {
    pub fn new(series: impl Into<String>, target: f64, epsilon: f64, max_attempts: usize) -> Self {
        Self { series: series.into(), target, epsilon, max_attempts }
    }
}

impl Proposal for ReCom {
    fn propose<R: Rng + ?Sized>(&self, plan: &Plan, rng: &mut R) -> Option<Plan> {
        plan.partition
            .random_recombination(&self.series, self.target, self.epsilon, self.max_attempts, rng)
            .map(|partition| Plan { partition })
    }
}
