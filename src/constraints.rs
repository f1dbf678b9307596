//! Validity predicates applied to every candidate plan.

use std::fmt;

use anyhow::Result;

use crate::Plan;

/// A validity predicate on plans.
pub trait Constraint: fmt::Debug {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Check whether `plan` satisfies this constraint.
    fn is_satisfied(&self, plan: &Plan) -> bool;
}

/// Every district's total of `series` lies within `epsilon` of `ideal` (inclusive).
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationBalance {
    series: String,
    ideal: f64,
    epsilon: f64,
}

impl PopulationBalance {
    pub fn new(series: impl Into<String>, ideal: f64, epsilon: f64) -> Self {
        Self { series: series.into(), ideal, epsilon }
    }

    /// Bounds around the ideal population of `plan` (its total divided by its district count).
    pub fn within_percent_of_ideal(plan: &Plan, series: &str, epsilon: f64) -> Result<Self> {
        let ideal = plan.region_total(series)? / plan.num_districts() as f64;
        Ok(Self::new(series, ideal, epsilon))
    }

    #[inline] pub fn ideal(&self) -> f64 { self.ideal }

    /// Inclusive `(lower, upper)` bounds on a district's total.
    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.ideal * (1.0 - self.epsilon), self.ideal * (1.0 + self.epsilon))
    }
}

impl Constraint for PopulationBalance {
    fn name(&self) -> &str { "population" }

    fn is_satisfied(&self, plan: &Plan) -> bool {
        let (lower, upper) = self.bounds();
        (0..plan.num_districts()).all(|district| {
            plan.district_total(&self.series, district)
                .is_ok_and(|total| lower <= total && total <= upper)
        })
    }
}

/// A scalar function of the plan bounded above.
pub struct UpperBound {
    name: String,
    func: Box<dyn Fn(&Plan) -> f64 + Send + Sync>,
    bound: f64,
}

impl UpperBound {
    pub fn new(name: impl Into<String>, func: impl Fn(&Plan) -> f64 + Send + Sync + 'static, bound: f64) -> Self {
        Self { name: name.into(), func: Box::new(func), bound }
    }

    /// Cut edges may not exceed `factor` times the cut edges of `seed`.
    pub fn cut_edges(seed: &Plan, factor: f64) -> Self {
        let bound = (factor * seed.num_cut_edges() as f64).floor();
        Self::new("compactness", |plan: &Plan| plan.num_cut_edges() as f64, bound)
    }

    #[inline] pub fn bound(&self) -> f64 { self.bound }
}

impl fmt::Debug for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpperBound").field("name", &self.name).field("bound", &self.bound).finish()
    }
}

impl Constraint for UpperBound {
    fn name(&self) -> &str { &self.name }

    fn is_satisfied(&self, plan: &Plan) -> bool { (self.func)(plan) <= self.bound }
}

/// Every district induces a connected subgraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contiguous;

impl Constraint for Contiguous {
    fn name(&self) -> &str { "contiguity" }

    fn is_satisfied(&self, plan: &Plan) -> bool { plan.is_contiguous() }
}

/// A conjunction of constraints.
#[derive(Debug, Default)]
pub struct Constraints {
    constraints: Vec<Box<dyn Constraint + Send + Sync>>,
}

impl Constraints {
    pub fn new() -> Self { Self::default() }

    /// Add a constraint.
    pub fn with(mut self, constraint: impl Constraint + Send + Sync + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    #[inline] pub fn len(&self) -> usize { self.constraints.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.constraints.is_empty() }

    /// Name of the first constraint that `plan` violates, if any.
    pub fn first_violation(&self, plan: &Plan) -> Option<&str> {
        self.constraints.iter()
            .find(|constraint| !constraint.is_satisfied(plan))
            .map(|constraint| constraint.name())
    }

    /// Check whether `plan` satisfies every constraint.
    #[inline] pub fn is_valid(&self, plan: &Plan) -> bool { self.first_violation(plan).is_none() }
}
