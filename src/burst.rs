//! Short bursts: fixed-length walks, each restarted from the best plan of the last.

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    chain::MarkovChain,
    config::BurstConfig,
    constraints::{Constraints, Contiguous, PopulationBalance, UpperBound},
    metrics::MajorityMinority,
    proposal::{Proposal, ReCom},
    Plan,
};

/// Accumulates the counts of one burst and keeps the best plan seen.
/// Ties go to the later step.
#[derive(Clone, Debug, Default)]
pub struct BurstRecord {
    counts: Vec<usize>,
    best: Option<(usize, usize, Plan)>,
}

impl BurstRecord {
    pub fn new() -> Self { Self::default() }

    /// Record the count of the next step, replacing the best if `count` is at least as high.
    pub fn record(&mut self, count: usize, plan: &Plan) {
        let step = self.counts.len();
        self.counts.push(count);
        if self.best.as_ref().is_none_or(|&(_, best, _)| count >= best) {
            self.best = Some((step, count, plan.clone()));
        }
    }

    /// Get `(step, count, plan)` of the best step so far.
    pub fn best(&self) -> Option<(usize, usize, &Plan)> {
        self.best.as_ref().map(|(step, count, plan)| (*step, *count, plan))
    }

    /// Get the count of every recorded step, in order.
    #[inline] pub fn counts(&self) -> &[usize] { &self.counts }

    /// Finish the burst, or None if nothing was recorded.
    pub fn into_outcome(self) -> Option<BurstOutcome> {
        let (step, count, plan) = self.best?;
        Some(BurstOutcome { plan, count, step, counts: self.counts })
    }
}

/// Result of one burst.
#[derive(Clone, Debug)]
pub struct BurstOutcome {
    /// Best plan visited.
    pub plan: Plan,
    /// Majority-minority districts in `plan`.
    pub count: usize,
    /// Step at which `plan` was visited (0 is the seed).
    pub step: usize,
    /// Count at every step.
    pub counts: Vec<usize>,
}

/// Summary of one burst within a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurstSummary {
    pub index: usize,
    pub count: usize,
    pub step: usize,
    pub counts: Vec<usize>,
}

/// Result of a short-burst run.
#[derive(Clone, Debug)]
pub struct ShortBurstReport {
    pub bursts: Vec<BurstSummary>,
    /// Seed left for the next burst: the best plan of the last burst.
    pub final_seed: Plan,
    /// Best plan over all bursts.
    pub best: Plan,
    pub best_count: usize,
    /// Burst that found `best`, or None when no burst ran.
    pub best_burst: Option<usize>,
}

/// Runs bursts of a Markov chain, scoring each visited plan by majority-minority districts.
pub struct ShortBursts<P = ReCom> {
    proposal: P,
    constraints: Constraints,
    score: MajorityMinority,
    burst_length: usize,
    num_bursts: usize,
    max_attempts: usize,
}

impl<P: Proposal> ShortBursts<P> {
    pub fn new(
        proposal: P,
        constraints: Constraints,
        score: MajorityMinority,
        burst_length: usize,
        num_bursts: usize,
        max_attempts: usize,
    ) -> Self {
        Self { proposal, constraints, score, burst_length, num_bursts, max_attempts }
    }

    #[inline] pub fn constraints(&self) -> &Constraints { &self.constraints }

    /// Walk one burst from `seed` and return its best plan.
    pub fn run_burst<R: Rng + ?Sized>(&self, seed: Plan, rng: &mut R) -> Result<BurstOutcome> {
        let chain = MarkovChain::new(
            &self.proposal, &self.constraints, seed, self.burst_length, self.max_attempts, rng,
        )?;

        let mut record = BurstRecord::new();
        for (step, plan) in chain.enumerate() {
            let plan = plan?;
            let count = self.score.count(&plan)?;
            debug!(step, count, cut_edges = plan.num_cut_edges(), "visited plan");
            record.record(count, &plan);
        }

        record.into_outcome().context("Burst visited no plans")
    }

    /// Run every burst, seeding each with the best plan of the one before.
    pub fn run<R: Rng + ?Sized>(&self, seed: Plan, rng: &mut R) -> Result<ShortBurstReport> {
        let mut best_count = self.score.count(&seed)?;
        let mut best = seed.clone();
        let mut best_burst = None;

        let mut seed = seed;
        let mut bursts = Vec::with_capacity(self.num_bursts);
        for index in 0..self.num_bursts {
            let outcome = self.run_burst(seed, rng)
                .with_context(|| format!("Burst {index} failed"))?;
            info!(burst = index, count = outcome.count, step = outcome.step, "burst complete");

            if outcome.count >= best_count {
                best_count = outcome.count;
                best = outcome.plan.clone();
                best_burst = Some(index);
            }

            bursts.push(BurstSummary {
                index,
                count: outcome.count,
                step: outcome.step,
                counts: outcome.counts,
            });
            seed = outcome.plan;
        }

        Ok(ShortBurstReport { bursts, final_seed: seed, best, best_count, best_burst })
    }
}

impl ShortBursts<ReCom> {
    /// ReCom bursts with constraints built from `seed`: population balance around the seed's
    /// ideal, a cut-edge bound relative to the seed and, if configured, contiguity.
    pub fn from_config(config: &BurstConfig, seed: &Plan) -> Result<Self> {
        let population = PopulationBalance::within_percent_of_ideal(seed, &config.population, config.epsilon)?;
        let proposal = ReCom::new(&config.population, population.ideal(), config.epsilon, config.max_tree_attempts);

        let mut constraints = Constraints::new()
            .with(UpperBound::cut_edges(seed, config.compactness_factor))
            .with(population);
        if config.require_contiguity {
            constraints = constraints.with(Contiguous);
        }

        Ok(Self::new(
            proposal,
            constraints,
            MajorityMinority::new(&config.bvap, &config.vap, config.threshold),
            config.burst_length,
            config.num_bursts,
            config.max_proposal_attempts,
        ))
    }
}
