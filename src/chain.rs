//! Markov chain over valid plans.

use anyhow::{bail, Result};
use rand::Rng;
use tracing::{debug, trace};

use crate::{constraints::Constraints, error::Error, proposal::Proposal, Plan};

/// A random walk over plans satisfying `constraints`.
///
/// Yields `total_steps` plans: the initial state first, then one accepted proposal per step.
/// Every valid proposal is accepted. Invalid proposals are resampled from the current state,
/// up to `max_attempts` times per step.
pub struct MarkovChain<'a, P, R: ?Sized> {
    proposal: &'a P,
    constraints: &'a Constraints,
    rng: &'a mut R,
    state: Plan,
    total_steps: usize,
    max_attempts: usize,
    step: usize,
    exhausted: bool,
}

impl<'a, P: Proposal, R: Rng + ?Sized> MarkovChain<'a, P, R> {
    /// Start a chain at `initial`, which must itself satisfy `constraints`.
    pub fn new(
        proposal: &'a P,
        constraints: &'a Constraints,
        initial: Plan,
        total_steps: usize,
        max_attempts: usize,
        rng: &'a mut R,
    ) -> Result<Self> {
        if let Some(name) = constraints.first_violation(&initial) {
            bail!(Error::InvalidInitialState(name.into()))
        }
        Ok(Self { proposal, constraints, rng, state: initial, total_steps, max_attempts, step: 0, exhausted: false })
    }

    /// Get the current state.
    #[inline] pub fn state(&self) -> &Plan { &self.state }

    /// Consume the chain, returning its current state.
    #[inline] pub fn into_state(self) -> Plan { self.state }

    /// Draw proposals until one satisfies every constraint.
    fn advance(&mut self) -> Option<Plan> {
        for attempt in 1..=self.max_attempts {
            let Some(candidate) = self.proposal.propose(&self.state, &mut *self.rng) else {
                trace!(step = self.step, attempt, "proposal produced no candidate");
                continue;
            };
            match self.constraints.first_violation(&candidate) {
                None => return Some(candidate),
                Some(name) => debug!(step = self.step, attempt, constraint = name, "proposal rejected"),
            }
        }
        None
    }
}

impl<P: Proposal, R: Rng + ?Sized> Iterator for MarkovChain<'_, P, R> {
    type Item = Result<Plan>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.step >= self.total_steps { return None }

        if self.step > 0 {
            match self.advance() {
                Some(plan) => self.state = plan,
                None => {
                    self.exhausted = true;
                    let err = Error::ProposalExhausted { step: self.step, attempts: self.max_attempts };
                    return Some(Err(err.into()));
                }
            }
        }

        self.step += 1;
        Some(Ok(self.state.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.exhausted { 0 } else { self.total_steps.saturating_sub(self.step) };
        (0, Some(remaining))
    }
}
