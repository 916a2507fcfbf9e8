//! Vertex-substitution search over open-location sets.
//!
//! Keeps the number of open locations fixed and repeatedly tries to replace
//! one open location by a closed one, re-evaluating every candidate swap from
//! scratch. Candidate swaps for one incoming location are independent and are
//! evaluated in parallel.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::EvaluationError;
use crate::evaluator::Evaluator;
use crate::state::AssignmentState;
use crate::traits::{CapacityProvider, LocationId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of accepted swaps.
    pub max_iterations: usize,
    /// A swap is accepted only if it lowers the objective by more than this.
    pub min_improvement: f64,
    /// Evaluate the swaps for one incoming location on the rayon pool.
    pub parallel: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            min_improvement: 1e-9,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: AssignmentState,
    /// Accepted swaps.
    pub iterations: usize,
    /// Evaluator calls, including the initial one.
    pub evaluations: usize,
}

pub struct VertexSubstitution<'a, P> {
    evaluator: Evaluator<'a, P>,
    options: SearchOptions,
}

impl<'a, P: CapacityProvider + Sync> VertexSubstitution<'a, P> {
    pub fn new(evaluator: Evaluator<'a, P>, options: SearchOptions) -> Self {
        Self { evaluator, options }
    }

    /// Improves `initial` until no single swap helps.
    ///
    /// Infeasible candidates are skipped. An error from the initial set, or
    /// an [`EvaluationError::Unassignable`] from any candidate, is returned.
    #[instrument(skip_all, level = "debug", fields(open = initial.len()))]
    pub fn run(&self, initial: &BTreeSet<LocationId>) -> Result<SearchOutcome, EvaluationError> {
        let mut best = self.evaluator.evaluate(initial)?;
        let mut iterations = 0;
        let mut evaluations = 1;
        let location_count = self.evaluator.provider().location_count();

        'search: while iterations < self.options.max_iterations {
            let mut improved = false;

            for incoming in 0..location_count {
                if best.is_open(incoming) {
                    continue;
                }

                let outgoing: Vec<LocationId> = best.open_locations().iter().copied().collect();
                evaluations += outgoing.len();

                let Some((removed, candidate)) = self.best_swap(&best, &outgoing, incoming)? else {
                    continue;
                };

                if candidate.objective() < best.objective() - self.options.min_improvement {
                    debug!(
                        removed,
                        added = incoming,
                        objective = candidate.objective(),
                        "accepted swap"
                    );
                    best = candidate;
                    iterations += 1;
                    improved = true;
                    if iterations >= self.options.max_iterations {
                        break 'search;
                    }
                }
            }

            if !improved {
                break;
            }
        }

        info!(iterations, evaluations, objective = best.objective(), "search finished");
        Ok(SearchOutcome {
            best,
            iterations,
            evaluations,
        })
    }

    /// Cheapest feasible swap bringing `incoming` in, if any. Ties keep the
    /// lowest outgoing id.
    fn best_swap(
        &self,
        current: &AssignmentState,
        outgoing: &[LocationId],
        incoming: LocationId,
    ) -> Result<Option<(LocationId, AssignmentState)>, EvaluationError> {
        let evaluate = |&removed: &LocationId| {
            (removed, self.evaluator.swap_location(current, removed, incoming))
        };

        let results: Vec<(LocationId, Result<AssignmentState, EvaluationError>)> = if self.options.parallel {
            outgoing.par_iter().map(evaluate).collect()
        } else {
            outgoing.iter().map(evaluate).collect()
        };

        let mut best: Option<(LocationId, AssignmentState)> = None;
        for (removed, result) in results {
            let candidate = match result {
                Ok(state) => state,
                Err(err) if err.is_rejectable() => {
                    debug!(removed, added = incoming, %err, "rejected swap");
                    continue;
                }
                Err(err) => return Err(err),
            };

            match &best {
                Some((_, incumbent)) if candidate.objective() >= incumbent.objective() => {}
                _ => best = Some((removed, candidate)),
            }
        }

        Ok(best)
    }
}
