//! Capacitated assignment evaluation.
//!
//! Given a set of open locations, serves every customer's demand greedily:
//! customers are ranked by urgency, and each ranked customer is sent to its
//! nearest open location with spare capacity. As soon as a location fills up
//! the ranking is stale, so the pass stops and urgencies are recomputed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, trace};

use crate::error::EvaluationError;
use crate::state::AssignmentState;
use crate::traits::{CapacityProvider, CustomerId, LocationId};
use crate::urgency::{TieBreak, nearest_open, nearest_unconstrained, rank_urgencies};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateOptions {
    /// Tie-break for every nearest-location scan.
    pub tie_break: TieBreak,
}

/// Evaluates open-location sets against a borrowed provider.
#[derive(Debug, Clone)]
pub struct Evaluator<'a, P> {
    provider: &'a P,
    options: EvaluateOptions,
}

impl<'a, P: CapacityProvider> Evaluator<'a, P> {
    pub fn new(provider: &'a P, options: EvaluateOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &'a P {
        self.provider
    }

    pub fn options(&self) -> &EvaluateOptions {
        &self.options
    }

    /// Builds a fresh assignment for `open`.
    ///
    /// Fails with [`EvaluationError::Infeasible`] before allocating anything
    /// when the open capacity cannot cover the total demand.
    #[instrument(skip_all, level = "debug", fields(open = open.len()))]
    pub fn evaluate(&self, open: &BTreeSet<LocationId>) -> Result<AssignmentState, EvaluationError> {
        let provider = self.provider;
        let tie = self.options.tie_break;

        if let Some(&unknown) = open.iter().find(|&&loc| loc >= provider.location_count()) {
            return Err(EvaluationError::UnknownLocation(unknown));
        }

        let mut state = AssignmentState::empty(provider, open.clone());

        let capacity = provider.total_capacity(open.iter().copied());
        let demand = provider.total_demand();
        if capacity < demand {
            debug!(capacity, demand, "open capacity below total demand");
            return Err(EvaluationError::Infeasible { capacity, demand });
        }

        let mut rounds = 0usize;
        loop {
            let ranking = rank_urgencies(provider, &state, tie);
            if ranking.is_empty() {
                break;
            }
            rounds += 1;
            trace!(round = rounds, pending = ranking.len(), "ranked customers");

            for (customer, _) in ranking {
                if self.serve(&mut state, customer)? {
                    break;
                }
            }
        }

        state.settle_objective();
        debug!(rounds, objective = state.objective(), "evaluation finished");
        Ok(state)
    }

    /// Serves `customer` until it is satisfied or its nearest location fills
    /// up. Returns `true` when a location was saturated.
    fn serve(&self, state: &mut AssignmentState, customer: CustomerId) -> Result<bool, EvaluationError> {
        let provider = self.provider;

        loop {
            let need = state.remaining_demand(provider, customer);
            if need == 0 {
                return Ok(false);
            }

            let Some((location, _)) = nearest_open(provider, state, customer, None, self.options.tie_break)
            else {
                error!(customer, remaining = need, "no open location has spare capacity");
                return Err(EvaluationError::Unassignable {
                    customer,
                    remaining: need,
                });
            };

            let room = state.spare_capacity(provider, location);
            let amount = room.min(need);
            state.allocate(provider, location, customer, amount);

            if room <= need {
                trace!(location, customer, amount, "location saturated");
                return Ok(true);
            }
        }
    }

    /// Replaces `old` with `new` in the state's open set and evaluates the
    /// result from scratch.
    pub fn swap_location(
        &self,
        state: &AssignmentState,
        old: LocationId,
        new: LocationId,
    ) -> Result<AssignmentState, EvaluationError> {
        let mut open = state.open_locations().clone();
        open.remove(&old);
        open.insert(new);
        self.evaluate(&open)
    }

    /// Closest open location by weighted distance, regardless of capacity.
    pub fn nearest_facility(&self, open: &BTreeSet<LocationId>, customer: CustomerId) -> Option<LocationId> {
        nearest_unconstrained(self.provider, open, customer, self.options.tie_break)
    }
}
