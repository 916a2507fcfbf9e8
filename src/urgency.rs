//! Urgency ranking and nearest-open-location queries.
//!
//! A customer is urgent when its nearest open location with spare capacity is
//! much cheaper than the runner-up: losing that location to someone else
//! would cost it the most.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::state::AssignmentState;
use crate::traits::{CapacityProvider, CustomerId, LocationId};

/// How nearest-location scans resolve equidistant candidates.
///
/// Open locations are always enumerated in ascending id order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// The lowest id among equidistant candidates wins.
    #[default]
    LowestId,
    /// The last equidistant candidate scanned (the highest id) wins.
    LastEncountered,
}

impl TieBreak {
    #[inline]
    fn prefers(self, candidate: f64, best: f64) -> bool {
        match self {
            TieBreak::LowestId => candidate < best,
            TieBreak::LastEncountered => candidate <= best,
        }
    }
}

/// Scans `candidates` for the minimum of `distance`, honouring `tie`.
fn argmin<I, F>(candidates: I, tie: TieBreak, mut distance: F) -> Option<(LocationId, f64)>
where
    I: IntoIterator<Item = LocationId>,
    F: FnMut(LocationId) -> f64,
{
    let mut best: Option<(LocationId, f64)> = None;
    for location in candidates {
        let dist = distance(location);
        match best {
            Some((_, best_dist)) if !tie.prefers(dist, best_dist) => {}
            _ => best = Some((location, dist)),
        }
    }
    best
}

/// Nearest open location with spare capacity, by real distance, optionally
/// skipping `forbidden`. Returns the location and its distance.
pub fn nearest_open<P: CapacityProvider>(
    provider: &P,
    state: &AssignmentState,
    customer: CustomerId,
    forbidden: Option<LocationId>,
    tie: TieBreak,
) -> Option<(LocationId, f64)> {
    let candidates = state
        .open_locations()
        .iter()
        .copied()
        .filter(|&loc| Some(loc) != forbidden && state.usage(loc) < provider.capacity_of(loc));

    argmin(candidates, tie, |loc| provider.real_distance(loc, customer))
}

/// Closest open location by weighted distance, ignoring capacity.
///
/// Only `None` when `open` is empty.
pub fn nearest_unconstrained<P: CapacityProvider>(
    provider: &P,
    open: &BTreeSet<LocationId>,
    customer: CustomerId,
    tie: TieBreak,
) -> Option<LocationId> {
    argmin(open.iter().copied(), tie, |loc| provider.weighted_distance(loc, customer))
        .map(|(location, _)| location)
}

/// Urgency of one customer: the gap between its two nearest open locations
/// with spare capacity.
///
/// A missing runner-up counts as infinitely far away, so a customer with a
/// single remaining option is maximally urgent. A customer with no option at
/// all is ranked maximally urgent too; the assignment loop reports it.
pub fn urgency_of<P: CapacityProvider>(
    provider: &P,
    state: &AssignmentState,
    customer: CustomerId,
    tie: TieBreak,
) -> f64 {
    let Some((first, first_dist)) = nearest_open(provider, state, customer, None, tie) else {
        return f64::INFINITY;
    };

    match nearest_open(provider, state, customer, Some(first), tie) {
        Some((_, second_dist)) => (first_dist - second_dist).abs(),
        None => f64::INFINITY,
    }
}

/// Every customer with unmet demand, paired with its urgency, most urgent
/// first. Equal urgencies keep the provider's customer order.
pub fn rank_urgencies<P: CapacityProvider>(
    provider: &P,
    state: &AssignmentState,
    tie: TieBreak,
) -> Vec<(CustomerId, f64)> {
    let mut ranking: Vec<(CustomerId, f64)> = provider
        .customers()
        .filter(|&customer| state.satisfied(customer) < provider.demand_of(customer))
        .map(|customer| (customer, urgency_of(provider, state, customer, tie)))
        .collect();

    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranking
}
