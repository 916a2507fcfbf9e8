//! Assignment state produced by one evaluation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::{CapacityProvider, CustomerId, LocationId};

/// Part of a customer's demand served by one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub location: LocationId,
    pub amount: u64,
    /// `amount × real_distance(location, customer)`.
    pub cost: f64,
}

/// A broken invariant found by [`AssignmentState::check`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("location {location} uses {usage} of capacity {capacity}")]
    OverCapacity {
        location: LocationId,
        usage: u64,
        capacity: u64,
    },

    #[error("customer {customer} is satisfied {satisfied} of demand {demand}")]
    OverSatisfied {
        customer: CustomerId,
        satisfied: u64,
        demand: u64,
    },

    #[error("customer {customer} is satisfied {satisfied} of demand {demand} although capacity suffices")]
    Unsatisfied {
        customer: CustomerId,
        satisfied: u64,
        demand: u64,
    },

    #[error("customer {customer} entries sum to {assigned} but satisfaction is {satisfied}")]
    EntrySum {
        customer: CustomerId,
        assigned: u128,
        satisfied: u64,
    },

    #[error("customer {customer} is served by closed location {location}")]
    ClosedLocation {
        customer: CustomerId,
        location: LocationId,
    },

    #[error("location {location} usage {usage} differs from its entries ({assigned})")]
    UsageMismatch {
        location: LocationId,
        usage: u64,
        assigned: u128,
    },

    /// The state was built for a provider with different location or
    /// customer counts.
    #[error("state covers {locations} locations and {customers} customers, provider has {expected_locations} and {expected_customers}")]
    Shape {
        locations: usize,
        customers: usize,
        expected_locations: usize,
        expected_customers: usize,
    },

    #[error("objective {reported} differs from recomputed {recomputed}")]
    Objective { reported: f64, recomputed: f64 },
}

/// Usage, satisfaction, entries and objective for one open-location set.
///
/// Vectors are dense over the provider's id space; closed locations keep a
/// usage of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentState {
    open: BTreeSet<LocationId>,
    usage: Vec<u64>,
    satisfied: Vec<u64>,
    assignments: Vec<Vec<AssignmentEntry>>,
    objective: f64,
}

impl AssignmentState {
    pub(crate) fn empty<P: CapacityProvider>(provider: &P, open: BTreeSet<LocationId>) -> Self {
        Self {
            open,
            usage: vec![0; provider.location_count()],
            satisfied: vec![0; provider.customer_count()],
            assignments: vec![Vec::new(); provider.customer_count()],
            objective: 0.0,
        }
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn open_locations(&self) -> &BTreeSet<LocationId> {
        &self.open
    }

    pub fn is_open(&self, location: LocationId) -> bool {
        self.open.contains(&location)
    }

    /// # Panics
    ///
    /// Panics if `location` is outside the id space of the provider the state
    /// was evaluated against.
    pub fn usage(&self, location: LocationId) -> u64 {
        self.usage[location]
    }

    /// # Panics
    ///
    /// Panics if `customer` is outside the provider's id space, as do
    /// [`Self::assignments`] and [`Self::remaining_demand`].
    pub fn satisfied(&self, customer: CustomerId) -> u64 {
        self.satisfied[customer]
    }

    pub fn assignments(&self, customer: CustomerId) -> &[AssignmentEntry] {
        &self.assignments[customer]
    }

    pub fn spare_capacity<P: CapacityProvider>(&self, provider: &P, location: LocationId) -> u64 {
        provider.capacity_of(location).saturating_sub(self.usage[location])
    }

    pub fn remaining_demand<P: CapacityProvider>(&self, provider: &P, customer: CustomerId) -> u64 {
        provider.demand_of(customer).saturating_sub(self.satisfied[customer])
    }

    /// Serves `amount` units of `customer` from `location`, returning the cost
    /// of the new entry.
    pub(crate) fn allocate<P: CapacityProvider>(
        &mut self,
        provider: &P,
        location: LocationId,
        customer: CustomerId,
        amount: u64,
    ) -> f64 {
        let cost = amount as f64 * provider.real_distance(location, customer);
        self.usage[location] += amount;
        self.satisfied[customer] += amount;
        self.assignments[customer].push(AssignmentEntry {
            location,
            amount,
            cost,
        });
        cost
    }

    /// Sets the objective to the sum of entry costs in customer order.
    pub(crate) fn settle_objective(&mut self) {
        self.objective = self
            .assignments
            .iter()
            .flatten()
            .fold(0.0, |total, entry| total + entry.cost);
    }

    /// Recomputes the objective from the provider's real distances, in the
    /// same summation order the evaluator uses.
    pub fn recompute_objective<P: CapacityProvider>(&self, provider: &P) -> f64 {
        self.assignments
            .iter()
            .enumerate()
            .flat_map(|(customer, entries)| entries.iter().map(move |entry| (customer, entry)))
            .fold(0.0, |total, (customer, entry)| {
                total + entry.amount as f64 * provider.real_distance(entry.location, customer)
            })
    }

    /// Verifies every bookkeeping invariant against the provider.
    ///
    /// A provider whose counts differ from the ones the state was built with
    /// is reported as [`InvariantViolation::Shape`].
    pub fn check<P: CapacityProvider>(&self, provider: &P) -> Result<(), InvariantViolation> {
        if self.usage.len() != provider.location_count() || self.satisfied.len() != provider.customer_count() {
            return Err(InvariantViolation::Shape {
                locations: self.usage.len(),
                customers: self.satisfied.len(),
                expected_locations: provider.location_count(),
                expected_customers: provider.customer_count(),
            });
        }

        let capacity = provider.total_capacity(self.open.iter().copied());
        let fully_feasible = capacity >= provider.total_demand();

        for &location in &self.open {
            let usage = self.usage[location];
            let capacity = provider.capacity_of(location);
            if usage > capacity {
                return Err(InvariantViolation::OverCapacity {
                    location,
                    usage,
                    capacity,
                });
            }
        }

        let mut assigned_per_location = vec![0u128; self.usage.len()];
        for customer in provider.customers() {
            let satisfied = self.satisfied[customer];
            let demand = provider.demand_of(customer);
            if satisfied > demand {
                return Err(InvariantViolation::OverSatisfied {
                    customer,
                    satisfied,
                    demand,
                });
            }
            if fully_feasible && satisfied < demand {
                return Err(InvariantViolation::Unsatisfied {
                    customer,
                    satisfied,
                    demand,
                });
            }

            let mut assigned = 0u128;
            for entry in &self.assignments[customer] {
                if !self.open.contains(&entry.location) {
                    return Err(InvariantViolation::ClosedLocation {
                        customer,
                        location: entry.location,
                    });
                }
                assigned += u128::from(entry.amount);
                assigned_per_location[entry.location] += u128::from(entry.amount);
            }
            if assigned != u128::from(satisfied) {
                return Err(InvariantViolation::EntrySum {
                    customer,
                    assigned,
                    satisfied,
                });
            }
        }

        for (location, (&usage, &assigned)) in self.usage.iter().zip(&assigned_per_location).enumerate() {
            if u128::from(usage) != assigned {
                return Err(InvariantViolation::UsageMismatch {
                    location,
                    usage,
                    assigned,
                });
            }
        }

        let recomputed = self.recompute_objective(provider);
        if recomputed != self.objective {
            return Err(InvariantViolation::Objective {
                reported: self.objective,
                recomputed,
            });
        }

        Ok(())
    }
}
