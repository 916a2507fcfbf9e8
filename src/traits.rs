//! Core domain traits for the facility planner.
//!
//! Locations and customers are addressed by dense indices. Concrete data
//! sources implement [`CapacityProvider`] for their own storage.

/// Index of a candidate facility location, in `0..location_count()`.
pub type LocationId = usize;

/// Index of a customer, in `0..customer_count()`.
pub type CustomerId = usize;

/// Read-only view of the instance the evaluator works against.
///
/// Implementations must be immutable for the lifetime of an evaluation and
/// must enumerate customers in a stable order.
pub trait CapacityProvider {
    fn location_count(&self) -> usize;

    fn customer_count(&self) -> usize;

    /// Capacity ceiling of a location.
    fn capacity_of(&self, location: LocationId) -> u64;

    /// Demand of a customer.
    fn demand_of(&self, customer: CustomerId) -> u64;

    /// All customers, in a stable order.
    fn customers(&self) -> impl Iterator<Item = CustomerId> + '_ {
        0..self.customer_count()
    }

    /// Sum of all demands, widened so it cannot overflow.
    fn total_demand(&self) -> u128 {
        self.customers().map(|customer| u128::from(self.demand_of(customer))).sum()
    }

    /// Sum of the capacities of `locations`, widened so it cannot overflow.
    fn total_capacity<I>(&self, locations: I) -> u128
    where
        I: IntoIterator<Item = LocationId>,
    {
        locations
            .into_iter()
            .map(|location| u128::from(self.capacity_of(location)))
            .sum()
    }

    /// Cost of serving one unit of a customer's demand from a location.
    fn real_distance(&self, location: LocationId, customer: CustomerId) -> f64;

    /// Alternate metric, used only by the unconstrained closest-facility query.
    fn weighted_distance(&self, location: LocationId, customer: CustomerId) -> f64;
}

/// Provides a rectangular cost matrix between two sets of coordinates.
///
/// Row `i` holds the costs from `sources[i]` to every destination, in the
/// provided destination order, so the result always has one row per source.
/// Coordinates are (lat, lng).
pub trait DistanceMatrixProvider {
    type Error: std::error::Error;

    fn matrix_for(
        &self,
        sources: &[(f64, f64)],
        destinations: &[(f64, f64)],
    ) -> Result<Vec<Vec<f64>>, Self::Error>;
}
