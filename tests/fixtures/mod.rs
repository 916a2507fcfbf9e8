//! Test fixtures for facility-planner.
//!
//! Small hand-traceable instances and a provider with inconsistent totals.

#![allow(dead_code)]

use facility_planner::Instance;
use facility_planner::traits::{CapacityProvider, CustomerId, LocationId};

/// Two locations with capacities [3, 2], two customers with demands [2, 3].
pub fn two_by_two() -> Instance {
    Instance::new(vec![3, 2], vec![2, 3], vec![vec![1.0, 5.0], vec![4.0, 1.0]]).unwrap()
}

/// Locations and customers placed on a line, distance = |x_location - x_customer|.
pub fn on_a_line(
    location_xs: &[f64],
    capacities: &[u64],
    customer_xs: &[f64],
    demands: &[u64],
) -> Instance {
    let distances = location_xs
        .iter()
        .map(|lx| customer_xs.iter().map(|cx| (lx - cx).abs()).collect())
        .collect();
    Instance::new(capacities.to_vec(), demands.to_vec(), distances).unwrap()
}

/// Two clusters, {0, 1} and {10, 11}, one location on every customer.
pub fn two_clusters() -> Instance {
    let xs = [0.0, 1.0, 10.0, 11.0];
    on_a_line(&xs, &[2, 2, 2, 2], &xs, &[1, 1, 1, 1])
}

/// Delegates to an instance but under-reports the total demand, so the
/// capacity precheck passes when it should not.
pub struct UnderReportedDemand(pub Instance);

impl CapacityProvider for UnderReportedDemand {
    fn location_count(&self) -> usize {
        self.0.location_count()
    }

    fn customer_count(&self) -> usize {
        self.0.customer_count()
    }

    fn capacity_of(&self, location: LocationId) -> u64 {
        self.0.capacity_of(location)
    }

    fn demand_of(&self, customer: CustomerId) -> u64 {
        self.0.demand_of(customer)
    }

    fn total_demand(&self) -> u128 {
        0
    }

    fn real_distance(&self, location: LocationId, customer: CustomerId) -> f64 {
        self.0.real_distance(location, customer)
    }

    fn weighted_distance(&self, location: LocationId, customer: CustomerId) -> f64 {
        self.0.weighted_distance(location, customer)
    }
}
