//! Dense in-memory instance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::{CapacityProvider, CustomerId, DistanceMatrixProvider, LocationId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    #[error("distance matrix has {rows} rows, expected one per location ({locations})")]
    RowCount { rows: usize, locations: usize },

    #[error("distance row for location {location} has {len} entries, expected {customers}")]
    RowLength {
        location: LocationId,
        len: usize,
        customers: usize,
    },

    #[error("distance from location {location} to customer {customer} is {value}")]
    InvalidDistance {
        location: LocationId,
        customer: CustomerId,
        value: f64,
    },

    #[error("{positions} positions given for {expected} entries")]
    PositionCount { positions: usize, expected: usize },

    /// The distance matrix provider could not produce a matrix.
    #[error("distance matrix unavailable: {0}")]
    Matrix(String),
}

/// Capacities, demands and a location-major real distance matrix.
///
/// The weighted distance is the real distance scaled by the customer's demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    capacities: Vec<u64>,
    demands: Vec<u64>,
    distances: Vec<f64>,
    total_demand: u128,
}

impl Instance {
    /// Builds an instance from `distances[location][customer]`.
    pub fn new(
        capacities: Vec<u64>,
        demands: Vec<u64>,
        distances: Vec<Vec<f64>>,
    ) -> Result<Self, InstanceError> {
        if distances.len() != capacities.len() {
            return Err(InstanceError::RowCount {
                rows: distances.len(),
                locations: capacities.len(),
            });
        }

        let mut flat = Vec::with_capacity(capacities.len() * demands.len());
        for (location, row) in distances.into_iter().enumerate() {
            if row.len() != demands.len() {
                return Err(InstanceError::RowLength {
                    location,
                    len: row.len(),
                    customers: demands.len(),
                });
            }
            for (customer, value) in row.into_iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(InstanceError::InvalidDistance {
                        location,
                        customer,
                        value,
                    });
                }
                flat.push(value);
            }
        }

        let total_demand = demands.iter().map(|&demand| u128::from(demand)).sum();
        Ok(Self {
            capacities,
            demands,
            distances: flat,
            total_demand,
        })
    }

    /// Builds an instance from (lat, lng) positions, asking `matrix` for the
    /// location → customer costs.
    pub fn from_positions<M: DistanceMatrixProvider>(
        capacities: Vec<u64>,
        location_positions: &[(f64, f64)],
        demands: Vec<u64>,
        customer_positions: &[(f64, f64)],
        matrix: &M,
    ) -> Result<Self, InstanceError> {
        if location_positions.len() != capacities.len() {
            return Err(InstanceError::PositionCount {
                positions: location_positions.len(),
                expected: capacities.len(),
            });
        }
        if customer_positions.len() != demands.len() {
            return Err(InstanceError::PositionCount {
                positions: customer_positions.len(),
                expected: demands.len(),
            });
        }

        let distances = matrix
            .matrix_for(location_positions, customer_positions)
            .map_err(|err| InstanceError::Matrix(err.to_string()))?;
        Self::new(capacities, demands, distances)
    }

    pub fn capacities(&self) -> &[u64] {
        &self.capacities
    }

    pub fn demands(&self) -> &[u64] {
        &self.demands
    }
}

impl CapacityProvider for Instance {
    fn location_count(&self) -> usize {
        self.capacities.len()
    }

    fn customer_count(&self) -> usize {
        self.demands.len()
    }

    fn capacity_of(&self, location: LocationId) -> u64 {
        self.capacities[location]
    }

    fn demand_of(&self, customer: CustomerId) -> u64 {
        self.demands[customer]
    }

    fn total_demand(&self) -> u128 {
        self.total_demand
    }

    fn real_distance(&self, location: LocationId, customer: CustomerId) -> f64 {
        self.distances[location * self.demands.len() + customer]
    }

    fn weighted_distance(&self, location: LocationId, customer: CustomerId) -> f64 {
        self.real_distance(location, customer) * self.demands[customer] as f64
    }
}
