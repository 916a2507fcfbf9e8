use thiserror::Error;

use crate::traits::{CustomerId, LocationId};

/// Why an evaluation of an open-location set was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// Open capacity cannot cover the total demand. Detected before any
    /// allocation.
    #[error("total capacity ({capacity}) < total demand ({demand})")]
    Infeasible { capacity: u128, demand: u128 },

    /// A customer still needs service but every open location is full even
    /// though the capacity precheck passed. Indicates inconsistent data or
    /// accounting.
    #[error("customer {customer} has {remaining} unmet demand but no open location has spare capacity")]
    Unassignable {
        customer: CustomerId,
        remaining: u64,
    },

    /// The open set names a location id the provider does not have.
    #[error("open location {0} is not part of the instance")]
    UnknownLocation(LocationId),
}

impl EvaluationError {
    /// Whether an outer search may simply reject the move that produced this
    /// error.
    pub fn is_rejectable(&self) -> bool {
        matches!(self, EvaluationError::Infeasible { .. })
    }
}
