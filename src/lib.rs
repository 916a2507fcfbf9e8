//! facility-planner core
//!
//! Capacitated facility-location evaluation: greedy, urgency-driven
//! assignment of customer demand to a set of open locations, plus a
//! vertex-substitution search that drives it.

pub mod error;
pub mod evaluator;
pub mod haversine;
pub mod instance;
pub mod osrm;
pub mod report;
pub mod search;
pub mod state;
pub mod traits;
pub mod urgency;

pub use error::EvaluationError;
pub use evaluator::{EvaluateOptions, Evaluator};
pub use instance::{Instance, InstanceError};
pub use search::{SearchOptions, SearchOutcome, VertexSubstitution};
pub use state::{AssignmentEntry, AssignmentState};
pub use urgency::TieBreak;
