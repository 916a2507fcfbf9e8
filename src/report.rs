//! Human and machine readable summaries of an assignment.

use std::fmt;

use serde::Serialize;

use crate::state::{AssignmentEntry, AssignmentState};
use crate::traits::{CapacityProvider, CustomerId, LocationId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationUsage {
    pub location: LocationId,
    pub usage: u64,
    pub capacity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAssignment {
    pub customer: CustomerId,
    pub demand: u64,
    pub satisfied: u64,
    pub entries: Vec<AssignmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentReport {
    pub objective: f64,
    pub open_locations: Vec<LocationId>,
    pub locations: Vec<LocationUsage>,
    pub customers: Vec<CustomerAssignment>,
}

impl AssignmentReport {
    pub fn new<P: CapacityProvider>(state: &AssignmentState, provider: &P) -> Self {
        let locations = state
            .open_locations()
            .iter()
            .map(|&location| LocationUsage {
                location,
                usage: state.usage(location),
                capacity: provider.capacity_of(location),
            })
            .collect();

        let customers = provider
            .customers()
            .map(|customer| CustomerAssignment {
                customer,
                demand: provider.demand_of(customer),
                satisfied: state.satisfied(customer),
                entries: state.assignments(customer).to_vec(),
            })
            .collect();

        Self {
            objective: state.objective(),
            open_locations: state.open_locations().iter().copied().collect(),
            locations,
            customers,
        }
    }

    fn capacity_of(&self, location: LocationId) -> u64 {
        self.locations
            .iter()
            .find(|usage| usage.location == location)
            .map_or(0, |usage| usage.capacity)
    }
}

impl fmt::Display for AssignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OBJECTIVE")?;
        writeln!(f, "{:.15}", self.objective)?;
        writeln!(f)?;

        writeln!(f, "OPEN LOCATIONS")?;
        for location in &self.open_locations {
            writeln!(f, "{location}")?;
        }
        writeln!(f)?;

        writeln!(f, "LOCATION USAGES")?;
        writeln!(f, "location (usage/capacity)")?;
        for usage in &self.locations {
            writeln!(f, "{} ({}/{})", usage.location, usage.usage, usage.capacity)?;
        }
        writeln!(f)?;

        writeln!(f, "CUSTOMER ASSIGNMENTS")?;
        writeln!(f, "customer (satisfied/demand) -> location (amount/capacity)")?;
        for customer in &self.customers {
            write!(f, "{} ({}/{}) ->", customer.customer, customer.satisfied, customer.demand)?;
            for entry in &customer.entries {
                write!(
                    f,
                    " {} ({}/{})",
                    entry.location,
                    entry.amount,
                    self.capacity_of(entry.location)
                )?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
