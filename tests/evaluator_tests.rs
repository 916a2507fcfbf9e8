//! Evaluator tests
//!
//! Hand-traced rounds, error conditions, tie-breaks and swaps.

mod fixtures;

use std::collections::BTreeSet;

use facility_planner::traits::CapacityProvider;
use facility_planner::{
    AssignmentEntry, EvaluateOptions, EvaluationError, Evaluator, Instance, TieBreak,
};

use fixtures::{UnderReportedDemand, on_a_line, two_by_two, two_clusters};

fn evaluator<P: CapacityProvider>(provider: &P) -> Evaluator<'_, P> {
    Evaluator::new(provider, EvaluateOptions::default())
}

fn entry(location: usize, amount: u64, cost: f64) -> AssignmentEntry {
    AssignmentEntry {
        location,
        amount,
        cost,
    }
}

// ============================================================================
// Hand-traced instances
// ============================================================================

#[test]
fn urgent_customer_takes_its_cheap_location_first() {
    // Round 1: customer 1 (gap 4) beats customer 0 (gap 3) and fills
    // location 1 with 2 units. Round 2: only location 0 has room, both
    // customers are maximally urgent and are served in id order.
    let instance = two_by_two();
    let state = evaluator(&instance).evaluate(&BTreeSet::from([0, 1])).unwrap();

    assert_eq!(state.assignments(0), &[entry(0, 2, 2.0)]);
    assert_eq!(state.assignments(1), &[entry(1, 2, 2.0), entry(0, 1, 5.0)]);
    assert_eq!(state.usage(0), 3);
    assert_eq!(state.usage(1), 2);
    assert_eq!(state.objective(), 9.0);
    assert_eq!(state.check(&instance), Ok(()));
}

#[test]
fn exact_fill_triggers_reranking_before_next_customer() {
    // Customer 0 fills location 0 exactly. The stale ranking would send
    // customer 1 to location 1 next; after re-ranking customer 2 has lost
    // its best option and claims location 1 instead.
    let instance = Instance::new(
        vec![2, 1, 5],
        vec![2, 1, 1],
        vec![
            vec![0.0, 1.0, 1.0],
            vec![10.0, 2.0, 1.5],
            vec![10.0, 3.0, 9.0],
        ],
    )
    .unwrap();

    let state = evaluator(&instance).evaluate(&BTreeSet::from([0, 1, 2])).unwrap();

    assert_eq!(state.assignments(0), &[entry(0, 2, 0.0)]);
    assert_eq!(state.assignments(2), &[entry(1, 1, 1.5)]);
    assert_eq!(state.assignments(1), &[entry(2, 1, 3.0)]);
    assert_eq!(state.objective(), 4.5);
}

#[test]
fn demand_is_split_across_locations() {
    let instance = on_a_line(&[0.0, 5.0], &[2, 10], &[0.0], &[5]);
    let state = evaluator(&instance).evaluate(&BTreeSet::from([0, 1])).unwrap();

    assert_eq!(state.assignments(0), &[entry(0, 2, 0.0), entry(1, 3, 15.0)]);
    assert_eq!(state.satisfied(0), 5);
    assert_eq!(state.objective(), 15.0);
}

#[test]
fn zero_demand_customers_get_no_entries() {
    let instance = on_a_line(&[0.0], &[1], &[0.0, 3.0], &[0, 1]);
    let state = evaluator(&instance).evaluate(&BTreeSet::from([0])).unwrap();

    assert!(state.assignments(0).is_empty());
    assert_eq!(state.assignments(1), &[entry(0, 1, 3.0)]);
}

#[test]
fn closed_locations_are_never_used() {
    let instance = two_clusters();
    let state = evaluator(&instance).evaluate(&BTreeSet::from([0, 3])).unwrap();

    for customer in instance.customers() {
        assert!(state.assignments(customer).iter().all(|e| e.location == 0 || e.location == 3));
    }
    assert_eq!(state.usage(1), 0);
    assert_eq!(state.usage(2), 0);
    assert_eq!(state.objective(), 2.0);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn insufficient_capacity_is_infeasible() {
    let instance = two_by_two();
    let result = evaluator(&instance).evaluate(&BTreeSet::from([0]));

    assert_eq!(
        result,
        Err(EvaluationError::Infeasible {
            capacity: 3,
            demand: 5
        })
    );
    assert!(result.unwrap_err().is_rejectable());
}

#[test]
fn empty_open_set_is_infeasible_for_positive_demand() {
    let instance = two_by_two();
    let result = evaluator(&instance).evaluate(&BTreeSet::new());

    assert!(matches!(result, Err(EvaluationError::Infeasible { capacity: 0, demand: 5 })));
}

#[test]
fn inconsistent_totals_are_unassignable() {
    let provider = UnderReportedDemand(on_a_line(&[0.0], &[1], &[0.0], &[3]));
    let result = evaluator(&provider).evaluate(&BTreeSet::from([0]));

    let err = result.unwrap_err();
    assert_eq!(
        err,
        EvaluationError::Unassignable {
            customer: 0,
            remaining: 2
        }
    );
    assert!(!err.is_rejectable());
}

#[test]
fn unknown_location_is_rejected() {
    let instance = two_by_two();
    let result = evaluator(&instance).evaluate(&BTreeSet::from([0, 7]));

    assert_eq!(result, Err(EvaluationError::UnknownLocation(7)));
}

// ============================================================================
// Quantities near u64::MAX
// ============================================================================

#[test]
fn capacities_summing_past_u64_are_evaluated() {
    let instance = Instance::new(vec![u64::MAX, u64::MAX], vec![1], vec![vec![1.0], vec![2.0]]).unwrap();
    let state = evaluator(&instance).evaluate(&BTreeSet::from([0, 1])).unwrap();

    assert_eq!(state.assignments(0), &[entry(0, 1, 1.0)]);
    assert_eq!(state.usage(1), 0);
    assert_eq!(state.check(&instance), Ok(()));
}

#[test]
fn demands_summing_past_u64_report_exact_totals() {
    let instance = Instance::new(vec![u64::MAX], vec![u64::MAX, u64::MAX], vec![vec![1.0, 1.0]]).unwrap();
    let result = evaluator(&instance).evaluate(&BTreeSet::from([0]));

    assert_eq!(
        result,
        Err(EvaluationError::Infeasible {
            capacity: u128::from(u64::MAX),
            demand: 2 * u128::from(u64::MAX),
        })
    );
}

// ============================================================================
// Tie-breaks
// ============================================================================

#[test]
fn tie_break_selects_lowest_or_last_equidistant_location() {
    let instance = on_a_line(&[0.0, 2.0], &[1, 1], &[1.0], &[1]);
    let open = BTreeSet::from([0, 1]);

    let lowest = Evaluator::new(&instance, EvaluateOptions { tie_break: TieBreak::LowestId })
        .evaluate(&open)
        .unwrap();
    let last = Evaluator::new(
        &instance,
        EvaluateOptions {
            tie_break: TieBreak::LastEncountered,
        },
    )
    .evaluate(&open)
    .unwrap();

    assert_eq!(lowest.assignments(0), &[entry(0, 1, 1.0)]);
    assert_eq!(last.assignments(0), &[entry(1, 1, 1.0)]);
}

#[test]
fn nearest_facility_ignores_capacity() {
    // Customer 1 weighs 3, so its weighted distances are 3 and 6.
    let instance = on_a_line(&[0.0, 3.0], &[0, 10], &[0.0, 1.0], &[1, 3]);
    let evaluator = evaluator(&instance);

    assert_eq!(evaluator.nearest_facility(&BTreeSet::from([0, 1]), 1), Some(0));
    assert_eq!(evaluator.nearest_facility(&BTreeSet::from([1]), 1), Some(1));
    assert_eq!(evaluator.nearest_facility(&BTreeSet::new(), 1), None);
}

// ============================================================================
// Re-evaluation
// ============================================================================

#[test]
fn repeated_evaluation_is_identical() {
    let instance = two_clusters();
    let evaluator = evaluator(&instance);
    let open = BTreeSet::from([1, 2]);

    let first = evaluator.evaluate(&open).unwrap();
    let second = evaluator.evaluate(&open).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.objective().to_bits(), second.objective().to_bits());
}

#[test]
fn swap_matches_direct_evaluation() {
    let instance = two_clusters();
    let evaluator = evaluator(&instance);
    let state = evaluator.evaluate(&BTreeSet::from([0, 1])).unwrap();

    let swapped = evaluator.swap_location(&state, 1, 3).unwrap();
    let direct = evaluator.evaluate(&BTreeSet::from([0, 3])).unwrap();

    assert_eq!(swapped, direct);
    assert_eq!(swapped.open_locations(), &BTreeSet::from([0, 3]));
    assert!(swapped.objective() < state.objective());
}

#[test]
fn swap_into_infeasible_set_fails() {
    let instance = on_a_line(&[0.0, 1.0, 2.0], &[2, 2, 0], &[0.0, 1.0, 2.0], &[1, 1, 1]);
    let evaluator = evaluator(&instance);
    let state = evaluator.evaluate(&BTreeSet::from([0, 1])).unwrap();

    let result = evaluator.swap_location(&state, 0, 2);
    assert_eq!(
        result,
        Err(EvaluationError::Infeasible {
            capacity: 2,
            demand: 3
        })
    );
}
