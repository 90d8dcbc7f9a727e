//! Checks every plan must satisfy, whatever the input.

#![allow(dead_code)]

use std::collections::HashSet;

use drone_route_planner::haversine::haversine_km;
use drone_route_planner::models::PlanningRequest;
use drone_route_planner::planner::{LegKind, PlanOutcome, PlanState};

const EPS: f64 = 1e-9;

pub fn assert_plan_invariants(request: &PlanningRequest, outcome: &PlanOutcome) {
    let n = request.destinations.len();
    assert!(outcome.state.is_terminal(), "plan ended in {:?}", outcome.state);
    assert!(
        outcome.steps.len() <= 2 * n + 1,
        "{} steps for {} destinations",
        outcome.steps.len(),
        n
    );

    // Conservation: visited and unvisited partition the input ids
    let input: HashSet<&str> = request.destinations.iter().map(|d| d.id.as_str()).collect();
    let visited = outcome.visited_ids();
    let visited_set: HashSet<&str> = visited.iter().copied().collect();
    assert_eq!(visited.len(), visited_set.len(), "destination visited twice");
    let unvisited: HashSet<&str> = outcome.unvisited.iter().map(String::as_str).collect();
    assert!(visited_set.is_disjoint(&unvisited));
    let all: HashSet<&str> = visited_set.union(&unvisited).copied().collect();
    assert_eq!(all, input);
    match outcome.state {
        PlanState::Done => assert!(outcome.unvisited.is_empty()),
        PlanState::Aborted => assert!(!outcome.unvisited.is_empty()),
        other => panic!("non-terminal outcome {:?}", other),
    }

    let depot = request.depot.coordinate;
    let mut previous_cumulative = 0.0;
    for step in &outcome.steps {
        assert!(step.cumulative_distance_km >= previous_cumulative);
        previous_cumulative = step.cumulative_distance_km;

        assert!((0.0..=100.0).contains(&step.battery_pct), "battery {}", step.battery_pct);
        assert!(step.remaining_range_km >= 0.0);
        assert!(step.remaining_range_before_km <= step.capacity_km + EPS);

        if step.kind == LegKind::Delivery {
            let inbound = haversine_km(step.coordinate, depot);
            assert!(
                step.distance_km + inbound <= step.remaining_range_before_km - step.safety_margin_km + EPS,
                "leg to {} broke the round-trip guarantee",
                step.next
            );
        } else {
            assert_eq!(step.next, request.depot.name);
            assert_eq!(step.coordinate, depot);
        }
    }

    // A finished route always ends at the depot
    if outcome.state == PlanState::Done {
        if let Some(last) = outcome.steps.last() {
            assert_eq!(last.coordinate, depot);
        }
    }
}
