//! Route planner: nearest feasible destination with recharge cycles.
//!
//! The drone starts fully charged at the depot and repeatedly flies to the
//! nearest destination it could still reach *and* come back from. When no
//! such destination exists it returns to the depot to recharge; if even a
//! fresh charge does not help, planning aborts with a partial route.
//!
//! Capacity is only recomputed at plan start and at each recharge, using the
//! payload still aboard at that moment. The safety margin is derived from
//! that cached capacity.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::energy::{battery_pct, capacity_km, consumption_factor};
use crate::haversine::haversine_km;
use crate::models::{Coordinate, Destination, PlanningRequest};

/// Planner state. The planner starts in `FlyingToTarget` at the depot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanState {
    FlyingToTarget,
    ReturningToRecharge,
    Done,
    Aborted,
}

impl PlanState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PlanState::Done | PlanState::Aborted)
    }
}

/// Why a leg was flown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegKind {
    Delivery,
    ReturnToRecharge,
    FinalReturn,
}

/// One leg of the route. The sequence of steps is the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub kind: LegKind,
    pub previous: String,
    pub next: String,
    /// Destination delivered to; `None` on legs back to the depot.
    pub destination_id: Option<String>,
    pub coordinate: Coordinate,
    pub distance_km: f64,
    pub cumulative_distance_km: f64,
    /// Battery left after the leg, against the capacity cached at departure.
    pub battery_pct: f64,
    pub remaining_range_before_km: f64,
    pub remaining_range_km: f64,
    pub capacity_km: f64,
    pub safety_margin_km: f64,
    /// Total payload aboard at departure.
    pub payload_kg: f64,
    pub vehicle_id: String,
    pub speed_kmh: f64,
    pub max_payload_kg: f64,
    pub base_range_km: f64,
}

impl Step {
    pub fn distance_m(&self) -> f64 {
        self.distance_km * 1000.0
    }

    pub fn is_return(&self) -> bool {
        self.kind != LegKind::Delivery
    }
}

/// Ordered names of the delivered destinations, depot excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub route: Vec<String>,
}

impl RouteSummary {
    pub fn from_steps(steps: &[Step]) -> Self {
        let route = steps
            .iter()
            .filter(|step| step.kind == LegKind::Delivery)
            .map(|step| step.next.clone())
            .collect();
        Self { route }
    }
}

/// Terminal result of a planning call.
///
/// An aborted plan is still a valid, usable partial route.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub state: PlanState,
    pub steps: Vec<Step>,
    /// Ids of destinations that could not be reached, in input order.
    pub unvisited: Vec<String>,
}

impl PlanOutcome {
    pub fn is_complete(&self) -> bool {
        self.state == PlanState::Done
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary::from_steps(&self.steps)
    }

    pub fn visited_ids(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| step.destination_id.as_deref())
            .collect()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.steps
            .last()
            .map(|step| step.cumulative_distance_km)
            .unwrap_or(0.0)
    }
}

/// Explicit state machine over one planning request.
///
/// Each call to [`RoutePlanner::transition`] performs one state transition
/// and returns the leg it flew, if any. Inputs are only borrowed.
#[derive(Debug, Clone)]
pub struct RoutePlanner<'a> {
    request: &'a PlanningRequest,
    remaining: Vec<&'a Destination>,
    state: PlanState,
    current: Coordinate,
    current_name: &'a str,
    capacity_km: f64,
    remaining_range_km: f64,
    payload_kg: f64,
    cumulative_km: f64,
    /// Charged since the payload last changed.
    fully_charged: bool,
}

impl<'a> RoutePlanner<'a> {
    pub fn new(request: &'a PlanningRequest) -> Self {
        let payload_kg = request.total_payload_kg().max(0.0);
        let capacity = capacity_km(&request.vehicle, payload_kg);

        Self {
            request,
            remaining: request.destinations.iter().collect(),
            state: PlanState::FlyingToTarget,
            current: request.depot.coordinate,
            current_name: &request.depot.name,
            capacity_km: capacity,
            remaining_range_km: capacity,
            payload_kg,
            cumulative_km: 0.0,
            fully_charged: true,
        }
    }

    pub fn state(&self) -> PlanState {
        self.state
    }

    pub fn capacity_km(&self) -> f64 {
        self.capacity_km
    }

    pub fn remaining_range_km(&self) -> f64 {
        self.remaining_range_km
    }

    pub fn payload_kg(&self) -> f64 {
        self.payload_kg
    }

    pub fn position(&self) -> Coordinate {
        self.current
    }

    pub fn remaining(&self) -> impl Iterator<Item = &'a Destination> + '_ {
        self.remaining.iter().copied()
    }

    pub fn at_depot(&self) -> bool {
        self.current == self.request.depot.coordinate
    }

    /// Safety margin from the capacity cached at the last recharge.
    pub fn safety_margin_km(&self) -> f64 {
        self.capacity_km * self.request.safety_margin_ratio
    }

    /// Perform one transition. Terminal states are left unchanged.
    pub fn transition(&mut self) -> Option<Step> {
        match self.state {
            PlanState::FlyingToTarget => self.fly_to_target(),
            PlanState::ReturningToRecharge => {
                let step = self.fly_to_depot(LegKind::ReturnToRecharge);
                self.recharge();
                self.state = PlanState::FlyingToTarget;
                Some(step)
            }
            PlanState::Done | PlanState::Aborted => None,
        }
    }

    /// Drive the machine to a terminal state.
    pub fn run(mut self) -> PlanOutcome {
        let mut steps = Vec::with_capacity(2 * self.remaining.len() + 1);
        while !self.state.is_terminal() {
            if let Some(step) = self.transition() {
                steps.push(step);
            }
        }

        let unvisited: Vec<String> = self
            .remaining
            .iter()
            .map(|destination| destination.id.clone())
            .collect();

        info!(
            vehicle_id = %self.request.vehicle.id,
            state = ?self.state,
            steps = steps.len(),
            unvisited = unvisited.len(),
            total_km = self.cumulative_km,
            "route planned"
        );

        PlanOutcome {
            state: self.state,
            steps,
            unvisited,
        }
    }

    fn fly_to_target(&mut self) -> Option<Step> {
        if self.remaining.is_empty() {
            self.state = PlanState::Done;
            if self.at_depot() {
                return None;
            }
            return Some(self.fly_to_depot(LegKind::FinalReturn));
        }

        if self.capacity_km <= 0.0 {
            self.abort();
            return None;
        }

        let margin = self.safety_margin_km();
        if let Some(index) = self.nearest_feasible(margin) {
            return Some(self.deliver(index, margin));
        }

        if !self.at_depot() {
            debug!(from = self.current_name, "nothing reachable, returning to recharge");
            self.state = PlanState::ReturningToRecharge;
        } else if !self.fully_charged {
            self.recharge();
        } else {
            self.abort();
        }
        None
    }

    /// First destination with the smallest outbound distance among those
    /// that still leave enough range to get back to the depot.
    fn nearest_feasible(&self, margin_km: f64) -> Option<usize> {
        let depot = self.request.depot.coordinate;
        let budget_km = self.remaining_range_km - margin_km;
        let mut best: Option<(usize, f64)> = None;

        for (index, destination) in self.remaining.iter().enumerate() {
            let outbound = haversine_km(self.current, destination.coordinate);
            let inbound = haversine_km(destination.coordinate, depot);
            if outbound + inbound > budget_km {
                continue;
            }
            if best.is_none_or(|(_, nearest)| outbound < nearest) {
                best = Some((index, outbound));
            }
        }

        best.map(|(index, _)| index)
    }

    fn deliver(&mut self, index: usize, margin_km: f64) -> Step {
        let destination = self.remaining.remove(index);
        let distance_km = haversine_km(self.current, destination.coordinate);
        let step = self.fly(
            LegKind::Delivery,
            &destination.name,
            Some(&destination.id),
            destination.coordinate,
            distance_km,
            margin_km,
        );

        self.payload_kg = (self.payload_kg - destination.weight_kg).max(0.0);
        self.remaining_range_km = self.remaining_range_km.min(self.capacity_km);
        self.current = destination.coordinate;
        self.current_name = &destination.name;
        self.fully_charged = false;

        debug!(
            to = %destination.name,
            distance_km,
            range_km = self.remaining_range_km,
            payload_kg = self.payload_kg,
            "delivery leg"
        );
        step
    }

    fn fly_to_depot(&mut self, kind: LegKind) -> Step {
        let request = self.request;
        let depot = &request.depot;
        let distance_km = haversine_km(self.current, depot.coordinate);
        let margin_km = self.safety_margin_km();
        let step = self.fly(kind, &depot.name, None, depot.coordinate, distance_km, margin_km);

        self.current = depot.coordinate;
        self.current_name = &depot.name;
        step
    }

    fn fly(
        &mut self,
        kind: LegKind,
        next: &str,
        destination_id: Option<&str>,
        coordinate: Coordinate,
        distance_km: f64,
        margin_km: f64,
    ) -> Step {
        let request = self.request;
        let vehicle = &request.vehicle;
        let range_before = self.remaining_range_km;
        let consumed = distance_km * consumption_factor(self.payload_kg, vehicle);
        self.remaining_range_km = (range_before - consumed).max(0.0);
        self.cumulative_km += distance_km;

        Step {
            kind,
            previous: self.current_name.to_string(),
            next: next.to_string(),
            destination_id: destination_id.map(str::to_string),
            coordinate,
            distance_km,
            cumulative_distance_km: self.cumulative_km,
            battery_pct: battery_pct(self.remaining_range_km, self.capacity_km),
            remaining_range_before_km: range_before,
            remaining_range_km: self.remaining_range_km,
            capacity_km: self.capacity_km,
            safety_margin_km: margin_km,
            payload_kg: self.payload_kg,
            vehicle_id: vehicle.id.clone(),
            speed_kmh: vehicle.speed_kmh,
            max_payload_kg: vehicle.max_payload_kg,
            base_range_km: vehicle.base_range_km,
        }
    }

    fn recharge(&mut self) {
        self.capacity_km = capacity_km(&self.request.vehicle, self.payload_kg);
        self.remaining_range_km = self.capacity_km;
        self.fully_charged = true;
        debug!(
            capacity_km = self.capacity_km,
            payload_kg = self.payload_kg,
            "recharged at depot"
        );
    }

    fn abort(&mut self) {
        warn!(
            vehicle_id = %self.request.vehicle.id,
            unvisited = self.remaining.len(),
            capacity_km = self.capacity_km,
            "no feasible targets within range for current payload; aborting planning"
        );
        self.state = PlanState::Aborted;
    }
}

/// Plan a single request.
pub fn plan(request: &PlanningRequest) -> PlanOutcome {
    RoutePlanner::new(request).run()
}

/// Plan independent requests in parallel, one per vehicle.
///
/// Outcomes are returned in request order.
pub fn plan_batch(requests: &[PlanningRequest]) -> Vec<PlanOutcome> {
    requests.par_iter().map(plan).collect()
}
