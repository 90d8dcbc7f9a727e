//! Collaborator seams around the planning engine.
//!
//! These are intentionally minimal. Concrete apps implement them for their
//! own storage, order system and transport.

use crate::models::{Depot, Location, Vehicle};
use crate::planner::RouteSummary;
use crate::telemetry::{StepMessage, TelemetryError};

/// Supplies the depot, the drone and the candidate locations for one plan.
pub trait FleetDirectory {
    fn depot(&self) -> &Depot;

    fn vehicle(&self) -> &Vehicle;

    /// Locations to deliver to. Order is irrelevant; ids are unique.
    fn locations(&self) -> &[Location];
}

/// Supplies the payload weight assigned to each location.
pub trait WeightSource {
    /// Weight in kilograms, or `None` when nothing is booked for the location.
    fn weight_for(&self, location_id: &str) -> Option<f64>;
}

/// Accepts step telemetry and the final route summary.
///
/// Sinks are shared between the publisher and readers, so both methods
/// take `&self`.
pub trait TelemetrySink {
    fn send_step(&self, step: &StepMessage) -> Result<(), TelemetryError>;

    fn send_summary(&self, summary: &RouteSummary) -> Result<(), TelemetryError>;
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for &T {
    fn send_step(&self, step: &StepMessage) -> Result<(), TelemetryError> {
        (**self).send_step(step)
    }

    fn send_summary(&self, summary: &RouteSummary) -> Result<(), TelemetryError> {
        (**self).send_summary(summary)
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Box<T> {
    fn send_step(&self, step: &StepMessage) -> Result<(), TelemetryError> {
        (**self).send_step(step)
    }

    fn send_summary(&self, summary: &RouteSummary) -> Result<(), TelemetryError> {
        (**self).send_summary(summary)
    }
}

impl<W: WeightSource + ?Sized> WeightSource for &W {
    fn weight_for(&self, location_id: &str) -> Option<f64> {
        (**self).weight_for(location_id)
    }
}

impl WeightSource for std::collections::HashMap<String, f64> {
    fn weight_for(&self, location_id: &str) -> Option<f64> {
        self.get(location_id).copied()
    }
}
