//! Telemetry messages and the sinks that receive them.
//!
//! The planner emits plain [`Step`] values; this module turns them into the
//! JSON shape the map display consumes and hands them, in order, to a
//! [`TelemetrySink`].

use std::io::Write;
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::planner::{PlanOutcome, RouteSummary, Step};
use crate::traits::TelemetrySink;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("telemetry write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("telemetry request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Map coordinates: `x` is longitude, `y` latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireCoordinates {
    pub x: f64,
    pub y: f64,
}

/// Wire form of a single leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMessage {
    pub previous: String,
    pub next: String,
    pub coordinates: WireCoordinates,
    /// Leg length in metres.
    pub distance: f64,
    pub distance_km: f64,
    pub cumulative_distance_km: f64,
    pub battery_pct: f64,
    pub speed_kmh: f64,
    pub drone_id: String,
    pub max_payload_kg: f64,
    pub base_range_km: f64,
    pub payload_kg: f64,
}

impl From<&Step> for StepMessage {
    fn from(step: &Step) -> Self {
        Self {
            previous: step.previous.clone(),
            next: step.next.clone(),
            coordinates: WireCoordinates {
                x: step.coordinate.lon,
                y: step.coordinate.lat,
            },
            distance: round_to(step.distance_m(), 2),
            distance_km: round_to(step.distance_km, 3),
            cumulative_distance_km: round_to(step.cumulative_distance_km, 3),
            battery_pct: round_to(step.battery_pct, 1),
            speed_kmh: step.speed_kmh,
            drone_id: step.vehicle_id.clone(),
            max_payload_kg: step.max_payload_kg,
            base_range_km: step.base_range_km,
            payload_kg: round_to(step.payload_kg, 3),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Counts from one [`publish_route`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub steps_sent: usize,
    pub steps_failed: usize,
}

/// Send every step in order, then the route summary.
///
/// A step that fails to send is logged and skipped so the consumer still
/// receives the rest of the route. A failed summary is returned.
pub fn publish_route<S>(sink: &S, outcome: &PlanOutcome) -> Result<PublishReport, TelemetryError>
where
    S: TelemetrySink + ?Sized,
{
    let mut report = PublishReport::default();
    for step in &outcome.steps {
        match sink.send_step(&StepMessage::from(step)) {
            Ok(()) => report.steps_sent += 1,
            Err(err) => {
                warn!(next = %step.next, error = %err, "failed to publish step");
                report.steps_failed += 1;
            }
        }
    }

    sink.send_summary(&outcome.summary())?;
    debug!(sent = report.steps_sent, failed = report.steps_failed, "route published");
    Ok(report)
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_line<T: Serialize>(&self, value: &T) -> Result<(), TelemetryError> {
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        serde_json::to_writer(&mut *writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn send_step(&self, step: &StepMessage) -> Result<(), TelemetryError> {
        self.write_line(step)
    }

    fn send_summary(&self, summary: &RouteSummary) -> Result<(), TelemetryError> {
        self.write_line(summary)
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    last_step: Option<StepMessage>,
    last_route: Vec<String>,
}

/// Last observed step and route, shared between a publisher and readers.
///
/// Readers get clones; writers replace the whole value.
#[derive(Debug, Default)]
pub struct LastKnownState {
    inner: RwLock<Snapshot>,
}

impl LastKnownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_step(&self) -> Option<StepMessage> {
        self.read().last_step.clone()
    }

    pub fn last_route(&self) -> Vec<String> {
        self.read().last_route.clone()
    }

    pub fn replace_step(&self, step: StepMessage) {
        self.write().last_step = Some(step);
    }

    pub fn replace_route(&self, route: Vec<String>) {
        self.write().last_route = route;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TelemetrySink for LastKnownState {
    fn send_step(&self, step: &StepMessage) -> Result<(), TelemetryError> {
        self.replace_step(step.clone());
        Ok(())
    }

    fn send_summary(&self, summary: &RouteSummary) -> Result<(), TelemetryError> {
        self.replace_route(summary.route.clone());
        Ok(())
    }
}
