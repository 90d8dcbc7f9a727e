//! Plain value types handed to the planner.
//!
//! Everything here is resolved by external collaborators before planning
//! starts; the planner only ever borrows these values.

use serde::{Deserialize, Serialize};

use crate::traits::{FleetDirectory, WeightSource};

/// Safety margin applied when no ratio is given.
pub const DEFAULT_SAFETY_MARGIN_RATIO: f64 = 0.05;

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// The fixed station every route starts from and returns to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl Depot {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            coordinate: Coordinate::new(lat, lon),
        }
    }
}

/// Static capabilities of the drone flying the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Full-charge range with no payload aboard.
    pub base_range_km: f64,
    pub max_payload_kg: f64,
    /// Reported on telemetry only; plays no part in energy math.
    pub speed_kmh: f64,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, base_range_km: f64, max_payload_kg: f64, speed_kmh: f64) -> Self {
        Self {
            id: id.into(),
            base_range_km,
            max_payload_kg,
            speed_kmh,
        }
    }
}

/// A named place known to the fleet directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate: Coordinate::new(lat, lon),
        }
    }
}

/// A location with the payload that has to be dropped there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(default)]
    pub weight_kg: f64,
}

impl Destination {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64, weight_kg: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate: Coordinate::new(lat, lon),
            weight_kg,
        }
    }

    pub fn from_location(location: &Location, weight_kg: f64) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            coordinate: location.coordinate,
            weight_kg,
        }
    }
}

fn default_safety_margin_ratio() -> f64 {
    DEFAULT_SAFETY_MARGIN_RATIO
}

/// Everything one planning call needs. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningRequest {
    pub depot: Depot,
    pub vehicle: Vehicle,
    pub destinations: Vec<Destination>,
    #[serde(default = "default_safety_margin_ratio")]
    pub safety_margin_ratio: f64,
}

impl PlanningRequest {
    pub fn new(depot: Depot, vehicle: Vehicle, destinations: Vec<Destination>) -> Self {
        Self {
            depot,
            vehicle,
            destinations,
            safety_margin_ratio: DEFAULT_SAFETY_MARGIN_RATIO,
        }
    }

    pub fn with_safety_margin_ratio(mut self, ratio: f64) -> Self {
        self.safety_margin_ratio = ratio;
        self
    }

    /// Resolve a request from the fleet directory and the order weights.
    ///
    /// Locations without a weight are planned with an empty payload.
    pub fn resolve<D, W>(directory: &D, weights: &W, safety_margin_ratio: f64) -> Self
    where
        D: FleetDirectory,
        W: WeightSource,
    {
        let destinations = directory
            .locations()
            .iter()
            .map(|location| {
                let weight = weights.weight_for(&location.id).unwrap_or(0.0);
                Destination::from_location(location, weight)
            })
            .collect();

        Self {
            depot: directory.depot().clone(),
            vehicle: directory.vehicle().clone(),
            destinations,
            safety_margin_ratio,
        }
    }

    /// Sum of all weights still to be delivered at plan start.
    pub fn total_payload_kg(&self) -> f64 {
        self.destinations.iter().map(|destination| destination.weight_kg).sum()
    }
}
