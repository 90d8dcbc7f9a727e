//! Real Pest county villages around the GLS Hungary hub near Alsonemedi.
//!
//! Coordinates are approximate town centres.

#![allow(dead_code)]

use drone_route_planner::models::{Depot, Destination, PlanningRequest, Vehicle};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Village {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Village {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn destination(&self, weight_kg: f64) -> Destination {
        Destination::new(self.name, self.name, self.lat, self.lon, weight_kg)
    }
}

pub const HUB: Village = Village::new("GLS Hungary", 47.340793, 19.160145);

// ============================================================================
// Within roughly 10 km of the hub
// ============================================================================

pub const NEAR: &[Village] = &[
    Village::new("Alsonemedi", 47.3149, 19.1564),
    Village::new("Felsopakony", 47.3447, 19.2344),
    Village::new("Dunaharaszti", 47.3546, 19.0849),
    Village::new("Taksony", 47.3297, 19.0668),
    Village::new("Ocsa", 47.2986, 19.2292),
    Village::new("Gyal", 47.3843, 19.2214),
];

// ============================================================================
// 10 to 25 km from the hub
// ============================================================================

pub const OUTER: &[Village] = &[
    Village::new("Szigetszentmiklos", 47.3453, 19.0437),
    Village::new("Bugyi", 47.2244, 19.1486),
    Village::new("Delegyhaza", 47.2414, 19.0878),
    Village::new("Inarcs", 47.2619, 19.3267),
    Village::new("Vecses", 47.4058, 19.2649),
    Village::new("Dabas", 47.1864, 19.3108),
    Village::new("Ujhartyan", 47.2194, 19.3856),
    Village::new("Gyomro", 47.4262, 19.4005),
];

pub fn hub() -> Depot {
    Depot::new(HUB.name, HUB.lat, HUB.lon)
}

/// The standard delivery drone: 40 km range, 5 kg payload.
pub fn standard_drone() -> Vehicle {
    Vehicle::new("1", 40.0, 5.0, 60.0)
}

/// Every village with the same parcel weight, from the hub.
pub fn county_request(weight_kg: f64) -> PlanningRequest {
    let destinations = NEAR
        .iter()
        .chain(OUTER.iter())
        .map(|village| village.destination(weight_kg))
        .collect();
    PlanningRequest::new(hub(), standard_drone(), destinations)
}
